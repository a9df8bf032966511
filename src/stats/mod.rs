//! Stats module - aggregation and distribution summaries

mod aggregation;
mod calculator;

pub use aggregation::{AggSpec, Aggregation, GroupKey, GroupedAggregate, NamedReducer};
pub use calculator::{BoxSummary, HistogramBin, StatsCalculator, KDE_POINTS, MAX_BINS};
