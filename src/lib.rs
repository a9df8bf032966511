//! Weather EDA - exploratory charts over tabular weather observations
//!
//! Load a CSV of observations into an [`ObservationTable`], then draw:
//! - [`line_chart`]: mean of a column per day-of-month or month
//! - [`plot_categorical_columns`]: label frequencies of the weather column
//! - [`plot_cont`]: distribution or box plots of the continuous columns
//! - [`group_values`]: any aggregation of one column grouped by another
//!
//! Every operation draws onto a [`ChartSurface`] passed in by the caller:
//! [`BitmapSurface`] rasterises to PNG, [`RecordingSurface`] keeps the figures
//! as data.

pub mod analysis;
pub mod charts;
pub mod config;
pub mod data;
pub mod stats;

pub use analysis::{
    group_values, line_chart, line_chart_by_name, plot_categorical_columns, plot_cont,
    plot_cont_by_name, AnalysisError, PlotKind,
};
pub use charts::{BitmapSurface, ChartError, ChartSurface, Figure, RecordingSurface};
pub use config::{ChartConfig, EdaConfig};
pub use data::{LoadError, ObservationTable, Period};
pub use stats::{AggSpec, Aggregation, GroupKey, GroupedAggregate, NamedReducer};
