//! Analysis module - the four chart-producing operations over an observation table
//!
//! Each operation validates the columns it needs, computes a grouped or
//! per-column summary, draws one figure on the surface it is given, and
//! returns the computed numbers.

mod categorical;
mod distribution;
mod grouped;
mod temporal;

pub use categorical::plot_categorical_columns;
pub use distribution::{plot_cont, plot_cont_by_name, PlotKind};
pub use grouped::group_values;
pub use temporal::{line_chart, line_chart_by_name};

use crate::charts::ChartError;
use crate::data::ProcessorError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Column '{0}' not found in table")]
    MissingColumn(String),
    #[error("Aggregation not applicable to column '{column}': {reason}")]
    Aggregation { column: String, reason: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Unknown {kind} '{value}'")]
    UnknownSelector { kind: &'static str, value: String },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),
}

impl From<ProcessorError> for AnalysisError {
    fn from(err: ProcessorError) -> Self {
        match err {
            ProcessorError::MissingColumn(column) => AnalysisError::MissingColumn(column),
            ProcessorError::NonNumeric { column, dtype } => AnalysisError::Aggregation {
                column,
                reason: format!("expected numeric data, found {}", dtype),
            },
            ProcessorError::PolarsError(e) => AnalysisError::Polars(e),
        }
    }
}
