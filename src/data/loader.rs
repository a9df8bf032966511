//! CSV Data Loader Module
//! Loads weather observations with Polars and parses the date/time row index.

use crate::config::EdaConfig;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to load CSV {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Date/time column '{0}' not found")]
    MissingDateColumn(String),
    #[error("Row {row}: date/time value is empty")]
    EmptyDate { row: usize },
    #[error("Row {row}: cannot parse date/time '{value}'")]
    UnparseableDate { row: usize, value: String },
}

/// Calendar granularity used for derived columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Day,
    Month,
}

impl Period {
    /// Name of the derived column this period writes into the table.
    pub fn column_name(self) -> &'static str {
        match self {
            Period::Day => "Day",
            Period::Month => "Month",
        }
    }

    fn extract(self, dt: &NaiveDateTime) -> u32 {
        match self {
            Period::Day => dt.day(),
            Period::Month => dt.month(),
        }
    }
}

/// Weather observations with a parsed date/time index.
///
/// Polars frames carry no row index, so the parsed timestamps are kept
/// alongside the frame, one per row.
#[derive(Debug, Clone)]
pub struct ObservationTable {
    df: DataFrame,
    index: Vec<NaiveDateTime>,
}

impl ObservationTable {
    /// Load a CSV file and parse its date/time column.
    pub fn load(path: impl AsRef<Path>, config: &EdaConfig) -> Result<Self, LoadError> {
        let path = path.as_ref();

        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()
            .and_then(|lf| lf.collect())
            .map_err(|source| LoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let table = Self::from_dataframe(df, config)?;
        info!(
            path = %path.display(),
            rows = table.height(),
            columns = table.df.width(),
            "loaded observation table"
        );
        Ok(table)
    }

    /// Wrap an in-memory frame, parsing `config.date_column` as the index.
    pub fn from_dataframe(df: DataFrame, config: &EdaConfig) -> Result<Self, LoadError> {
        let date_col = df
            .column(&config.date_column)
            .map_err(|_| LoadError::MissingDateColumn(config.date_column.clone()))?;

        let as_text = date_col.cast(&DataType::String)?;
        let text = as_text.str()?;

        let mut index = Vec::with_capacity(df.height());
        for (row, value) in text.into_iter().enumerate() {
            let value = value.ok_or(LoadError::EmptyDate { row })?;
            let parsed = parse_date_time(value, &config.date_formats).ok_or_else(|| {
                LoadError::UnparseableDate {
                    row,
                    value: value.to_string(),
                }
            })?;
            index.push(parsed);
        }
        debug!(rows = index.len(), column = %config.date_column, "parsed date/time index");

        Ok(Self { df, index })
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Parsed date/time of each row, in row order.
    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.column(name).is_ok()
    }

    /// Get list of numeric column names.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.df
            .get_columns()
            .iter()
            .filter(|col| super::processor::is_numeric(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Extract `period` from every index value and store it as a `UInt32`
    /// column named after the period, replacing any earlier one.
    pub fn derive_period_column(&mut self, period: Period) -> Result<Vec<u32>, PolarsError> {
        let values: Vec<u32> = self.index.iter().map(|dt| period.extract(dt)).collect();
        self.df
            .with_column(Column::new(period.column_name().into(), values.clone()))?;
        Ok(values)
    }
}

fn parse_date_time(value: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let value = value.trim();
    formats.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(value, fmt).ok().or_else(|| {
            NaiveDate::parse_from_str(value, fmt)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
    })
}
