//! Data Processor Module
//! Column extraction for grouping and aggregation.

use crate::stats::GroupKey;
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' not found")]
    MissingColumn(String),
    #[error("Column '{column}' is {dtype}, expected numeric data")]
    NonNumeric { column: String, dtype: String },
}

pub fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Pulls typed per-row values out of a DataFrame.
pub struct DataProcessor;

impl DataProcessor {
    pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ProcessorError> {
        df.column(name)
            .map_err(|_| ProcessorError::MissingColumn(name.to_string()))
    }

    /// Values of a numeric column as `f64`, one per row. Nulls and NaN become `None`.
    pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, ProcessorError> {
        let column = Self::require_column(df, name)?;
        if !is_numeric(column.dtype()) {
            return Err(ProcessorError::NonNumeric {
                column: name.to_string(),
                dtype: column.dtype().to_string(),
            });
        }

        let as_f64 = column.cast(&DataType::Float64)?;
        let values = as_f64
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Ok(values)
    }

    /// Non-missing numeric values only.
    pub fn present_numeric_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, ProcessorError> {
        Ok(Self::numeric_values(df, name)?.into_iter().flatten().collect())
    }

    /// Whether each row holds a value. Works for any dtype; NaN counts as missing.
    pub fn presence(df: &DataFrame, name: &str) -> Result<Vec<bool>, ProcessorError> {
        let column = Self::require_column(df, name)?;
        if is_numeric(column.dtype()) {
            return Ok(Self::numeric_values(df, name)?
                .into_iter()
                .map(|v| v.is_some())
                .collect());
        }

        (0..df.height())
            .map(|i| Ok(!column.get(i)?.is_null()))
            .collect()
    }

    /// Group key for each row. Numeric columns give numeric keys so that
    /// ordering is by value, everything else is grouped by its text form.
    /// `-0.0` and `0.0` share one key.
    pub fn group_keys(df: &DataFrame, name: &str) -> Result<Vec<Option<GroupKey>>, ProcessorError> {
        let column = Self::require_column(df, name)?;

        if is_numeric(column.dtype()) {
            return Ok(Self::numeric_values(df, name)?
                .into_iter()
                .map(|v| v.map(|x| GroupKey::Number(if x == 0.0 { 0.0 } else { x })))
                .collect());
        }

        let as_text = column.cast(&DataType::String)?;
        let keys = as_text
            .str()?
            .into_iter()
            .map(|v| v.map(|s| GroupKey::Label(s.to_string())))
            .collect();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Column::new("g".into(), vec![Some("A"), None, Some("B")]),
            Column::new("v".into(), vec![Some(1.0), Some(f64::NAN), None]),
            Column::new("n".into(), vec![3i64, 1, 2]),
        ])
        .unwrap()
    }

    #[test]
    fn numeric_values_treat_nan_as_missing() {
        let values = DataProcessor::numeric_values(&sample(), "v").unwrap();
        assert_eq!(values, vec![Some(1.0), None, None]);
    }

    #[test]
    fn text_column_is_not_numeric() {
        let err = DataProcessor::numeric_values(&sample(), "g").unwrap_err();
        assert!(matches!(err, ProcessorError::NonNumeric { .. }));
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let err = DataProcessor::group_keys(&sample(), "nope").unwrap_err();
        assert!(matches!(err, ProcessorError::MissingColumn(ref c) if c == "nope"));
    }

    #[test]
    fn group_keys_follow_column_type() {
        let df = sample();
        let labels = DataProcessor::group_keys(&df, "g").unwrap();
        assert_eq!(labels[0], Some(GroupKey::Label("A".into())));
        assert_eq!(labels[1], None);

        let numbers = DataProcessor::group_keys(&df, "n").unwrap();
        assert_eq!(numbers[0], Some(GroupKey::Number(3.0)));
    }

    #[test]
    fn signed_zero_shares_one_key() {
        let df = DataFrame::new(vec![Column::new("t".into(), vec![0.0f64, -0.0, 1.0])]).unwrap();
        let keys = DataProcessor::group_keys(&df, "t").unwrap();
        assert_eq!(keys[0], keys[1]);
        match keys[1] {
            Some(GroupKey::Number(x)) => assert!(x.is_sign_positive()),
            ref other => panic!("expected numeric key, got {other:?}"),
        }
    }

    #[test]
    fn presence_works_for_text_and_numbers() {
        let df = sample();
        assert_eq!(DataProcessor::presence(&df, "g").unwrap(), vec![true, false, true]);
        assert_eq!(DataProcessor::presence(&df, "v").unwrap(), vec![true, false, false]);
    }
}
