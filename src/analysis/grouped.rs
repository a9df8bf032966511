//! Aggregate one column per distinct value of another, as a bar chart.

use super::AnalysisError;
use crate::charts::{BarPlot, ChartSurface, Figure};
use crate::data::{DataProcessor, ObservationTable, ProcessorError};
use crate::stats::{AggSpec, GroupKey, GroupedAggregate};
use std::collections::BTreeMap;
use tracing::debug;

/// Group rows by `group_column`, reduce `value_column` in each group with the
/// aggregation `spec` selects for it, draw the result and return it.
///
/// Groups come out in key order. Rows with a missing group value are dropped;
/// missing values inside a group are skipped by the reduction.
pub fn group_values<S: ChartSurface + ?Sized>(
    table: &ObservationTable,
    group_column: &str,
    spec: &AggSpec,
    value_column: &str,
    surface: &mut S,
) -> Result<GroupedAggregate, AnalysisError> {
    let df = table.dataframe();
    let keys = DataProcessor::group_keys(df, group_column)?;
    DataProcessor::require_column(df, value_column)?;

    let aggregation = spec
        .resolve(value_column)
        .ok_or_else(|| AnalysisError::Aggregation {
            column: value_column.to_string(),
            reason: "no aggregation given for this column".to_string(),
        })?;

    let mut groups: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
    if aggregation.requires_numeric() {
        let values = DataProcessor::numeric_values(df, value_column).map_err(|e| match e {
            ProcessorError::NonNumeric { column, dtype } => {
                AnalysisError::Aggregation {
                    column,
                    reason: format!("{} needs numeric data, found {}", aggregation.name(), dtype),
                }
            }
            other => other.into(),
        })?;
        for (key, value) in keys.into_iter().zip(values) {
            if let Some(key) = key {
                let group = groups.entry(key).or_default();
                group.extend(value);
            }
        }
    } else {
        // Count works on any dtype; only presence matters
        let present = DataProcessor::presence(df, value_column)?;
        for (key, present) in keys.into_iter().zip(present) {
            if let Some(key) = key {
                let group = groups.entry(key).or_default();
                if present {
                    group.push(1.0);
                }
            }
        }
    }

    let aggregate = GroupedAggregate::from_groups(group_column, value_column, &aggregation, groups);
    debug!(
        group_column,
        value_column,
        aggregation = aggregation.name(),
        groups = aggregate.len(),
        "grouped aggregate"
    );

    surface.draw(&Figure::Bar(BarPlot {
        title: format!("{} of {} by {}", aggregation.name(), value_column, group_column),
        x_label: group_column.to_string(),
        y_label: value_column.to_string(),
        bars: aggregate
            .entries
            .iter()
            .map(|(key, value)| (key.to_string(), *value))
            .collect(),
    }))?;

    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::RecordingSurface;
    use crate::config::EdaConfig;
    use crate::stats::{Aggregation, NamedReducer};
    use polars::prelude::*;

    fn table() -> ObservationTable {
        let df = DataFrame::new(vec![
            Column::new("Date/Time".into(), vec!["2012-01-01 00:00"; 5]),
            Column::new("g".into(), vec![Some("A"), Some("A"), Some("B"), None, Some("B")]),
            Column::new("v".into(), vec![Some(10.0), Some(20.0), Some(5.0), Some(99.0), None]),
            Column::new("h".into(), vec![2i64, 10, 2, 10, 1]),
        ])
        .unwrap();
        ObservationTable::from_dataframe(df, &EdaConfig::default()).unwrap()
    }

    #[test]
    fn mean_per_group() {
        let mut surface = RecordingSurface::new();
        let agg = group_values(&table(), "g", &Aggregation::Mean.into(), "v", &mut surface).unwrap();

        assert_eq!(agg.to_map(), BTreeMap::from([("A".to_string(), 15.0), ("B".to_string(), 5.0)]));
        let Some(Figure::Bar(plot)) = surface.last() else {
            panic!("expected a bar figure");
        };
        assert_eq!(plot.bars.len(), 2);
    }

    #[test]
    fn numeric_groups_sort_by_value() {
        let mut surface = RecordingSurface::new();
        let agg = group_values(&table(), "h", &Aggregation::Sum.into(), "v", &mut surface).unwrap();
        assert_eq!(agg.labels(), ["1", "2", "10"]);
        assert_eq!(agg.get("1"), Some(0.0));
        assert_eq!(agg.get("2"), Some(15.0));
        assert_eq!(agg.get("10"), Some(119.0));
    }

    #[test]
    fn negative_zero_joins_the_zero_group() {
        let df = DataFrame::new(vec![
            Column::new("Date/Time".into(), vec!["2012-01-01 00:00"; 3]),
            Column::new("t".into(), vec![0.0f64, -0.0, 1.0]),
            Column::new("v".into(), vec![10.0f64, 20.0, 5.0]),
        ])
        .unwrap();
        let table = ObservationTable::from_dataframe(df, &EdaConfig::default()).unwrap();
        let mut surface = RecordingSurface::new();
        let agg = group_values(&table, "t", &Aggregation::Mean.into(), "v", &mut surface).unwrap();

        assert_eq!(agg.len(), 2);
        assert_eq!(agg.to_map(), BTreeMap::from([("0".to_string(), 15.0), ("1".to_string(), 5.0)]));
    }

    #[test]
    fn count_accepts_text_values() {
        let mut surface = RecordingSurface::new();
        let agg = group_values(&table(), "h", &Aggregation::Count.into(), "g", &mut surface).unwrap();
        assert_eq!(agg.get("10"), Some(1.0));
        assert_eq!(agg.get("2"), Some(2.0));
    }

    #[test]
    fn numeric_aggregation_on_text_is_rejected() {
        let mut surface = RecordingSurface::new();
        let err = group_values(&table(), "h", &Aggregation::Mean.into(), "g", &mut surface).unwrap_err();
        assert!(matches!(err, AnalysisError::Aggregation { ref column, .. } if column == "g"));
        assert!(surface.is_empty());
    }

    #[test]
    fn missing_columns_are_reported() {
        let mut surface = RecordingSurface::new();
        let spec: AggSpec = Aggregation::Max.into();
        let err = group_values(&table(), "nope", &spec, "v", &mut surface).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn(ref c) if c == "nope"));
        let err = group_values(&table(), "g", &spec, "nope", &mut surface).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn(ref c) if c == "nope"));
    }

    #[test]
    fn per_column_spec_and_custom_reducer() {
        fn spread(values: &[f64]) -> f64 {
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            max - min
        }
        let mut map = BTreeMap::new();
        map.insert(
            "v".to_string(),
            Aggregation::Custom(NamedReducer {
                name: "spread",
                func: spread,
            }),
        );
        let spec = AggSpec::ByColumn(map);

        let mut surface = RecordingSurface::new();
        let agg = group_values(&table(), "g", &spec, "v", &mut surface).unwrap();
        assert_eq!(agg.get("A"), Some(10.0));
        assert_eq!(agg.aggregation, "spread");

        let err = group_values(&table(), "g", &spec, "h", &mut surface).unwrap_err();
        assert!(matches!(err, AnalysisError::Aggregation { .. }));
    }
}
