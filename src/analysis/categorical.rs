//! Frequency of each label in the categorical column, as a bar chart.

use super::AnalysisError;
use crate::charts::{BarPlot, ChartSurface, Figure};
use crate::config::EdaConfig;
use crate::data::{DataProcessor, ObservationTable};
use crate::stats::{GroupKey, GroupedAggregate};
use std::collections::BTreeMap;
use tracing::debug;

/// Count rows per label of `config.categorical_column`, most frequent first.
///
/// Equal counts are ordered by label. Missing labels are not counted.
pub fn plot_categorical_columns<S: ChartSurface + ?Sized>(
    table: &ObservationTable,
    config: &EdaConfig,
    surface: &mut S,
) -> Result<GroupedAggregate, AnalysisError> {
    let column = config.categorical_column.as_str();
    let keys = DataProcessor::group_keys(table.dataframe(), column)?;

    let mut counts: BTreeMap<GroupKey, usize> = BTreeMap::new();
    for key in keys.into_iter().flatten() {
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut entries: Vec<(GroupKey, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    debug!(column, labels = entries.len(), "value counts");

    let aggregate = GroupedAggregate {
        key_column: column.to_string(),
        value_column: column.to_string(),
        aggregation: "count".to_string(),
        entries: entries
            .into_iter()
            .map(|(key, count)| (key, count as f64))
            .collect(),
    };

    surface.draw(&Figure::Bar(BarPlot {
        title: format!("{} frequency", column),
        x_label: column.to_string(),
        y_label: "Count".to_string(),
        bars: aggregate
            .entries
            .iter()
            .map(|(key, count)| (key.to_string(), *count))
            .collect(),
    }))?;

    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::RecordingSurface;
    use polars::prelude::*;

    fn table(labels: Vec<Option<&str>>) -> ObservationTable {
        let dates = vec!["2012-01-01 00:00"; labels.len()];
        let df = DataFrame::new(vec![
            Column::new("Date/Time".into(), dates),
            Column::new("Weather".into(), labels),
        ])
        .unwrap();
        ObservationTable::from_dataframe(df, &EdaConfig::default()).unwrap()
    }

    #[test]
    fn counts_descend_with_label_tiebreak() {
        let t = table(vec![
            Some("Snow"),
            Some("Clear"),
            Some("Fog"),
            Some("Clear"),
            Some("Fog"),
            Some("Clear"),
        ]);
        let mut surface = RecordingSurface::new();
        let counts = plot_categorical_columns(&t, &EdaConfig::default(), &mut surface).unwrap();

        assert_eq!(counts.labels(), ["Clear", "Fog", "Snow"]);
        assert_eq!(counts.values().collect::<Vec<_>>(), vec![3.0, 2.0, 1.0]);

        let Some(Figure::Bar(plot)) = surface.last() else {
            panic!("expected a bar figure");
        };
        assert_eq!(plot.bars[0], ("Clear".to_string(), 3.0));
    }

    #[test]
    fn missing_labels_are_skipped() {
        let t = table(vec![Some("Fog"), None]);
        let mut surface = RecordingSurface::new();
        let counts = plot_categorical_columns(&t, &EdaConfig::default(), &mut surface).unwrap();
        assert_eq!(counts.values().sum::<f64>(), 1.0);
    }

    #[test]
    fn configured_column_must_exist() {
        let t = table(vec![Some("Fog")]);
        let config = EdaConfig {
            categorical_column: "Sky".to_string(),
            ..EdaConfig::default()
        };
        let mut surface = RecordingSurface::new();
        let err = plot_categorical_columns(&t, &config, &mut surface).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn(ref c) if c == "Sky"));
    }
}
