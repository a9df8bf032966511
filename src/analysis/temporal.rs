//! Mean of a column per day-of-month or month-of-year, as a line chart.

use super::AnalysisError;
use crate::charts::{month_ticks, ChartSurface, Figure, LinePlot};
use crate::data::{DataProcessor, ObservationTable, Period};
use crate::stats::{Aggregation, GroupKey, GroupedAggregate};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, warn};

impl FromStr for Period {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Period::Day),
            "month" => Ok(Period::Month),
            other => Err(AnalysisError::UnknownSelector {
                kind: "period",
                value: other.to_string(),
            }),
        }
    }
}

/// Average `column` per calendar `period` and draw it as a line.
///
/// The derived `Day`/`Month` column is written into `table` and stays there.
/// Month charts always carry the twelve month ticks, whichever months the
/// data covers.
pub fn line_chart<S: ChartSurface + ?Sized>(
    table: &mut ObservationTable,
    period: Period,
    column: &str,
    surface: &mut S,
) -> Result<GroupedAggregate, AnalysisError> {
    // Validate before touching the table
    let values = DataProcessor::numeric_values(table.dataframe(), column)?;
    let keys = table.derive_period_column(period)?;

    let mut groups: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
    for (key, value) in keys.into_iter().zip(values) {
        let group = groups.entry(GroupKey::Number(key as f64)).or_default();
        if let Some(v) = value {
            group.push(v);
        }
    }

    let key_column = period.column_name();
    let aggregate = GroupedAggregate::from_groups(key_column, column, &Aggregation::Mean, groups);
    debug!(period = key_column, column, groups = aggregate.len(), "temporal means");

    let points = aggregate
        .entries
        .iter()
        .filter_map(|(key, mean)| match key {
            GroupKey::Number(x) => Some((*x, *mean)),
            GroupKey::Label(_) => None,
        })
        .collect();

    let (x_ticks, rotate_x_ticks) = match period {
        Period::Day => (None, false),
        Period::Month => (Some(month_ticks()), true),
    };

    surface.draw(&Figure::Line(LinePlot {
        title: format!("Mean {} by {}", column, key_column),
        x_label: key_column.to_string(),
        y_label: column.to_string(),
        points,
        x_ticks,
        rotate_x_ticks,
    }))?;

    Ok(aggregate)
}

/// [`line_chart`] with the period given by name. Names other than `day` and
/// `month` draw nothing and return `Ok(None)`.
pub fn line_chart_by_name<S: ChartSurface + ?Sized>(
    table: &mut ObservationTable,
    period: &str,
    column: &str,
    surface: &mut S,
) -> Result<Option<GroupedAggregate>, AnalysisError> {
    match period.parse::<Period>() {
        Ok(period) => line_chart(table, period, column, surface).map(Some),
        Err(_) => {
            warn!(period, "unrecognised period, no chart drawn");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{RecordingSurface, MONTH_ABBR};
    use crate::config::EdaConfig;
    use polars::prelude::*;

    fn table(rows: &[(&str, Option<f64>)]) -> ObservationTable {
        let dates: Vec<&str> = rows.iter().map(|r| r.0).collect();
        let temps: Vec<Option<f64>> = rows.iter().map(|r| r.1).collect();
        let df = DataFrame::new(vec![
            Column::new("Date/Time".into(), dates),
            Column::new("Temp (C)".into(), temps),
            Column::new("Weather".into(), vec!["Fog"; rows.len()]),
        ])
        .unwrap();
        ObservationTable::from_dataframe(df, &EdaConfig::default()).unwrap()
    }

    #[test]
    fn day_means_one_entry_per_day() {
        let mut t = table(&[
            ("2012-01-03 00:00", Some(1.0)),
            ("2012-02-03 00:00", Some(3.0)),
            ("2012-01-10 00:00", Some(-4.0)),
            ("2012-03-03 00:00", None),
        ]);
        let mut surface = RecordingSurface::new();
        let agg = line_chart(&mut t, Period::Day, "Temp (C)", &mut surface).unwrap();

        assert_eq!(agg.labels(), ["3", "10"]);
        assert_eq!(agg.get("3"), Some(2.0));
        assert_eq!(agg.get("10"), Some(-4.0));
        assert!(t.has_column("Day"));

        match surface.last() {
            Some(Figure::Line(plot)) => {
                assert_eq!(plot.points, vec![(3.0, 2.0), (10.0, -4.0)]);
                assert!(plot.x_ticks.is_none());
            }
            other => panic!("expected a line figure, got {other:?}"),
        }
    }

    #[test]
    fn month_ticks_are_fixed() {
        let mut t = table(&[("2012-06-01 00:00", Some(20.0)), ("2012-06-02 00:00", Some(22.0))]);
        let mut surface = RecordingSurface::new();
        let agg = line_chart(&mut t, Period::Month, "Temp (C)", &mut surface).unwrap();

        assert_eq!(agg.to_map().get("6"), Some(&21.0));
        let Some(Figure::Line(plot)) = surface.last() else {
            panic!("expected a line figure");
        };
        assert_eq!(plot.tick_labels(), MONTH_ABBR.to_vec());
        assert!(plot.rotate_x_ticks);
    }

    #[test]
    fn non_numeric_target_leaves_table_untouched() {
        let mut t = table(&[("2012-06-01 00:00", Some(20.0))]);
        let mut surface = RecordingSurface::new();
        let err = line_chart(&mut t, Period::Day, "Weather", &mut surface).unwrap_err();

        assert!(matches!(err, AnalysisError::Aggregation { .. }));
        assert!(!t.has_column("Day"));
        assert!(surface.is_empty());
    }

    #[test]
    fn unknown_period_name_is_a_no_op() {
        let mut t = table(&[("2012-06-01 00:00", Some(20.0))]);
        let mut surface = RecordingSurface::new();
        let out = line_chart_by_name(&mut t, "year", "Temp (C)", &mut surface).unwrap();

        assert!(out.is_none());
        assert!(surface.is_empty());
        assert!("year".parse::<Period>().is_err());
    }
}
