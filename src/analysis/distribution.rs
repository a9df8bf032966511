//! Univariate panel over the continuous columns: distribution curves or box plots.

use super::AnalysisError;
use crate::charts::{ChartSurface, Figure, PanelPlot, PanelSlot};
use crate::config::EdaConfig;
use crate::data::{DataProcessor, ObservationTable};
use crate::stats::{StatsCalculator, KDE_POINTS};
use rayon::prelude::*;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    /// Density histogram with a Gaussian KDE overlay.
    Distplot,
    Boxplot,
}

impl FromStr for PlotKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "distplot" => Ok(PlotKind::Distplot),
            "boxplot" => Ok(PlotKind::Boxplot),
            other => Err(AnalysisError::UnknownSelector {
                kind: "plot kind",
                value: other.to_string(),
            }),
        }
    }
}

fn summarize(kind: PlotKind, column: String, values: &[f64]) -> PanelSlot {
    match kind {
        PlotKind::Distplot => {
            let bins = StatsCalculator::freedman_diaconis_bins(values);
            PanelSlot::Distribution {
                column,
                histogram: StatsCalculator::histogram(values, bins),
                density: StatsCalculator::gaussian_kde(values, KDE_POINTS),
            }
        }
        PlotKind::Boxplot => PanelSlot::Box {
            column,
            summary: StatsCalculator::box_summary(values),
        },
    }
}

/// Draw one plot per `config.continuous_columns` entry in a
/// `config.panel_grid` grid, filled row-major.
///
/// Every column is checked before anything is drawn.
pub fn plot_cont<S: ChartSurface + ?Sized>(
    table: &ObservationTable,
    kind: PlotKind,
    config: &EdaConfig,
    surface: &mut S,
) -> Result<PanelPlot, AnalysisError> {
    let (rows, cols) = config.panel_grid;
    if config.continuous_columns.len() > rows * cols {
        return Err(AnalysisError::Config(format!(
            "{} columns do not fit a {}x{} panel",
            config.continuous_columns.len(),
            rows,
            cols
        )));
    }

    let columns = config
        .continuous_columns
        .iter()
        .map(|name| -> Result<(String, Vec<f64>), AnalysisError> {
            let values = DataProcessor::present_numeric_values(table.dataframe(), name)?;
            Ok((name.clone(), values))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Summaries are independent per column
    let slots: Vec<PanelSlot> = columns
        .into_par_iter()
        .map(|(name, values)| summarize(kind, name, &values))
        .collect();
    debug!(?kind, columns = slots.len(), "panel summaries");

    let title = match kind {
        PlotKind::Distplot => "Distributions",
        PlotKind::Boxplot => "Box plots",
    };
    let panel = PanelPlot {
        title: title.to_string(),
        rows,
        cols,
        slots,
    };
    surface.draw(&Figure::Panel(panel.clone()))?;
    Ok(panel)
}

/// [`plot_cont`] with the plot kind given by name. Names other than
/// `distplot` and `boxplot` draw nothing and return `Ok(None)`.
pub fn plot_cont_by_name<S: ChartSurface + ?Sized>(
    table: &ObservationTable,
    kind: &str,
    config: &EdaConfig,
    surface: &mut S,
) -> Result<Option<PanelPlot>, AnalysisError> {
    match kind.parse::<PlotKind>() {
        Ok(kind) => plot_cont(table, kind, config, surface).map(Some),
        Err(_) => {
            warn!(kind, "unrecognised plot kind, no chart drawn");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::RecordingSurface;
    use polars::prelude::*;

    fn config() -> EdaConfig {
        EdaConfig {
            continuous_columns: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            panel_grid: (2, 2),
            ..EdaConfig::default()
        }
    }

    fn table() -> ObservationTable {
        let n = 40;
        let df = DataFrame::new(vec![
            Column::new("Date/Time".into(), vec!["2012-01-01 00:00"; n]),
            Column::new("a".into(), (0..n).map(|i| i as f64).collect::<Vec<_>>()),
            Column::new("b".into(), (0..n).map(|i| (i % 7) as i64).collect::<Vec<_>>()),
            Column::new("c".into(), vec![2.5f64; n]),
            Column::new("label".into(), vec!["x"; n]),
        ])
        .unwrap();
        ObservationTable::from_dataframe(df, &EdaConfig::default()).unwrap()
    }

    #[test]
    fn slots_follow_configured_order() {
        let mut surface = RecordingSurface::new();
        let panel = plot_cont(&table(), PlotKind::Boxplot, &config(), &mut surface).unwrap();

        let columns: Vec<&str> = panel.slots.iter().map(|s| s.column()).collect();
        assert_eq!(columns, ["a", "b", "c"]);
        assert_eq!((panel.rows, panel.cols), (2, 2));
        assert_eq!(surface.len(), 1);

        match &panel.slots[0] {
            PanelSlot::Box { summary, .. } => {
                assert_eq!(summary.count, 40);
                assert_eq!(summary.median, 19.5);
            }
            other => panic!("expected box slot, got {other:?}"),
        }
    }

    #[test]
    fn distplot_builds_histograms() {
        let mut surface = RecordingSurface::new();
        let panel = plot_cont(&table(), PlotKind::Distplot, &config(), &mut surface).unwrap();

        for slot in &panel.slots {
            let PanelSlot::Distribution { histogram, density, column } = slot else {
                panic!("expected distribution slot");
            };
            assert_eq!(histogram.iter().map(|b| b.count).sum::<usize>(), 40, "{column}");
            // Constant column: histogram only
            assert_eq!(density.is_empty(), column == "c");
        }
    }

    #[test]
    fn unknown_kind_is_a_no_op() {
        let mut surface = RecordingSurface::new();
        let out = plot_cont_by_name(&table(), "scatter", &config(), &mut surface).unwrap();
        assert!(out.is_none());
        assert!(surface.is_empty());
    }

    #[test]
    fn bad_column_fails_before_drawing() {
        let mut config = config();
        config.continuous_columns.push("label".to_string());
        let mut surface = RecordingSurface::new();
        let err = plot_cont(&table(), PlotKind::Boxplot, &config, &mut surface).unwrap_err();
        assert!(matches!(err, AnalysisError::Aggregation { .. }));
        assert!(surface.is_empty());

        config.continuous_columns = vec!["missing".to_string()];
        let err = plot_cont(&table(), PlotKind::Boxplot, &config, &mut surface).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn(_)));
    }

    #[test]
    fn too_many_columns_for_grid() {
        let config = EdaConfig {
            panel_grid: (1, 2),
            ..config()
        };
        let mut surface = RecordingSurface::new();
        let err = plot_cont(&table(), PlotKind::Distplot, &config, &mut surface).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }
}
