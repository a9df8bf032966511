//! Plot descriptions handed to a chart surface.

use crate::stats::{BoxSummary, HistogramBin};
use serde::Serialize;

pub const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Serialize)]
pub enum Figure {
    Line(LinePlot),
    Bar(BarPlot),
    Panel(PanelPlot),
}

impl Figure {
    pub fn title(&self) -> &str {
        match self {
            Figure::Line(p) => &p.title,
            Figure::Bar(p) => &p.title,
            Figure::Panel(p) => &p.title,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LinePlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
    /// Explicit tick positions and labels; `None` uses numeric ticks.
    pub x_ticks: Option<Vec<(f64, String)>>,
    pub rotate_x_ticks: bool,
}

impl LinePlot {
    pub fn tick_labels(&self) -> Vec<&str> {
        self.x_ticks
            .as_ref()
            .map(|ticks| ticks.iter().map(|(_, l)| l.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Tick positions 1..=12 labelled with month abbreviations.
pub fn month_ticks() -> Vec<(f64, String)> {
    MONTH_ABBR
        .iter()
        .enumerate()
        .map(|(i, m)| ((i + 1) as f64, m.to_string()))
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct BarPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// One bar per entry, drawn left to right.
    pub bars: Vec<(String, f64)>,
}

/// Grid of single-column plots, filled row-major.
#[derive(Debug, Clone, Serialize)]
pub struct PanelPlot {
    pub title: String,
    pub rows: usize,
    pub cols: usize,
    pub slots: Vec<PanelSlot>,
}

#[derive(Debug, Clone, Serialize)]
pub enum PanelSlot {
    Distribution {
        column: String,
        histogram: Vec<HistogramBin>,
        density: Vec<(f64, f64)>,
    },
    Box {
        column: String,
        summary: BoxSummary,
    },
}

impl PanelSlot {
    pub fn column(&self) -> &str {
        match self {
            PanelSlot::Distribution { column, .. } | PanelSlot::Box { column, .. } => column,
        }
    }
}
