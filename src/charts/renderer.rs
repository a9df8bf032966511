//! Static Chart Renderer
//! Draws figures onto any Plotters drawing area.
//!
//! Layouts:
//! 1. Line: markers joined by a line, optional categorical x ticks (rotated)
//! 2. Bar: one bar per label, labels rotated under the axis
//! 3. Panel: titled grid; each slot is a density histogram with a KDE curve,
//!    or a box plot (box = IQR, orange median, whiskers, red outliers)

use crate::charts::{BarPlot, ChartError, Figure, LinePlot, PanelPlot, PanelSlot};
use crate::stats::{BoxSummary, HistogramBin};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;

const FONT: &str = "sans-serif";

// Colors
const STEEL_BLUE: RGBColor = RGBColor(91, 155, 213); // Lines, bars, box outline
const LIGHT_BLUE: RGBColor = RGBColor(189, 215, 238); // Box and histogram fill
const ORANGE: RGBColor = RGBColor(237, 125, 49); // Median
const DARK_RED: RGBColor = RGBColor(156, 0, 6); // Outliers

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    pub fn render<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        figure: &Figure,
    ) -> Result<(), ChartError> {
        match figure {
            Figure::Line(plot) => Self::draw_line(root, plot),
            Figure::Bar(plot) => Self::draw_bar(root, plot),
            Figure::Panel(plot) => Self::draw_panel(root, plot),
        }
    }

    fn draw_line<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        plot: &LinePlot,
    ) -> Result<(), ChartError> {
        let points: Vec<(f64, f64)> = plot
            .points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();

        let x_extent = match &plot.x_ticks {
            Some(ticks) if !ticks.is_empty() => extent(ticks.iter().map(|(x, _)| *x)),
            _ => extent(points.iter().map(|p| p.0)),
        };
        let (x_min, x_max) = x_extent
            .map(|(lo, hi)| (lo - 0.5, hi + 0.5))
            .unwrap_or((0.0, 1.0));
        let (y_min, y_max) = Self::get_y_range(points.iter().map(|p| p.1));

        let mut chart = ChartBuilder::on(area)
            .caption(&plot.title, (FONT, 22))
            .margin(15)
            .x_label_area_size(if plot.rotate_x_ticks { 60 } else { 40 })
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        let ticks = plot.x_ticks.as_deref();
        let formatter = |x: &f64| -> String {
            match ticks {
                Some(ticks) => ticks
                    .iter()
                    .find(|(pos, _)| (pos - x).abs() < 1e-6)
                    .map(|(_, label)| label.clone())
                    .unwrap_or_default(),
                // Only whole positions get a label on a day axis
                None if (x - x.round()).abs() < 1e-6 => format!("{}", x.round() as i64),
                None => String::new(),
            }
        };

        let n_labels = match ticks {
            Some(ticks) => ticks.len(),
            None => points.len().clamp(2, 31),
        };

        {
            let mut mesh = chart.configure_mesh();
            mesh.x_desc(&plot.x_label)
                .y_desc(&plot.y_label)
                .x_labels(n_labels)
                .x_label_formatter(&formatter);
            if plot.rotate_x_ticks {
                mesh.x_label_style((FONT, 13).into_font().transform(FontTransform::Rotate90));
            }
            mesh.draw()?;
        }

        chart.draw_series(LineSeries::new(points.iter().copied(), STEEL_BLUE.stroke_width(2)))?;
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, STEEL_BLUE.filled())),
        )?;
        Ok(())
    }

    fn draw_bar<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        plot: &BarPlot,
    ) -> Result<(), ChartError> {
        let n = plot.bars.len().max(1) as u32;
        let (lo, hi) = plot
            .bars
            .iter()
            .map(|(_, v)| *v)
            .filter(|v| v.is_finite())
            .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let (y_min, y_max) = if hi > lo { (lo * 1.1, hi * 1.1) } else { (0.0, 1.0) };

        let mut chart = ChartBuilder::on(area)
            .caption(&plot.title, (FONT, 22))
            .margin(15)
            .x_label_area_size(110)
            .y_label_area_size(60)
            .build_cartesian_2d((0u32..n).into_segmented(), y_min..y_max)?;

        let formatter = |v: &SegmentValue<u32>| -> String {
            match v {
                SegmentValue::CenterOf(i) => plot
                    .bars
                    .get(*i as usize)
                    .map(|(label, _)| label.clone())
                    .unwrap_or_default(),
                _ => String::new(),
            }
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(&plot.x_label)
            .y_desc(&plot.y_label)
            .x_labels(plot.bars.len().max(1))
            .x_label_formatter(&formatter)
            .x_label_style((FONT, 13).into_font().transform(FontTransform::Rotate90))
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(STEEL_BLUE.filled())
                .margin(6)
                .data(
                    plot.bars
                        .iter()
                        .enumerate()
                        .filter(|(_, (_, v))| v.is_finite())
                        .map(|(i, (_, v))| (i as u32, *v)),
                ),
        )?;
        Ok(())
    }

    fn draw_panel<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        plot: &PanelPlot,
    ) -> Result<(), ChartError> {
        let body = root.titled(&plot.title, (FONT, 26))?;
        let areas = body.split_evenly((plot.rows, plot.cols));

        for (area, slot) in areas.iter().zip(&plot.slots) {
            match slot {
                PanelSlot::Distribution {
                    column,
                    histogram,
                    density,
                } => Self::draw_distribution(area, column, histogram, density)?,
                PanelSlot::Box { column, summary } => Self::draw_box(area, column, summary)?,
            }
        }
        Ok(())
    }

    fn draw_distribution<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        column: &str,
        histogram: &[HistogramBin],
        density: &[(f64, f64)],
    ) -> Result<(), ChartError> {
        let (x_min, x_max) = extent(
            histogram
                .iter()
                .flat_map(|b| [b.start, b.end])
                .chain(density.iter().map(|p| p.0)),
        )
        .unwrap_or((0.0, 1.0));
        let y_top = histogram
            .iter()
            .map(|b| b.density)
            .chain(density.iter().map(|p| p.1))
            .fold(0.0f64, f64::max);
        let y_max = if y_top > 0.0 { y_top * 1.1 } else { 1.0 };

        let mut chart = ChartBuilder::on(area)
            .caption(column, (FONT, 16))
            .margin(8)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

        chart
            .configure_mesh()
            .x_labels(6)
            .y_labels(5)
            .y_desc("Density")
            .draw()?;

        chart.draw_series(histogram.iter().map(|b| {
            Rectangle::new([(b.start, 0.0), (b.end, b.density)], LIGHT_BLUE.filled())
        }))?;
        chart.draw_series(histogram.iter().map(|b| {
            Rectangle::new([(b.start, 0.0), (b.end, b.density)], STEEL_BLUE.stroke_width(1))
        }))?;
        if !density.is_empty() {
            chart.draw_series(LineSeries::new(
                density.iter().copied(),
                STEEL_BLUE.stroke_width(2),
            ))?;
        }
        Ok(())
    }

    fn draw_box<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        column: &str,
        s: &BoxSummary,
    ) -> Result<(), ChartError> {
        let (y_min, y_max) = Self::get_y_range([s.min, s.max].into_iter());

        let mut chart = ChartBuilder::on(area)
            .caption(column, (FONT, 16))
            .margin(8)
            .x_label_area_size(15)
            .y_label_area_size(50)
            .build_cartesian_2d(0.0..1.0, y_min..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|_| String::new())
            .y_labels(6)
            .draw()?;

        if s.count == 0 {
            return Ok(());
        }

        let (left, right, center) = (0.3, 0.7, 0.5);
        let (cap_left, cap_right) = (0.4, 0.6);

        // Box (filled)
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, s.q1), (right, s.q3)],
            LIGHT_BLUE.filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, s.q1), (right, s.q3)],
            STEEL_BLUE.stroke_width(2),
        )))?;

        // Median, whiskers, caps
        let segments = [
            ([(left, s.median), (right, s.median)], ORANGE.stroke_width(2)),
            ([(center, s.lower_whisker), (center, s.q1)], BLACK.stroke_width(1)),
            ([(center, s.q3), (center, s.upper_whisker)], BLACK.stroke_width(1)),
            ([(cap_left, s.lower_whisker), (cap_right, s.lower_whisker)], BLACK.stroke_width(1)),
            ([(cap_left, s.upper_whisker), (cap_right, s.upper_whisker)], BLACK.stroke_width(1)),
        ];
        chart.draw_series(
            segments
                .into_iter()
                .map(|(points, style)| PathElement::new(points.to_vec(), style)),
        )?;

        chart.draw_series(
            s.outliers
                .iter()
                .map(|&v| Circle::new((center, v), 3, DARK_RED.filled())),
        )?;
        Ok(())
    }

    /// Data range padded by 10% each side; flat or empty data gets a unit window.
    fn get_y_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
        match extent(values) {
            None => (0.0, 1.0),
            Some((lo, hi)) if hi - lo == 0.0 => (lo - 1.0, hi + 1.0),
            Some((lo, hi)) => {
                let pad = (hi - lo) * 0.1;
                (lo - pad, hi + pad)
            }
        }
    }
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    lo.is_finite().then_some((lo, hi))
}
