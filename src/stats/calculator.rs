//! Statistics Calculator Module
//! Box-plot summaries, histogram binning and Gaussian kernel density estimates.

use serde::Serialize;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

/// Maximum histogram bins for a distribution plot.
pub const MAX_BINS: usize = 50;

/// Points sampled along the x axis for a KDE curve.
pub const KDE_POINTS: usize = 200;

/// Whisker reach, in interquartile ranges beyond the box.
pub const WHISKER_IQR: f64 = 1.5;

/// Five-number summary plus whiskers and outliers for one column.
#[derive(Debug, Clone, Serialize)]
pub struct BoxSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl Default for BoxSummary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            min: f64::NAN,
            q1: f64::NAN,
            median: f64::NAN,
            q3: f64::NAN,
            max: f64::NAN,
            lower_whisker: f64::NAN,
            upper_whisker: f64::NAN,
            outliers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
    /// Normalised so the bar areas sum to one.
    pub density: f64,
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted
    }

    pub fn box_summary(values: &[f64]) -> BoxSummary {
        let n = values.len();
        if n == 0 {
            return BoxSummary::default();
        }

        let sorted = Self::sorted(values);
        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        // Whiskers stop at the most extreme data points inside the fences
        let lower_whisker = *sorted.iter().find(|&&v| v >= low_fence).unwrap_or(&q1);
        let upper_whisker = *sorted
            .iter()
            .rev()
            .find(|&&v| v <= high_fence)
            .unwrap_or(&q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        BoxSummary {
            count: n,
            mean: values.iter().sum::<f64>() / n as f64,
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[n - 1],
            lower_whisker,
            upper_whisker,
            outliers,
        }
    }

    /// Freedman-Diaconis bin count, capped at [`MAX_BINS`].
    pub fn freedman_diaconis_bins(values: &[f64]) -> usize {
        let n = values.len();
        if n < 2 {
            return 1;
        }

        let sorted = Self::sorted(values);
        let iqr = Self::percentile(&sorted, 75.0) - Self::percentile(&sorted, 25.0);
        let width = 2.0 * iqr / (n as f64).cbrt();
        let bins = if width == 0.0 {
            (n as f64).sqrt() as usize
        } else {
            ((sorted[n - 1] - sorted[0]) / width).ceil() as usize
        };
        bins.clamp(1, MAX_BINS)
    }

    /// Equal-width histogram over `[min, max]`; the last bin is closed.
    pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        if values.is_empty() || bins == 0 {
            return Vec::new();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        // A constant column still gets one visible bar
        let (min, max) = if max > min { (min, max) } else { (min - 0.5, max + 0.5) };
        let width = (max - min) / bins as f64;

        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - min) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let total = values.len() as f64;
        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: min + i as f64 * width,
                end: min + (i + 1) as f64 * width,
                count,
                density: count as f64 / (total * width),
            })
            .collect()
    }

    /// Scott's rule bandwidth, `None` when the data has no spread.
    pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
        if values.len() < 2 {
            return None;
        }
        let std = values.iter().std_dev();
        let bw = std * (values.len() as f64).powf(-0.2);
        (bw.is_finite() && bw > 0.0).then_some(bw)
    }

    /// Gaussian KDE sampled at `points` evenly spaced positions reaching
    /// three bandwidths past the data on both sides.
    pub fn gaussian_kde(values: &[f64], points: usize) -> Vec<(f64, f64)> {
        let Some(bw) = Self::scott_bandwidth(values) else {
            return Vec::new();
        };
        let Ok(kernel) = Normal::new(0.0, 1.0) else {
            return Vec::new();
        };
        if points < 2 {
            return Vec::new();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min) - 3.0 * bw;
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 3.0 * bw;
        let step = (max - min) / (points - 1) as f64;
        let scale = 1.0 / (values.len() as f64 * bw);

        (0..points)
            .map(|i| {
                let x = min + i as f64 * step;
                let density = values
                    .iter()
                    .map(|&xi| kernel.pdf((x - xi) / bw))
                    .sum::<f64>()
                    * scale;
                (x, density)
            })
            .collect()
    }
}
