//! Drawing targets for figures.

use crate::charts::{Figure, StaticChartRenderer};
use crate::config::ChartConfig;
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Drawing backend error: {0}")]
    Backend(String),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Pixel buffer does not match {width}x{height}")]
    BufferSize { width: u32, height: u32 },
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Backend(err.to_string())
    }
}

/// Anything a figure can be drawn onto. Every analysis call takes one
/// explicitly instead of drawing into shared global state.
pub trait ChartSurface {
    fn draw(&mut self, figure: &Figure) -> Result<(), ChartError>;
}

/// Keeps figures as data. Useful for inspecting what would be drawn,
/// or exporting it as JSON for another plotting front end.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    figures: Vec<Figure>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    pub fn last(&self) -> Option<&Figure> {
        self.figures.last()
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    pub fn to_json(&self) -> Result<String, ChartError> {
        Ok(serde_json::to_string_pretty(&self.figures)?)
    }
}

impl ChartSurface for RecordingSurface {
    fn draw(&mut self, figure: &Figure) -> Result<(), ChartError> {
        debug!(title = figure.title(), "recorded figure");
        self.figures.push(figure.clone());
        Ok(())
    }
}

/// An RGB raster produced by [`BitmapSurface`].
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pixels: Vec<u8>,
}

impl RenderedChart {
    fn to_image(&self) -> Result<RgbImage, ChartError> {
        RgbImage::from_raw(self.width, self.height, self.pixels.clone()).ok_or(
            ChartError::BufferSize {
                width: self.width,
                height: self.height,
            },
        )
    }

    /// File-name friendly form of the title.
    pub fn slug(&self) -> String {
        let slug: String = self
            .title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        slug.split('_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_")
    }

    pub fn to_png_bytes(&self) -> Result<Vec<u8>, ChartError> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(self.to_image()?)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    pub fn save_png(&self, path: &Path) -> Result<(), ChartError> {
        self.to_image()?.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    /// Write to the temp directory and open in the system image viewer.
    pub fn show(&self) -> Result<PathBuf, ChartError> {
        let path = std::env::temp_dir().join(format!("{}.png", self.slug()));
        self.save_png(&path)?;
        open::that(&path)?;
        Ok(path)
    }
}

/// Rasterises figures with Plotters into in-memory RGB buffers.
pub struct BitmapSurface {
    config: ChartConfig,
    charts: Vec<RenderedChart>,
}

impl BitmapSurface {
    pub fn new(config: ChartConfig) -> Self {
        Self {
            config,
            charts: Vec::new(),
        }
    }

    pub fn charts(&self) -> &[RenderedChart] {
        &self.charts
    }

    /// Save every chart as `NN_<slug>.png` under `dir`, in drawing order.
    pub fn save_all(&self, dir: &Path) -> Result<Vec<PathBuf>, ChartError> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(self.charts.len());
        for (i, chart) in self.charts.iter().enumerate() {
            let path = dir.join(format!("{:02}_{}.png", i + 1, chart.slug()));
            chart.save_png(&path)?;
            written.push(path);
        }
        info!(count = written.len(), dir = %dir.display(), "saved charts");
        Ok(written)
    }

    fn size_for(&self, figure: &Figure) -> (u32, u32) {
        match figure {
            Figure::Panel(_) => (self.config.panel_width, self.config.panel_height),
            _ => (self.config.width, self.config.height),
        }
    }
}

impl ChartSurface for BitmapSurface {
    fn draw(&mut self, figure: &Figure) -> Result<(), ChartError> {
        let (width, height) = self.size_for(figure);
        let mut pixels = vec![255u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
            root.fill(&WHITE)?;
            StaticChartRenderer::render(&root, figure)?;
            root.present()?;
        }
        debug!(title = figure.title(), width, height, "rendered figure");

        self.charts.push(RenderedChart {
            title: figure.title().to_string(),
            width,
            height,
            pixels,
        });
        Ok(())
    }
}
