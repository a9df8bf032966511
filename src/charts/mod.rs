//! Charts module - figure descriptions, drawing surfaces and rendering

mod figure;
mod renderer;
mod surface;

pub use figure::{month_ticks, BarPlot, Figure, LinePlot, PanelPlot, PanelSlot, MONTH_ABBR};
pub use renderer::StaticChartRenderer;
pub use surface::{BitmapSurface, ChartError, ChartSurface, RecordingSurface, RenderedChart};
