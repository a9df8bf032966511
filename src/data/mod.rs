//! Data module - CSV loading and column extraction

mod loader;
mod processor;

pub use loader::{LoadError, ObservationTable, Period};
pub use processor::{is_numeric, DataProcessor, ProcessorError};
