//! Analysis Configuration
//! Column names of interest, date parsing and chart dimensions, loadable from JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const DATE_TIME: &str = "Date/Time";
pub const TEMP: &str = "Temp (C)";
pub const DEW_POINT: &str = "Dew Point Temp (C)";
pub const REL_HUM: &str = "Rel Hum (%)";
pub const WIND_SPEED: &str = "Wind Spd (km/h)";
pub const VISIBILITY: &str = "Visibility (km)";
pub const STN_PRESS: &str = "Stn Press (kPa)";
pub const WEATHER: &str = "Weather";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Output dimensions for rasterised charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    /// The 3x2 distribution panel gets its own, taller canvas.
    pub panel_width: u32,
    pub panel_height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            panel_width: 1200,
            panel_height: 1200,
        }
    }
}

/// Which columns the analysis functions look at.
///
/// Columns are checked against the loaded table every time an analysis runs,
/// so a config written for one export of the dataset fails loudly on another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdaConfig {
    pub date_column: String,
    /// `chrono` format strings tried in order; date-only formats map to midnight.
    pub date_formats: Vec<String>,
    pub categorical_column: String,
    pub continuous_columns: Vec<String>,
    /// (rows, cols) of the distribution panel.
    pub panel_grid: (usize, usize),
    pub chart: ChartConfig,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            date_column: DATE_TIME.to_string(),
            date_formats: vec![
                "%Y-%m-%d %H:%M".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%d %H:%M:%S%.f".to_string(),
                "%m/%d/%Y %H:%M".to_string(),
                "%Y-%m-%d".to_string(),
            ],
            categorical_column: WEATHER.to_string(),
            continuous_columns: [TEMP, DEW_POINT, REL_HUM, WIND_SPEED, VISIBILITY, STN_PRESS]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            panel_grid: (3, 2),
            chart: ChartConfig::default(),
        }
    }
}

impl EdaConfig {
    /// Parse and validate a JSON config. Missing fields fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EdaConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.date_column.is_empty() {
            return Err(ConfigError::Invalid("date_column is empty".into()));
        }
        if self.date_formats.is_empty() {
            return Err(ConfigError::Invalid("no date_formats given".into()));
        }
        let (rows, cols) = self.panel_grid;
        if rows == 0 || cols == 0 {
            return Err(ConfigError::Invalid(format!(
                "panel_grid must be non-zero, got {}x{}",
                rows, cols
            )));
        }
        if self.continuous_columns.len() > rows * cols {
            return Err(ConfigError::Invalid(format!(
                "{} continuous columns do not fit a {}x{} panel",
                self.continuous_columns.len(),
                rows,
                cols
            )));
        }
        let c = &self.chart;
        if c.width == 0 || c.height == 0 || c.panel_width == 0 || c.panel_height == 0 {
            return Err(ConfigError::Invalid("chart dimensions must be non-zero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EdaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.continuous_columns.len(), 6);
        assert_eq!(config.panel_grid, (3, 2));
        assert_eq!(config.categorical_column, "Weather");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EdaConfig::from_json_str(r#"{"categorical_column": "Sky"}"#).unwrap();
        assert_eq!(config.categorical_column, "Sky");
        assert_eq!(config.date_column, DATE_TIME);
        assert_eq!(config.chart, ChartConfig::default());
    }

    #[test]
    fn rejects_panel_too_small_for_columns() {
        let err = EdaConfig::from_json_str(r#"{"panel_grid": [2, 2]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = EdaConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
