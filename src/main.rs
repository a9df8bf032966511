//! Weather EDA - replays the standard analysis session over one CSV file
//!
//! Usage: `weather-eda <observations.csv> [out_dir]`
//!
//! `WEATHER_EDA_CONFIG` points at an optional JSON config, `WEATHER_EDA_SHOW=1`
//! opens each chart in the system viewer, `RUST_LOG` sets the log level.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use weather_eda::config::{TEMP, VISIBILITY, WEATHER};
use weather_eda::{
    group_values, line_chart, plot_categorical_columns, plot_cont, Aggregation, BitmapSurface,
    EdaConfig, ObservationTable, Period, PlotKind,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let csv = args
        .next()
        .context("usage: weather-eda <observations.csv> [out_dir]")?;
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "charts".to_string()));

    let config = match std::env::var("WEATHER_EDA_CONFIG") {
        Ok(path) => EdaConfig::from_json_file(&path)
            .with_context(|| format!("loading config {}", path))?,
        Err(_) => EdaConfig::default(),
    };

    // Nothing else can run without the table
    let mut table = ObservationTable::load(&csv, &config)
        .with_context(|| format!("loading observations from {}", csv))?;

    let mut surface = BitmapSurface::new(config.chart.clone());

    let monthly = line_chart(&mut table, Period::Month, TEMP, &mut surface)?;
    info!(months = monthly.len(), "monthly mean temperature");

    let counts = plot_categorical_columns(&table, &config, &mut surface)?;
    info!(labels = counts.len(), "weather label counts");

    plot_cont(&table, PlotKind::Distplot, &config, &mut surface)?;
    plot_cont(&table, PlotKind::Boxplot, &config, &mut surface)?;

    let visibility = group_values(
        &table,
        WEATHER,
        &Aggregation::Mean.into(),
        VISIBILITY,
        &mut surface,
    )?;
    for (weather, mean) in &visibility.entries {
        info!(%weather, mean, "mean visibility");
    }

    let written = surface.save_all(&out_dir)?;
    for path in &written {
        println!("{}", path.display());
    }

    if std::env::var("WEATHER_EDA_SHOW").is_ok_and(|v| v == "1") {
        for chart in surface.charts() {
            chart.show()?;
        }
    }
    Ok(())
}
