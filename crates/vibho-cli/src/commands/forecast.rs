//! Series forecast command

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use vibho_core::{AnalyticsConfig, EntropySource, Forecaster, TimePoint};

#[derive(Deserialize)]
#[serde(untagged)]
enum SeriesInput {
    Points(Vec<TimePoint>),
    Wrapped { series: Vec<TimePoint> },
}

pub fn cmd_forecast(
    input: &str,
    horizon: Option<usize>,
    config: &AnalyticsConfig,
    entropy: &mut dyn EntropySource,
) -> Result<Value> {
    let parsed: SeriesInput =
        serde_json::from_str(input).context("Expected a list of {date, value} points")?;
    let series = match parsed {
        SeriesInput::Points(points) => points,
        SeriesInput::Wrapped { series } => series,
    };

    let horizon = horizon.unwrap_or(config.forecast.horizon);
    let forecast = Forecaster::new(&config.forecast).forecast(&series, horizon, entropy)?;

    Ok(json!({
        "slope": forecast.model.slope,
        "seasonalIndex": forecast.model.seasonal_index,
        "forecast": forecast.points,
    }))
}
