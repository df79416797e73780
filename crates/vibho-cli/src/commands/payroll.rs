//! Payroll prediction command

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use vibho_core::{predict_payroll, AnalyticsConfig, EntropySource, TimePoint};

/// History file: a bare array, or an object wrapping it under `historicalData`
#[derive(Deserialize)]
#[serde(untagged)]
enum HistoryFile {
    Points(Vec<TimePoint>),
    #[serde(rename_all = "camelCase")]
    Wrapped { historical_data: Vec<TimePoint> },
}

fn read_history(path: &Path) -> Result<Vec<TimePoint>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let parsed: HistoryFile = serde_json::from_str(&content)
        .with_context(|| format!("Invalid payroll history in {}", path.display()))?;
    Ok(match parsed {
        HistoryFile::Points(points) => points,
        HistoryFile::Wrapped { historical_data } => historical_data,
    })
}

pub fn cmd_payroll(
    month: u32,
    year: i32,
    history: Option<&Path>,
    horizon: Option<usize>,
    config: &AnalyticsConfig,
    entropy: &mut dyn EntropySource,
) -> Result<Value> {
    let history = history.map(read_history).transpose()?;
    let prediction = predict_payroll(month, year, history, horizon, config, entropy)?;
    Ok(serde_json::to_value(prediction)?)
}
