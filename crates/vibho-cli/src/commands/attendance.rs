//! Attendance analysis command

use anyhow::{Context, Result};
use serde_json::Value;
use vibho_core::analytics::attendance::{analyze_attendance, ensure_chronological};
use vibho_core::import::{parse_records, RecordFormat};
use vibho_core::{AnalyticsConfig, EntropySource};

pub fn cmd_attendance(
    input: &str,
    format: RecordFormat,
    strict_order: bool,
    config: &AnalyticsConfig,
    entropy: &mut dyn EntropySource,
) -> Result<Value> {
    let records = parse_records(input.as_bytes(), format)
        .with_context(|| format!("Failed to read attendance records as {}", format))?;

    if strict_order {
        ensure_chronological(&records)?;
    }

    let analysis = analyze_attendance(&records, config, entropy)?;
    Ok(serde_json::to_value(analysis)?)
}
