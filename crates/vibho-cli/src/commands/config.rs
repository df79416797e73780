//! Config inspection commands

use std::path::Path;

use anyhow::Result;
use serde_json::{json, Value};
use vibho_core::config::{default_config_path, resolve_path};
use vibho_core::AnalyticsConfig;

/// Raw TOML of the config in effect
pub fn cmd_config_show(explicit: Option<&Path>) -> Result<String> {
    Ok(AnalyticsConfig::source_text(explicit)?)
}

/// Override location and which layer is active
pub fn cmd_config_path(explicit: Option<&Path>) -> Value {
    let override_path = default_config_path();
    let active = resolve_path(explicit);

    json!({
        "override": override_path.as_ref().map(|p| p.display().to_string()),
        "overrideExists": override_path.as_ref().is_some_and(|p| p.exists()),
        "active": active
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "embedded".to_string()),
    })
}
