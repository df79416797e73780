//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `attendance` - Attendance analysis
//! - `payroll` - Payroll cost prediction
//! - `insights` - Insight composition per domain
//! - `forecast` - Raw series forecasting
//! - `config` - Config inspection (show, path)
//!
//! Every analytics command returns its result as JSON; `main` renders it and
//! maps errors to the failure shape.

pub mod attendance;
pub mod config;
pub mod forecast;
pub mod insights;
pub mod payroll;

// Re-export command functions for main.rs
pub use attendance::*;
pub use config::*;
pub use forecast::*;
pub use insights::*;
pub use payroll::*;

use std::fs;
use std::io::{IsTerminal, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use vibho_core::{AnalyticsConfig, SeededEntropy};

/// Load analytics config; an explicit path must exist
pub fn load_config(path: Option<&Path>) -> Result<AnalyticsConfig> {
    if let Some(path) = path {
        if !path.exists() {
            bail!("Config file not found: {}", path.display());
        }
    }
    AnalyticsConfig::load(path).context("Failed to load analytics config")
}

/// Seeded entropy when a seed is given, OS-seeded otherwise
pub fn entropy(seed: Option<u64>) -> SeededEntropy {
    match seed {
        Some(seed) => SeededEntropy::new(seed),
        None => SeededEntropy::from_entropy(),
    }
}

/// Config and entropy for one analytics run
pub fn session(config: Option<&Path>, seed: Option<u64>) -> Result<(AnalyticsConfig, SeededEntropy)> {
    Ok((load_config(config)?, entropy(seed)))
}

/// Input from the inline argument, else the file, else piped stdin
pub fn read_input(inline: Option<&str>, file: Option<&Path>) -> Result<String> {
    if let Some(data) = inline {
        return Ok(data.to_string());
    }

    if let Some(path) = file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!("No input: pass JSON inline, use --file, or pipe data to stdin");
    }
    let mut buffer = String::new();
    stdin
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
    Ok(buffer)
}

/// Serialize a result for stdout
pub fn render(value: &Value, pretty: bool) -> Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(out)
}

/// Failure body printed in place of a result
pub fn failure(err: &anyhow::Error) -> String {
    json!({
        "success": false,
        "message": format!("{:#}", err),
    })
    .to_string()
}
