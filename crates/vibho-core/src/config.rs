//! Analytics configuration
//!
//! Thresholds, catalogs and confidence ranges for every stage, loaded from
//! TOML. Config is resolved in layers:
//! 1. An explicit path (e.g. `--config`), if given and present
//! 2. Override in data dir (~/.local/share/vibho/config/analytics.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Every key is optional; a partial file only overrides what it names.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::Deserialize;
use tracing::debug;

use crate::analytics::aggregate::AggregateConfig;
use crate::analytics::anomaly::AnomalyConfig;
use crate::analytics::attendance::RiskConfig;
use crate::analytics::forecast::{ForecastConfig, MAX_HORIZON};
use crate::analytics::payroll::PayrollConfig;
use crate::error::{Error, Result};
use crate::insights::types::{ConfidenceConfig, InsightKind};
use crate::models::AttendanceStatus;

/// Embedded default config (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../../config/analytics.toml");

/// Configuration for every analytics stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsConfig {
    pub aggregate: AggregateConfig,
    pub anomaly: AnomalyConfig,
    pub forecast: ForecastConfig,
    pub risk: RiskConfig,
    pub payroll: PayrollConfig,
    pub confidence: ConfidenceConfig,
}

impl AnalyticsConfig {
    /// Resolve config through the override layers
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match resolve_path(path) {
            Some(path) => {
                debug!(path = %path.display(), "Loading analytics config");
                fs::read_to_string(&path)
                    .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
            }
            None => DEFAULT_CONFIG.to_string(),
        };
        parse_config(&content)
    }

    /// Raw TOML of whichever layer `load` would read
    pub fn source_text(path: Option<&Path>) -> Result<String> {
        match resolve_path(path) {
            Some(path) => Ok(fs::read_to_string(path)?),
            None => Ok(DEFAULT_CONFIG.to_string()),
        }
    }

    /// Embedded defaults only
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.anomaly.fallback_catalog.is_empty() {
            return Err(Error::Config(
                "anomaly.fallback_catalog must not be empty".to_string(),
            ));
        }
        if self.anomaly.dispersion_moderate > self.anomaly.dispersion_high {
            return Err(Error::Config(
                "anomaly.dispersion_moderate must not exceed dispersion_high".to_string(),
            ));
        }
        if self.forecast.horizon == 0 || self.forecast.horizon > MAX_HORIZON {
            return Err(Error::Config(format!(
                "forecast.horizon must be between 1 and {}",
                MAX_HORIZON
            )));
        }
        if !(0.0..1.0).contains(&self.forecast.noise_amplitude) {
            return Err(Error::Config(
                "forecast.noise_amplitude must be in [0, 1)".to_string(),
            ));
        }
        if !(self.forecast.uncertainty_ratio >= 0.0 && self.forecast.uncertainty_ratio.is_finite()) {
            return Err(Error::Config(
                "forecast.uncertainty_ratio must be a non-negative number".to_string(),
            ));
        }
        if self.forecast.seasonal_period == 0 || self.forecast.period_days <= 0 {
            return Err(Error::Config(
                "forecast.seasonal_period and period_days must be positive".to_string(),
            ));
        }
        if self.payroll.history_months == 0 || self.payroll.history_months > MAX_HORIZON {
            return Err(Error::Config(format!(
                "payroll.history_months must be between 1 and {}",
                MAX_HORIZON
            )));
        }
        if self.aggregate.full_day_hours <= 0.0 {
            return Err(Error::Config(
                "aggregate.full_day_hours must be positive".to_string(),
            ));
        }
        self.confidence.validate()
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("vibho").join("config").join("analytics.toml"))
}

/// First existing file among the explicit path and the default override.
///
/// `None` means the embedded defaults are in effect.
pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }
    default_config_path().filter(|p| p.exists())
}

/// Raw config structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    aggregate: Option<RawAggregate>,
    anomaly: Option<RawAnomaly>,
    forecast: Option<RawForecast>,
    risk: Option<RawRisk>,
    payroll: Option<RawPayroll>,
    confidence: Option<RawConfidence>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAggregate {
    full_day_hours: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAnomaly {
    run_status: Option<String>,
    run_threshold: Option<usize>,
    conditioned_status: Option<String>,
    conditioned_weekday: Option<String>,
    conditioned_threshold: Option<usize>,
    dispersion_moderate: Option<f64>,
    dispersion_high: Option<f64>,
    fallback_catalog: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawForecast {
    horizon: Option<usize>,
    noise_amplitude: Option<f64>,
    uncertainty_ratio: Option<f64>,
    period_days: Option<i64>,
    seasonal_period: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRisk {
    late_arrivals: Option<usize>,
    early_departures: Option<usize>,
    absences: Option<usize>,
    min_attendance_rate: Option<f64>,
    prediction_jitter: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPayroll {
    base_amount: Option<f64>,
    history_months: Option<usize>,
    tips_per_response: Option<usize>,
    cost_optimization_catalog: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfidence {
    kinds: Option<HashMap<String, [f64; 2]>>,
    templates: Option<HashMap<String, [f64; 2]>>,
}

fn parse_status(raw: &str) -> Result<AttendanceStatus> {
    raw.parse().map_err(Error::Config)
}

fn parse_weekday(raw: &str) -> Result<Weekday> {
    raw.parse::<Weekday>()
        .map_err(|_| Error::Config(format!("Unknown weekday: {}", raw)))
}

/// Parse config from TOML content
pub fn parse_config(content: &str) -> Result<AnalyticsConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    let mut config = AnalyticsConfig::default();

    if let Some(aggregate) = raw.aggregate {
        if let Some(hours) = aggregate.full_day_hours {
            config.aggregate.full_day_hours = hours;
        }
    }

    if let Some(anomaly) = raw.anomaly {
        let target = &mut config.anomaly;
        if let Some(status) = anomaly.run_status {
            target.run_status = parse_status(&status)?;
        }
        if let Some(threshold) = anomaly.run_threshold {
            target.run_threshold = threshold;
        }
        if let Some(status) = anomaly.conditioned_status {
            target.conditioned_status = parse_status(&status)?;
        }
        if let Some(day) = anomaly.conditioned_weekday {
            target.conditioned_weekday = parse_weekday(&day)?;
        }
        if let Some(threshold) = anomaly.conditioned_threshold {
            target.conditioned_threshold = threshold;
        }
        if let Some(moderate) = anomaly.dispersion_moderate {
            target.dispersion_moderate = moderate;
        }
        if let Some(high) = anomaly.dispersion_high {
            target.dispersion_high = high;
        }
        if let Some(catalog) = anomaly.fallback_catalog {
            target.fallback_catalog = catalog;
        }
    }

    if let Some(forecast) = raw.forecast {
        let target = &mut config.forecast;
        if let Some(horizon) = forecast.horizon {
            target.horizon = horizon;
        }
        if let Some(noise) = forecast.noise_amplitude {
            target.noise_amplitude = noise;
        }
        if let Some(ratio) = forecast.uncertainty_ratio {
            target.uncertainty_ratio = ratio;
        }
        if let Some(days) = forecast.period_days {
            target.period_days = days;
        }
        if let Some(period) = forecast.seasonal_period {
            target.seasonal_period = period;
        }
    }

    if let Some(risk) = raw.risk {
        let target = &mut config.risk;
        if let Some(n) = risk.late_arrivals {
            target.late_arrivals = n;
        }
        if let Some(n) = risk.early_departures {
            target.early_departures = n;
        }
        if let Some(n) = risk.absences {
            target.absences = n;
        }
        if let Some(rate) = risk.min_attendance_rate {
            target.min_attendance_rate = rate;
        }
        if let Some(jitter) = risk.prediction_jitter {
            target.prediction_jitter = jitter;
        }
    }

    if let Some(payroll) = raw.payroll {
        let target = &mut config.payroll;
        if let Some(amount) = payroll.base_amount {
            target.base_amount = amount;
        }
        if let Some(months) = payroll.history_months {
            target.history_months = months;
        }
        if let Some(tips) = payroll.tips_per_response {
            target.tips_per_response = tips;
        }
        if let Some(catalog) = payroll.cost_optimization_catalog {
            target.cost_optimization_catalog = catalog;
        }
    }

    if let Some(confidence) = raw.confidence {
        for (kind, [low, high]) in confidence.kinds.unwrap_or_default() {
            let kind: InsightKind = kind.parse().map_err(Error::Config)?;
            config.confidence.kinds.insert(kind, (low, high));
        }
        for (template, [low, high]) in confidence.templates.unwrap_or_default() {
            config.confidence.templates.insert(template, (low, high));
        }
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_matches_code_defaults() {
        let parsed = AnalyticsConfig::embedded().unwrap();
        assert_eq!(parsed, AnalyticsConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = parse_config(
            r#"
            [anomaly]
            conditioned_weekday = "friday"
            fallback_catalog = ["Only option"]

            [forecast]
            horizon = 6
            "#,
        )
        .unwrap();

        assert_eq!(config.anomaly.conditioned_weekday, Weekday::Fri);
        assert_eq!(config.anomaly.fallback_catalog, vec!["Only option"]);
        assert_eq!(config.forecast.horizon, 6);
        // untouched sections keep defaults
        assert_eq!(config.anomaly.dispersion_high, 60.0);
        assert_eq!(config.payroll.tips_per_response, 3);
    }

    #[test]
    fn test_empty_fallback_catalog_rejected() {
        let err = parse_config("[anomaly]\nfallback_catalog = []\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_horizon_rejected() {
        assert!(parse_config("[forecast]\nhorizon = 0\n").is_err());
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(parse_config("[anomaly]\nrun_status = \"sleeping\"\n").is_err());
        assert!(parse_config("[anomaly]\nconditioned_weekday = \"someday\"\n").is_err());
        assert!(parse_config("[confidence.kinds]\nguess = [0.1, 0.2]\n").is_err());
        assert!(parse_config("[confidence.templates]\nx = [0.9, 0.1]\n").is_err());
        assert!(parse_config("[unknown]\nkey = 1\n").is_err());
    }

    #[test]
    fn test_forecast_band_settings_rejected() {
        assert!(parse_config("[forecast]\nuncertainty_ratio = -0.1\n").is_err());
        assert!(parse_config("[forecast]\nnoise_amplitude = 1.0\n").is_err());
        assert!(parse_config("[forecast]\nnoise_amplitude = -0.01\n").is_err());
        assert!(parse_config("[forecast]\nhorizon = 5000\n").is_err());
        assert!(parse_config("[payroll]\nhistory_months = 0\n").is_err());

        let config = parse_config("[forecast]\nnoise_amplitude = 0.0\nuncertainty_ratio = 0.0\n").unwrap();
        assert_eq!(config.forecast.noise_amplitude, 0.0);
        assert_eq!(config.forecast.uncertainty_ratio, 0.0);
    }

    #[test]
    fn test_misspelled_section_key_rejected() {
        let err = parse_config("[anomaly]\nfallback_catalg = [\"x\"]\n").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
        assert!(parse_config("[forecast]\nhorzion = 4\n").is_err());
        assert!(parse_config("[confidence]\ntemplate = {}\n").is_err());
    }

    #[test]
    fn test_confidence_override() {
        let config = parse_config("[confidence.templates]\nattendance_pattern = [0.5, 0.5]\n").unwrap();
        assert_eq!(
            config.confidence.range_for("attendance_pattern", InsightKind::Trend),
            (0.5, 0.5)
        );
    }

    #[test]
    fn test_missing_explicit_path_falls_through() {
        let missing = Path::new("/nonexistent/vibho/analytics.toml");
        if default_config_path().map_or(true, |p| !p.exists()) {
            assert!(resolve_path(Some(missing)).is_none());
            assert_eq!(AnalyticsConfig::source_text(Some(missing)).unwrap(), DEFAULT_CONFIG);
        }
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[risk]\nabsences = 7").unwrap();

        let config = AnalyticsConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.risk.absences, 7);
    }
}
