//! Core types for the Insight Composer

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entropy::EntropySource;
use crate::error::{Error, Result};

/// Analytics domain an insight request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Attendance,
    Performance,
    Payroll,
    Recruitment,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Attendance => "attendance",
            Domain::Performance => "performance",
            Domain::Payroll => "payroll",
            Domain::Recruitment => "recruitment",
        }
    }

    pub fn all() -> &'static [Domain] {
        &[
            Domain::Attendance,
            Domain::Performance,
            Domain::Payroll,
            Domain::Recruitment,
        ]
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "attendance" => Ok(Domain::Attendance),
            "performance" => Ok(Domain::Performance),
            "payroll" => Ok(Domain::Payroll),
            "recruitment" => Ok(Domain::Recruitment),
            _ => Err(format!("Unknown insight domain: {}", s)),
        }
    }
}

/// Kind of insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Prediction,
    Recommendation,
    Trend,
    Anomaly,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Prediction => "prediction",
            InsightKind::Recommendation => "recommendation",
            InsightKind::Trend => "trend",
            InsightKind::Anomaly => "anomaly",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "prediction" => Ok(InsightKind::Prediction),
            "recommendation" => Ok(InsightKind::Recommendation),
            "trend" => Ok(InsightKind::Trend),
            "anomaly" => Ok(InsightKind::Anomaly),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

/// Display priority of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Numeric rank for sorting (higher = more urgent)
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction tag carried in trend metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Positive,
    Negative,
    Up,
    Down,
    Flat,
}

/// A composed, presentation-ready analytics unit
///
/// `confidence` is a presentation signal drawn from a configured range, not a
/// calibrated probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub confidence: f64,
    pub actionable: bool,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Insight {
    pub fn new(
        kind: InsightKind,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
            confidence: 0.0,
            actionable: false,
            priority,
            metadata: None,
        }
    }

    pub fn actionable(mut self) -> Self {
        self.actionable = true;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Add one metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata
            .get_or_insert_with(serde_json::Map::new)
            .insert(key.into(), value);
        self
    }

    pub fn with_trend(self, direction: TrendDirection) -> Self {
        let value = serde_json::to_value(direction).unwrap_or(serde_json::Value::Null);
        self.with_metadata("trend", value)
    }
}

/// Configured confidence ranges
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceConfig {
    pub kinds: HashMap<InsightKind, (f64, f64)>,
    /// Per-insight overrides keyed by template id (e.g. `attendance_pattern`)
    pub templates: HashMap<String, (f64, f64)>,
}

const DEFAULT_KIND_RANGES: &[(InsightKind, (f64, f64))] = &[
    (InsightKind::Prediction, (0.6, 0.8)),
    (InsightKind::Recommendation, (0.7, 0.85)),
    (InsightKind::Trend, (0.7, 0.9)),
    (InsightKind::Anomaly, (0.7, 0.85)),
];

const DEFAULT_TEMPLATE_RANGES: &[(&str, (f64, f64))] = &[
    ("attendance_pattern", (0.8, 0.95)),
    ("late_arrival_pattern", (0.75, 0.9)),
    ("attendance_irregularities", (0.7, 0.85)),
    ("work_hour_forecast", (0.6, 0.8)),
    ("predicted_performance_rating", (0.7, 0.9)),
    ("skill_development", (0.8, 0.95)),
    ("goal_achievement_pattern", (0.75, 0.9)),
    ("goals_at_risk", (0.7, 0.85)),
    ("career_development", (0.6, 0.8)),
    ("collaboration_pattern", (0.6, 0.75)),
    ("candidate_quality_trend", (0.7, 0.85)),
    ("hiring_timeline_prediction", (0.6, 0.8)),
    ("job_description_optimization", (0.7, 0.85)),
    ("payroll_cost_forecast", (0.7, 0.9)),
    ("payroll_cost_trend", (0.7, 0.85)),
    ("payroll_cost_optimization", (0.6, 0.8)),
];

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            kinds: DEFAULT_KIND_RANGES.iter().copied().collect(),
            templates: DEFAULT_TEMPLATE_RANGES
                .iter()
                .map(|(name, range)| (name.to_string(), *range))
                .collect(),
        }
    }
}

impl ConfidenceConfig {
    /// Range for a template, falling back to its kind, then to `[0.5, 0.5]`
    pub fn range_for(&self, template: &str, kind: InsightKind) -> (f64, f64) {
        self.templates
            .get(template)
            .or_else(|| self.kinds.get(&kind))
            .copied()
            .unwrap_or((0.5, 0.5))
    }

    /// Draw a confidence value for a template
    pub fn draw(&self, template: &str, kind: InsightKind, entropy: &mut dyn EntropySource) -> f64 {
        let (low, high) = self.range_for(template, kind);
        entropy.uniform(low, high)
    }

    pub fn validate(&self) -> Result<()> {
        let ranges = self
            .kinds
            .iter()
            .map(|(k, r)| (k.as_str().to_string(), r))
            .chain(self.templates.iter().map(|(k, r)| (k.clone(), r)));

        for (name, (low, high)) in ranges {
            if !(0.0..=1.0).contains(low) || !(0.0..=1.0).contains(high) || low > high {
                return Err(Error::Config(format!(
                    "confidence range for {} must satisfy 0 <= low <= high <= 1",
                    name
                )));
            }
        }
        Ok(())
    }
}
