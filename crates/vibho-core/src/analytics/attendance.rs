//! Attendance analysis - patterns, anomalies and a short-term prediction

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AnalyticsConfig;
use crate::entropy::EntropySource;
use crate::error::{Error, Result};
use crate::models::AttendanceRecord;
use crate::stats::round_to;

use super::aggregate::{summarize, AttendancePatterns, AttendanceSummary};
use super::anomaly::AnomalyDetector;

/// Thresholds for the attendance risk score
#[derive(Debug, Clone, PartialEq)]
pub struct RiskConfig {
    pub late_arrivals: usize,
    pub early_departures: usize,
    pub absences: usize,
    /// Attendance rate (percent) below which the employee is at risk
    pub min_attendance_rate: f64,
    /// Max absolute jitter applied to the next-week prediction
    pub prediction_jitter: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            late_arrivals: 5,
            early_departures: 5,
            absences: 3,
            min_attendance_rate: 90.0,
            prediction_jitter: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendancePrediction {
    pub next_week_attendance: f64,
    pub risk_score: f64,
}

/// Response body for an attendance analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceAnalysis {
    pub patterns: AttendancePatterns,
    pub anomalies: Vec<String>,
    pub predictions: AttendancePrediction,
}

/// Risk score in `[0, 50]`: each tripped factor contributes 50, averaged
/// over the four factors.
pub fn risk_score(summary: &AttendanceSummary, config: &RiskConfig) -> f64 {
    let patterns = summary.patterns();
    let factors = [
        patterns.late_arrivals > config.late_arrivals,
        patterns.early_departures > config.early_departures,
        patterns.absenteeism > config.absences,
        summary.attendance_rate() < config.min_attendance_rate,
    ];
    let tripped = factors.iter().filter(|f| **f).count() as f64;
    tripped * 50.0 / factors.len() as f64
}

/// Predict attendance for the coming week
pub fn predict(
    summary: &AttendanceSummary,
    config: &RiskConfig,
    entropy: &mut dyn EntropySource,
) -> AttendancePrediction {
    let rate = summary.attendance_rate();
    let jitter = entropy.uniform(-config.prediction_jitter, config.prediction_jitter);
    let next_week = (rate - jitter).clamp(0.0, 100.0);

    AttendancePrediction {
        next_week_attendance: round_to(next_week, 1),
        risk_score: round_to(risk_score(summary, config), 1),
    }
}

/// Every record must be on or after the previous one.
///
/// Run detection treats adjacency as chronological; callers that cannot
/// guarantee ordering can validate with this first.
pub fn ensure_chronological(records: &[AttendanceRecord]) -> Result<()> {
    let mut previous = None;
    for (i, record) in records.iter().enumerate() {
        let Ok(date) = record.parsed_date() else {
            continue;
        };
        if let Some(prev) = previous {
            if date < prev {
                return Err(Error::InvalidInput(format!(
                    "attendance records out of order at index {}: {} precedes {}",
                    i, date, prev
                )));
            }
        }
        previous = Some(date);
    }
    Ok(())
}

/// Run aggregation, anomaly detection and prediction over one batch
pub fn analyze_attendance(
    records: &[AttendanceRecord],
    config: &AnalyticsConfig,
    entropy: &mut dyn EntropySource,
) -> Result<AttendanceAnalysis> {
    if records.is_empty() {
        return Err(Error::InvalidInput(
            "no attendance records supplied".to_string(),
        ));
    }

    let summary = summarize(records, &config.aggregate);
    if summary.malformed_timestamps > 0 {
        warn!(
            skipped = summary.malformed_timestamps,
            "Some records had unparseable timestamps"
        );
    }

    let detector = AnomalyDetector::new(&config.anomaly);
    let anomalies = detector
        .detect_all(records, entropy)
        .into_iter()
        .map(|f| f.message)
        .collect::<Vec<_>>();

    let predictions = predict(&summary, &config.risk, entropy);

    info!(
        records = records.len(),
        anomalies = anomalies.len(),
        risk = predictions.risk_score,
        "Attendance analysis complete"
    );

    Ok(AttendanceAnalysis {
        patterns: summary.patterns(),
        anomalies,
        predictions,
    })
}
