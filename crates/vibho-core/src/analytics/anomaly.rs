//! Anomaly detection over attendance records
//!
//! Each rule follows the same shape: scan the batch, compare a count or a
//! dispersion against a threshold, emit a [`Finding`]. Rules:
//! - Consecutive runs: adjacent records sharing a target status
//! - Dispersion: spread of check-in minute-of-day
//! - Conditioned counts: a status on a given weekday
//!
//! When no rule fires, one generic finding is drawn from a configurable
//! fallback catalog so callers always have something to show.

use chrono::{Datelike, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entropy::EntropySource;
use crate::models::{AttendanceRecord, AttendanceStatus};
use crate::stats::population_std_dev;

/// Which rule produced a finding; callers derive severity from this
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyRule {
    ConsecutiveRun,
    Dispersion,
    ConditionedCount,
    Fallback,
}

impl AnomalyRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyRule::ConsecutiveRun => "consecutive_run",
            AnomalyRule::Dispersion => "dispersion",
            AnomalyRule::ConditionedCount => "conditioned_count",
            AnomalyRule::Fallback => "fallback",
        }
    }
}

/// How spread out a numeric signal is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispersionLevel {
    None,
    Moderate,
    High,
}

/// A single textual observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub rule: AnomalyRule,
    pub message: String,
}

impl Finding {
    pub fn new(rule: AnomalyRule, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.rule == AnomalyRule::Fallback
    }
}

/// Default fallback statements, used when no rule fires
pub const DEFAULT_FALLBACK_CATALOG: &[&str] = &[
    "Frequent late arrivals on Mondays",
    "Extended lunch breaks detected",
    "Irregular work hours pattern",
    "Frequent early departures on Fridays",
    "Inconsistent working hours",
];

/// Anomaly detection configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyConfig {
    /// Status whose adjacent repeats are counted
    pub run_status: AttendanceStatus,
    /// Emit a run finding when the pair count exceeds this
    pub run_threshold: usize,
    /// Status counted on the conditioned weekday
    pub conditioned_status: AttendanceStatus,
    pub conditioned_weekday: Weekday,
    /// Emit a conditioned finding when the count exceeds this
    pub conditioned_threshold: usize,
    /// Std-dev (minutes) above which check-ins are moderately irregular
    pub dispersion_moderate: f64,
    /// Std-dev (minutes) above which check-ins are highly irregular
    pub dispersion_high: f64,
    /// Generic statements for the fallback policy; must not be empty
    pub fallback_catalog: Vec<String>,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            run_status: AttendanceStatus::Late,
            run_threshold: 1,
            conditioned_status: AttendanceStatus::Absent,
            conditioned_weekday: Weekday::Mon,
            conditioned_threshold: 1,
            dispersion_moderate: 30.0,
            dispersion_high: 60.0,
            fallback_catalog: DEFAULT_FALLBACK_CATALOG
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Runs the rule set against a batch of records
pub struct AnomalyDetector<'a> {
    config: &'a AnomalyConfig,
}

impl<'a> AnomalyDetector<'a> {
    pub fn new(config: &'a AnomalyConfig) -> Self {
        Self { config }
    }

    /// Number of directly adjacent pairs that both have `status`.
    ///
    /// Records are assumed to be in chronological order.
    pub fn count_adjacent_pairs(records: &[AttendanceRecord], status: AttendanceStatus) -> usize {
        records
            .windows(2)
            .filter(|pair| pair[0].status == status && pair[1].status == status)
            .count()
    }

    /// Consecutive-run rule
    pub fn detect_runs(&self, records: &[AttendanceRecord]) -> Option<Finding> {
        let status = self.config.run_status;
        let runs = Self::count_adjacent_pairs(records, status);
        debug!(status = status.as_str(), runs, "Consecutive run check");

        if runs > self.config.run_threshold {
            Some(Finding::new(
                AnomalyRule::ConsecutiveRun,
                format!("Detected {} consecutive {}", runs, status_phrase(status)),
            ))
        } else {
            None
        }
    }

    /// Check-in minute-of-day for every record with a parsable check-in
    pub fn check_in_minutes(records: &[AttendanceRecord]) -> Vec<f64> {
        records
            .iter()
            .filter_map(|record| match record.parsed_check_in() {
                Ok(Some(ts)) => Some((ts.hour() * 60 + ts.minute()) as f64),
                Ok(None) => None,
                Err(e) => {
                    debug!(error = %e, "Skipping record for dispersion check");
                    None
                }
            })
            .collect()
    }

    /// Classify the population std-dev of `samples`
    pub fn classify_dispersion(&self, samples: &[f64]) -> DispersionLevel {
        if samples.is_empty() {
            return DispersionLevel::None;
        }
        let std_dev = population_std_dev(samples);
        if std_dev > self.config.dispersion_high {
            DispersionLevel::High
        } else if std_dev > self.config.dispersion_moderate {
            DispersionLevel::Moderate
        } else {
            DispersionLevel::None
        }
    }

    /// Dispersion rule over check-in times
    pub fn detect_dispersion(&self, records: &[AttendanceRecord]) -> Option<Finding> {
        let minutes = Self::check_in_minutes(records);
        if minutes.is_empty() {
            return None;
        }

        let level = self.classify_dispersion(&minutes);
        debug!(samples = minutes.len(), ?level, "Check-in dispersion check");

        match level {
            DispersionLevel::High => Some(Finding::new(
                AnomalyRule::Dispersion,
                "Highly irregular check-in times detected",
            )),
            DispersionLevel::Moderate => Some(Finding::new(
                AnomalyRule::Dispersion,
                "Moderately irregular check-in times detected",
            )),
            DispersionLevel::None => None,
        }
    }

    /// Records with the conditioned status whose date falls on the weekday
    pub fn count_conditioned(&self, records: &[AttendanceRecord]) -> usize {
        records
            .iter()
            .filter(|record| record.status == self.config.conditioned_status)
            .filter(|record| match record.parsed_date() {
                Ok(date) => date.weekday() == self.config.conditioned_weekday,
                Err(e) => {
                    debug!(error = %e, "Skipping record for weekday check");
                    false
                }
            })
            .count()
    }

    /// Conditioned-count rule
    pub fn detect_conditioned(&self, records: &[AttendanceRecord]) -> Option<Finding> {
        let count = self.count_conditioned(records);
        debug!(
            weekday = %self.config.conditioned_weekday,
            count,
            "Conditioned count check"
        );

        if count > self.config.conditioned_threshold {
            Some(Finding::new(
                AnomalyRule::ConditionedCount,
                format!(
                    "Detected {} {} {}",
                    count,
                    weekday_name(self.config.conditioned_weekday),
                    status_phrase(self.config.conditioned_status)
                ),
            ))
        } else {
            None
        }
    }

    /// Findings from every rule, without the fallback
    pub fn detect_rules(&self, records: &[AttendanceRecord]) -> Vec<Finding> {
        [
            self.detect_runs(records),
            self.detect_dispersion(records),
            self.detect_conditioned(records),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Findings from every rule; exactly one fallback finding if none fired
    pub fn detect_all(
        &self,
        records: &[AttendanceRecord],
        entropy: &mut dyn EntropySource,
    ) -> Vec<Finding> {
        let findings = self.detect_rules(records);
        if !findings.is_empty() {
            return findings;
        }
        self.fallback(entropy).into_iter().collect()
    }

    /// Pick one generic statement from the fallback catalog
    pub fn fallback(&self, entropy: &mut dyn EntropySource) -> Option<Finding> {
        let catalog = &self.config.fallback_catalog;
        if catalog.is_empty() {
            return None;
        }
        let pick = entropy.index(catalog.len());
        Some(Finding::new(AnomalyRule::Fallback, catalog[pick].clone()))
    }
}

fn status_phrase(status: AttendanceStatus) -> String {
    match status {
        AttendanceStatus::Late => "late arrivals".to_string(),
        AttendanceStatus::Absent => "absences".to_string(),
        other => format!("{} days", other.as_str().replace('_', " ")),
    }
}

/// Full English weekday name ("Monday")
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::{FixedEntropy, SeededEntropy};
    use AttendanceStatus::*;

    fn batch(statuses: &[AttendanceStatus]) -> Vec<AttendanceRecord> {
        // 2024-03-05 is a Tuesday, so the weekday rule stays quiet
        statuses
            .iter()
            .map(|s| AttendanceRecord::new("2024-03-05", *s))
            .collect()
    }

    fn check_ins(minutes: &[u32]) -> Vec<AttendanceRecord> {
        minutes
            .iter()
            .map(|m| {
                AttendanceRecord::new("2024-03-05", Present).with_check_in(format!(
                    "2024-03-05T{:02}:{:02}:00Z",
                    m / 60,
                    m % 60
                ))
            })
            .collect()
    }

    #[test]
    fn test_three_lates_make_two_pairs() {
        let config = AnomalyConfig::default();
        let detector = AnomalyDetector::new(&config);
        let records = batch(&[Late, Late, Late, Present]);

        let finding = detector.detect_runs(&records).unwrap();
        assert_eq!(finding.rule, AnomalyRule::ConsecutiveRun);
        assert_eq!(finding.message, "Detected 2 consecutive late arrivals");
    }

    #[test]
    fn test_non_adjacent_lates_do_not_run() {
        let config = AnomalyConfig::default();
        let detector = AnomalyDetector::new(&config);
        assert!(detector.detect_runs(&batch(&[Late, Present, Late])).is_none());
        assert_eq!(
            AnomalyDetector::count_adjacent_pairs(&batch(&[Late, Present, Late]), Late),
            0
        );
    }

    #[test]
    fn test_single_pair_is_below_threshold() {
        let config = AnomalyConfig::default();
        let detector = AnomalyDetector::new(&config);
        assert!(detector.detect_runs(&batch(&[Late, Late, Present])).is_none());
    }

    #[test]
    fn test_zero_spread_has_no_dispersion_finding() {
        let config = AnomalyConfig::default();
        let detector = AnomalyDetector::new(&config);
        assert!(detector.detect_dispersion(&check_ins(&[0, 0, 0, 0])).is_none());
    }

    #[test]
    fn test_high_dispersion() {
        let config = AnomalyConfig::default();
        let detector = AnomalyDetector::new(&config);
        // 08:00 and 11:00 alternate: std-dev 90 minutes
        let finding = detector
            .detect_dispersion(&check_ins(&[480, 660, 480, 660]))
            .unwrap();
        assert_eq!(finding.message, "Highly irregular check-in times detected");
    }

    #[test]
    fn test_moderate_dispersion() {
        let config = AnomalyConfig::default();
        let detector = AnomalyDetector::new(&config);
        // 09:00 and 10:20 alternate: std-dev 40 minutes
        let finding = detector
            .detect_dispersion(&check_ins(&[540, 620, 540, 620]))
            .unwrap();
        assert_eq!(finding.message, "Moderately irregular check-in times detected");
    }

    #[test]
    fn test_dispersion_boundaries() {
        let config = AnomalyConfig::default();
        let detector = AnomalyDetector::new(&config);
        assert_eq!(detector.classify_dispersion(&[]), DispersionLevel::None);
        // std-dev exactly 30 is not above the moderate threshold
        assert_eq!(detector.classify_dispersion(&[0.0, 60.0]), DispersionLevel::None);
        // std-dev exactly 60 is moderate, not high
        assert_eq!(
            detector.classify_dispersion(&[0.0, 120.0]),
            DispersionLevel::Moderate
        );
    }

    #[test]
    fn test_dispersion_skips_malformed_check_ins() {
        let config = AnomalyConfig::default();
        let detector = AnomalyDetector::new(&config);
        let mut records = check_ins(&[540, 540]);
        records.push(AttendanceRecord::new("2024-03-05", Present).with_check_in("garbage"));
        assert_eq!(AnomalyDetector::check_in_minutes(&records).len(), 2);
        assert!(detector.detect_dispersion(&records).is_none());
    }

    #[test]
    fn test_monday_absences() {
        let config = AnomalyConfig::default();
        let detector = AnomalyDetector::new(&config);
        let records = vec![
            AttendanceRecord::new("2024-03-04", Absent),
            AttendanceRecord::new("2024-03-11T00:00:00.000Z", Absent),
            AttendanceRecord::new("2024-03-12", Absent),
            AttendanceRecord::new("2024-03-18", Present),
        ];
        let finding = detector.detect_conditioned(&records).unwrap();
        assert_eq!(finding.message, "Detected 2 Monday absences");
    }

    #[test]
    fn test_conditioned_skips_bad_dates() {
        let config = AnomalyConfig::default();
        let detector = AnomalyDetector::new(&config);
        let records = vec![
            AttendanceRecord::new("2024-03-04", Absent),
            AttendanceRecord::new("not-a-date", Absent),
            AttendanceRecord::new("also bad", Absent),
        ];
        assert_eq!(detector.count_conditioned(&records), 1);
        assert!(detector.detect_conditioned(&records).is_none());
    }

    #[test]
    fn test_configured_weekday() {
        let config = AnomalyConfig {
            conditioned_weekday: Weekday::Fri,
            conditioned_status: Late,
            ..Default::default()
        };
        let detector = AnomalyDetector::new(&config);
        let records = vec![
            AttendanceRecord::new("2024-03-08", Late),
            AttendanceRecord::new("2024-03-15", Late),
        ];
        let finding = detector.detect_conditioned(&records).unwrap();
        assert_eq!(finding.message, "Detected 2 Friday late arrivals");
    }

    #[test]
    fn test_fallback_when_quiet() {
        let config = AnomalyConfig::default();
        let detector = AnomalyDetector::new(&config);
        let mut entropy = SeededEntropy::new(11);

        let findings = detector.detect_all(&batch(&[Present, Present]), &mut entropy);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].is_fallback());
        assert!(config.fallback_catalog.contains(&findings[0].message));
    }

    #[test]
    fn test_fallback_catalog_is_overridable() {
        let config = AnomalyConfig {
            fallback_catalog: vec!["Custom signal".to_string()],
            ..Default::default()
        };
        let detector = AnomalyDetector::new(&config);
        let findings = detector.detect_all(&batch(&[Present]), &mut FixedEntropy::midpoint());
        assert_eq!(findings[0].message, "Custom signal");
    }

    #[test]
    fn test_no_fallback_when_rule_fires() {
        let config = AnomalyConfig::default();
        let detector = AnomalyDetector::new(&config);
        let findings =
            detector.detect_all(&batch(&[Late, Late, Late]), &mut FixedEntropy::midpoint());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, AnomalyRule::ConsecutiveRun);
    }
}
