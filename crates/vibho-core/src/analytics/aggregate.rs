//! Aggregator - reduces attendance records into summary counters

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{AttendanceRecord, AttendanceStatus};
use crate::stats::percentage;

/// Aggregation configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateConfig {
    /// Worked hours below which a day counts as an early departure
    pub full_day_hours: f64,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            full_day_hours: 8.0,
        }
    }
}

/// Counters derived from one batch of attendance records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceSummary {
    pub total: usize,
    pub by_status: BTreeMap<AttendanceStatus, usize>,
    pub early_departures: usize,
    pub overtime_hours: f64,
    /// Records whose check-in/out could not be parsed
    pub malformed_timestamps: usize,
}

impl AttendanceSummary {
    pub fn count(&self, status: AttendanceStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    pub fn present_like(&self) -> usize {
        self.by_status
            .iter()
            .filter(|(status, _)| status.is_present_like())
            .map(|(_, n)| n)
            .sum()
    }

    /// Present-like share of all records, in percent (0 for an empty batch)
    pub fn attendance_rate(&self) -> f64 {
        percentage(self.present_like() as f64, self.total as f64)
    }

    /// Share of records with exactly one of the given statuses, in percent
    pub fn rate_of(&self, statuses: &[AttendanceStatus]) -> f64 {
        let matching: usize = statuses.iter().map(|s| self.count(*s)).sum();
        percentage(matching as f64, self.total as f64)
    }

    /// Wire view used in the `patterns` field of attendance responses
    pub fn patterns(&self) -> AttendancePatterns {
        AttendancePatterns {
            late_arrivals: self.count(AttendanceStatus::Late),
            early_departures: self.early_departures,
            overtime_hours: self.overtime_hours,
            absenteeism: self.count(AttendanceStatus::Absent),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendancePatterns {
    pub late_arrivals: usize,
    pub early_departures: usize,
    pub overtime_hours: f64,
    pub absenteeism: usize,
}

/// Summarize a batch of records. Pure and order independent.
pub fn summarize(records: &[AttendanceRecord], config: &AggregateConfig) -> AttendanceSummary {
    let mut by_status = BTreeMap::new();
    let mut early_departures = 0;
    let mut overtime_hours = 0.0;
    let mut malformed_timestamps = 0;

    for record in records {
        *by_status.entry(record.status).or_insert(0) += 1;
        overtime_hours += record.overtime.unwrap_or(0.0);

        if record.status == AttendanceStatus::HalfDay {
            continue;
        }

        match (record.parsed_check_in(), record.parsed_check_out()) {
            (Ok(Some(check_in)), Ok(Some(check_out))) => {
                let hours = (check_out - check_in).num_seconds() as f64 / 3600.0;
                if hours < config.full_day_hours {
                    early_departures += 1;
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                debug!(error = %e, "Skipping record for early departure check");
                malformed_timestamps += 1;
            }
            _ => {}
        }
    }

    AttendanceSummary {
        total: records.len(),
        by_status,
        early_departures,
        overtime_hours,
        malformed_timestamps,
    }
}
