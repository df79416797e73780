//! Attendance Insights
//!
//! Surfaces from one employee's attendance records:
//! - Overall attendance against the 90% company average
//! - Late arrival counts
//! - Rule-based irregularities (runs, check-in spread, weekday absences)
//! - A rough work-hour projection for next month

use serde::Deserialize;

use crate::analytics::aggregate::summarize;
use crate::analytics::anomaly::AnomalyDetector;
use crate::error::Result;
use crate::models::{AttendanceRecord, AttendanceStatus};

use super::engine::{decode_payload, ComposeContext, DomainComposer};
use super::types::{Domain, Insight, InsightKind, Priority, TrendDirection};

/// Company-wide attendance average, in percent
const COMPANY_AVERAGE_RATE: f64 = 90.0;

/// Late count above which the late arrival insight is high priority
const LATE_HIGH_PRIORITY: usize = 5;

/// Baseline monthly hours for the work hour forecast
const BASE_MONTHLY_HOURS: i64 = 160;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttendancePayload {
    #[serde(default)]
    attendance_records: Vec<AttendanceRecord>,
}

/// Composes attendance insights
pub struct AttendanceComposer;

impl AttendanceComposer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AttendanceComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainComposer for AttendanceComposer {
    fn domain(&self) -> Domain {
        Domain::Attendance
    }

    fn name(&self) -> &'static str {
        "Attendance"
    }

    fn compose(
        &self,
        data: &serde_json::Value,
        ctx: &mut ComposeContext<'_>,
    ) -> Result<Vec<Insight>> {
        let payload: AttendancePayload = decode_payload(self.domain(), data)?;
        let records = payload.attendance_records;
        if records.is_empty() {
            return Ok(vec![]);
        }

        let mut insights = Vec::new();
        let summary = summarize(&records, &ctx.config.aggregate);

        // Strictly `present` here, unlike the present-like analysis rate
        let rate = summary.rate_of(&[AttendanceStatus::Present]);
        let above = rate > COMPANY_AVERAGE_RATE;
        insights.push(
            Insight::new(
                InsightKind::Trend,
                "Attendance Pattern",
                format!(
                    "Your attendance rate is {:.1}%, which is {} the company average.",
                    rate,
                    if above { "above" } else { "below" }
                ),
                Priority::Medium,
            )
            .with_confidence(ctx.confidence("attendance_pattern", InsightKind::Trend))
            .with_trend(if above {
                TrendDirection::Positive
            } else {
                TrendDirection::Negative
            }),
        );

        let late = summary.count(AttendanceStatus::Late);
        if late > 0 {
            insights.push(
                Insight::new(
                    InsightKind::Anomaly,
                    "Late Arrival Pattern",
                    format!(
                        "You have been late {} times in the last {} working days.",
                        late, summary.total
                    ),
                    if late > LATE_HIGH_PRIORITY {
                        Priority::High
                    } else {
                        Priority::Medium
                    },
                )
                .actionable()
                .with_confidence(ctx.confidence("late_arrival_pattern", InsightKind::Anomaly)),
            );
        }

        let findings = AnomalyDetector::new(&ctx.config.anomaly).detect_rules(&records);
        if !findings.is_empty() {
            let messages: Vec<String> = findings.iter().map(|f| f.message.clone()).collect();
            let rules: Vec<&str> = findings.iter().map(|f| f.rule.as_str()).collect();
            insights.push(
                Insight::new(
                    InsightKind::Anomaly,
                    "Attendance Irregularities",
                    format!("{}.", messages.join("; ")),
                    Priority::Medium,
                )
                .actionable()
                .with_confidence(
                    ctx.confidence("attendance_irregularities", InsightKind::Anomaly),
                )
                .with_metadata("findings", serde_json::json!(messages))
                .with_metadata("rules", serde_json::json!(rules)),
            );
        }

        let hours = BASE_MONTHLY_HOURS + ctx.entropy.int_inclusive(-10, 20);
        insights.push(
            Insight::new(
                InsightKind::Prediction,
                "Work Hour Forecast",
                format!(
                    "Based on your current pattern, you are projected to work {} hours next month.",
                    hours
                ),
                Priority::Low,
            )
            .with_confidence(ctx.confidence("work_hour_forecast", InsightKind::Prediction)),
        );

        Ok(insights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyticsConfig;
    use crate::entropy::FixedEntropy;
    use chrono::NaiveDate;
    use serde_json::json;

    fn compose(data: serde_json::Value) -> Vec<Insight> {
        let config = AnalyticsConfig::default();
        let mut entropy = FixedEntropy::midpoint();
        let mut ctx = ComposeContext::new(
            &config,
            &mut entropy,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        AttendanceComposer.compose(&data, &mut ctx).unwrap()
    }

    #[test]
    fn test_empty_records_no_insights() {
        assert!(compose(json!({"attendanceRecords": []})).is_empty());
        assert!(compose(json!({})).is_empty());
    }

    #[test]
    fn test_all_present() {
        let records: Vec<_> = (1..=10)
            .map(|d| json!({"date": format!("2024-03-{:02}", d), "status": "present"}))
            .collect();
        let insights = compose(json!({ "attendanceRecords": records }));

        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].title, "Attendance Pattern");
        assert!(insights[0].description.contains("100.0%"));
        assert!(insights[0].description.contains("above"));
        assert_eq!(insights[0].metadata.as_ref().unwrap()["trend"], "positive");
        assert_eq!(insights[1].title, "Work Hour Forecast");
        // midpoint draw: 160 + (-10 + 15)
        assert!(insights[1].description.contains("165 hours"));
    }

    #[test]
    fn test_late_arrivals_and_irregularities() {
        let insights = compose(json!({
            "attendanceRecords": [
                {"date": "2024-03-04", "status": "late"},
                {"date": "2024-03-05", "status": "late"},
                {"date": "2024-03-06", "status": "late"},
                {"date": "2024-03-07", "status": "present"}
            ]
        }));

        let titles: Vec<&str> = insights.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Attendance Pattern",
                "Late Arrival Pattern",
                "Attendance Irregularities",
                "Work Hour Forecast"
            ]
        );

        // late counts toward the analysis rate but not this one
        assert!(insights[0].description.contains("25.0%"));
        assert!(insights[0].description.contains("below"));

        let late = &insights[1];
        assert_eq!(late.kind, InsightKind::Anomaly);
        assert_eq!(late.priority, Priority::Medium);
        assert!(late.actionable);
        assert!(late.description.contains("late 3 times in the last 4"));

        assert!(insights[2]
            .description
            .contains("Detected 2 consecutive late arrivals"));
    }

    #[test]
    fn test_many_lates_high_priority() {
        let records: Vec<_> = (0..6).map(|_| json!({"status": "late"})).collect();
        let insights = compose(json!({ "attendanceRecords": records }));
        assert_eq!(insights[1].priority, Priority::High);
    }

    #[test]
    fn test_confidence_in_template_range() {
        let insights = compose(json!({"attendanceRecords": [{"status": "present"}]}));
        assert!((0.8..=0.95).contains(&insights[0].confidence));
        assert!((0.6..=0.8).contains(&insights[1].confidence));
    }
}
