//! Recruitment Insights

use serde::Deserialize;

use crate::error::Result;

use super::engine::{decode_payload, ComposeContext, DomainComposer};
use super::types::{Domain, Insight, InsightKind, Priority, TrendDirection};

/// Average candidate match score considered healthy
const SCORE_BENCHMARK: f64 = 75.0;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecruitmentPayload {
    /// Only presence matters; posting contents are not inspected
    #[serde(default)]
    job_postings: Vec<serde_json::Value>,
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    ai_score: Option<f64>,
}

/// Composes recruitment pipeline insights
pub struct RecruitmentComposer;

impl RecruitmentComposer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RecruitmentComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainComposer for RecruitmentComposer {
    fn domain(&self) -> Domain {
        Domain::Recruitment
    }

    fn name(&self) -> &'static str {
        "Recruitment"
    }

    fn compose(
        &self,
        data: &serde_json::Value,
        ctx: &mut ComposeContext<'_>,
    ) -> Result<Vec<Insight>> {
        let payload: RecruitmentPayload = decode_payload(self.domain(), data)?;
        if payload.job_postings.is_empty() || payload.candidates.is_empty() {
            return Ok(vec![]);
        }

        let total: f64 = payload
            .candidates
            .iter()
            .map(|c| c.ai_score.unwrap_or(0.0))
            .sum();
        let avg_score = total / payload.candidates.len() as f64;
        let above = avg_score > SCORE_BENCHMARK;

        let mut insights = vec![Insight::new(
            InsightKind::Trend,
            "Candidate Quality Trend",
            format!(
                "The average candidate match score is {:.1}%, which is {} the benchmark.",
                avg_score,
                if above { "above" } else { "below" }
            ),
            Priority::Medium,
        )
        .with_confidence(ctx.confidence("candidate_quality_trend", InsightKind::Trend))
        .with_trend(if above {
            TrendDirection::Positive
        } else {
            TrendDirection::Negative
        })];

        let days = ctx.entropy.int_inclusive(20, 45);
        insights.push(
            Insight::new(
                InsightKind::Prediction,
                "Hiring Timeline Prediction",
                format!(
                    "Based on current pipeline, positions are expected to be filled within {} days.",
                    days
                ),
                Priority::Medium,
            )
            .with_confidence(ctx.confidence("hiring_timeline_prediction", InsightKind::Prediction)),
        );

        insights.push(
            Insight::new(
                InsightKind::Recommendation,
                "Job Description Optimization",
                "Adding specific technical requirements could improve candidate matching by 15-20%.",
                Priority::High,
            )
            .actionable()
            .with_confidence(
                ctx.confidence("job_description_optimization", InsightKind::Recommendation),
            ),
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
        RecruitmentComposer.compose(&data, &mut ctx).unwrap()
    }

    #[test]
    fn test_requires_postings_and_candidates() {
        assert!(compose(json!({})).is_empty());
        assert!(compose(json!({"jobPostings": [{"title": "Engineer"}], "candidates": []})).is_empty());
        assert!(compose(json!({"jobPostings": [], "candidates": [{"aiScore": 80}]})).is_empty());
    }

    #[test]
    fn test_full_pipeline() {
        let insights = compose(json!({
            "jobPostings": [{"title": "Engineer"}],
            "candidates": [{"aiScore": 90}, {"aiScore": 70}, {}]
        }));

        assert_eq!(insights.len(), 3);

        // missing score counts as 0: (90 + 70 + 0) / 3
        let quality = &insights[0];
        assert!(quality.description.contains("53.3%"));
        assert!(quality.description.contains("below"));
        assert_eq!(quality.metadata.as_ref().unwrap()["trend"], "negative");

        // midpoint draw: 20 + 13
        assert!(insights[1].description.contains("within 33 days"));

        let recommendation = &insights[2];
        assert_eq!(recommendation.kind, InsightKind::Recommendation);
        assert_eq!(recommendation.priority, Priority::High);
        assert!(recommendation.actionable);
    }

    #[test]
    fn test_above_benchmark() {
        let insights = compose(json!({
            "jobPostings": [{}],
            "candidates": [{"aiScore": 80}]
        }));
        assert!(insights[0].description.contains("80.0%, which is above"));
    }
}
