//! Performance Insights
//!
//! Review history, goal progress and skill gaps for one employee.

use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::models::parse_date;
use crate::stats::mean;

use super::engine::{decode_payload, ComposeContext, DomainComposer};
use super::types::{Domain, Insight, InsightKind, Priority, TrendDirection};

/// Goals are assumed to span this many days
const GOAL_SPAN_DAYS: f64 = 90.0;

/// A goal is at risk when less than this share of its span remains...
const AT_RISK_TIME_SHARE: f64 = 0.3;

/// ...and progress is below this percentage
const AT_RISK_PROGRESS: f64 = 60.0;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PerformancePayload {
    #[serde(default)]
    reviews: Vec<Review>,
    #[serde(default)]
    goals: Vec<Goal>,
    #[serde(default)]
    skills: Vec<Skill>,
}

#[derive(Debug, Deserialize)]
struct Review {
    #[serde(default)]
    rating: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Goal {
    #[serde(default)]
    status: String,
    #[serde(default)]
    target_date: Option<String>,
    #[serde(default)]
    progress: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Skill {
    #[serde(default)]
    skill_name: String,
    #[serde(default)]
    current_level: f64,
    #[serde(default)]
    target_level: f64,
}

impl Skill {
    fn gap(&self) -> f64 {
        self.target_level - self.current_level
    }
}

/// Composes performance insights
pub struct PerformanceComposer;

impl PerformanceComposer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PerformanceComposer {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest positive skill gap; the earliest skill wins ties
fn top_skill_gap(skills: &[Skill]) -> Option<&Skill> {
    skills
        .iter()
        .filter(|s| s.gap() > 0.0)
        .fold(None, |best: Option<&Skill>, skill| match best {
            Some(b) if b.gap() >= skill.gap() => Some(b),
            _ => Some(skill),
        })
}

fn goal_at_risk(goal: &Goal, ctx: &ComposeContext<'_>) -> bool {
    let Some(raw) = goal.target_date.as_deref() else {
        return false;
    };
    let target = match parse_date(raw) {
        Ok(date) => date,
        Err(e) => {
            debug!(error = %e, "Skipping goal with unreadable target date");
            return false;
        }
    };

    let days_remaining = (target - ctx.today).num_days();
    days_remaining > 0
        && (days_remaining as f64 / GOAL_SPAN_DAYS) < AT_RISK_TIME_SHARE
        && goal.progress < AT_RISK_PROGRESS
}

impl DomainComposer for PerformanceComposer {
    fn domain(&self) -> Domain {
        Domain::Performance
    }

    fn name(&self) -> &'static str {
        "Performance"
    }

    fn compose(
        &self,
        data: &serde_json::Value,
        ctx: &mut ComposeContext<'_>,
    ) -> Result<Vec<Insight>> {
        let payload: PerformancePayload = decode_payload(self.domain(), data)?;
        let mut insights = Vec::new();

        if !payload.reviews.is_empty() {
            let ratings: Vec<f64> = payload.reviews.iter().map(|r| r.rating).collect();
            let drift = ctx.entropy.uniform(-0.5, 0.8);
            let predicted = (mean(&ratings) + drift).clamp(1.0, 5.0);
            insights.push(
                Insight::new(
                    InsightKind::Prediction,
                    "Predicted Performance Rating",
                    format!(
                        "Based on historical performance, the next review rating is predicted to be {:.1}/5.0",
                        predicted
                    ),
                    Priority::Medium,
                )
                .with_confidence(
                    ctx.confidence("predicted_performance_rating", InsightKind::Prediction),
                ),
            );
        }

        if let Some(skill) = top_skill_gap(&payload.skills) {
            insights.push(
                Insight::new(
                    InsightKind::Recommendation,
                    format!("Skill Development: {}", skill.skill_name),
                    format!(
                        "Focus on developing {} to close the {} point gap to reach target proficiency.",
                        skill.skill_name,
                        skill.gap()
                    ),
                    Priority::High,
                )
                .actionable()
                .with_confidence(ctx.confidence("skill_development", InsightKind::Recommendation)),
            );
        }

        let completed = payload
            .goals
            .iter()
            .filter(|g| g.status == "completed")
            .count();
        if completed > 0 {
            insights.push(
                Insight::new(
                    InsightKind::Trend,
                    "Goal Achievement Pattern",
                    format!(
                        "Successfully completed {} goals, demonstrating consistent achievement.",
                        completed
                    ),
                    Priority::Low,
                )
                .with_confidence(ctx.confidence("goal_achievement_pattern", InsightKind::Trend))
                .with_trend(TrendDirection::Positive),
            );
        }

        let at_risk = payload
            .goals
            .iter()
            .filter(|g| g.status == "in_progress")
            .filter(|g| goal_at_risk(g, ctx))
            .count();
        if at_risk > 0 {
            insights.push(
                Insight::new(
                    InsightKind::Anomaly,
                    "Goals at Risk",
                    format!(
                        "{} goals may not be completed by their target dates based on current progress.",
                        at_risk
                    ),
                    Priority::High,
                )
                .actionable()
                .with_confidence(ctx.confidence("goals_at_risk", InsightKind::Anomaly)),
            );
        }

        insights.push(
            Insight::new(
                InsightKind::Recommendation,
                "Career Development Opportunity",
                "Based on your skill profile, consider pursuing certification in Project Management to enhance leadership capabilities.",
                Priority::Medium,
            )
            .actionable()
            .with_confidence(ctx.confidence("career_development", InsightKind::Recommendation)),
        );

        if ctx.entropy.unit() > 0.5 {
            insights.push(
                Insight::new(
                    InsightKind::Trend,
                    "Collaboration Pattern",
                    "Your collaboration across departments has increased by 20% in the last quarter.",
                    Priority::Low,
                )
                .with_confidence(ctx.confidence("collaboration_pattern", InsightKind::Trend))
                .with_trend(TrendDirection::Positive),
            );
        }

        Ok(insights)
    }
}
