//! Payroll Insights
//!
//! Projects the next payroll period from a caller-supplied monthly history and
//! pairs it with a trend reading and one cost optimization tip.

use serde::Deserialize;

use crate::analytics::forecast::Forecaster;
use crate::error::Result;
use crate::models::TimePoint;
use crate::stats::{percentage, round_to};

use super::engine::{decode_payload, ComposeContext, DomainComposer};
use super::types::{Domain, Insight, InsightKind, Priority, TrendDirection};

/// Variance (percent, either direction) above which the forecast is high priority
const HIGH_VARIANCE_PCT: f64 = 5.0;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayrollPayload {
    #[serde(default)]
    historical_data: Vec<TimePoint>,
}

/// Composes payroll cost insights
pub struct PayrollComposer;

impl PayrollComposer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PayrollComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainComposer for PayrollComposer {
    fn domain(&self) -> Domain {
        Domain::Payroll
    }

    fn name(&self) -> &'static str {
        "Payroll"
    }

    fn compose(
        &self,
        data: &serde_json::Value,
        ctx: &mut ComposeContext<'_>,
    ) -> Result<Vec<Insight>> {
        let payload: PayrollPayload = decode_payload(self.domain(), data)?;
        let history = payload.historical_data;
        if history.is_empty() {
            return Ok(vec![]);
        }

        let config = ctx.config;
        let forecast = Forecaster::new(&config.forecast).forecast_default(&history, ctx.entropy)?;
        let Some(next) = forecast.points.first().copied() else {
            return Ok(vec![]);
        };

        let last = forecast.model.last.value;
        let variance = round_to(percentage(next.value - last, last), 1);
        let mut insights = Vec::new();

        insights.push(
            Insight::new(
                InsightKind::Prediction,
                "Payroll Cost Forecast",
                format!(
                    "Payroll cost for {} is projected at {:.0}, a {:+.1}% change from the last period.",
                    next.date.format("%B %Y"),
                    next.value,
                    variance
                ),
                if variance.abs() > HIGH_VARIANCE_PCT {
                    Priority::High
                } else {
                    Priority::Medium
                },
            )
            .with_confidence(ctx.confidence("payroll_cost_forecast", InsightKind::Prediction))
            .with_metadata("predictedCost", serde_json::json!(next.value))
            .with_metadata("lower", serde_json::json!(next.lower))
            .with_metadata("upper", serde_json::json!(next.upper))
            .with_metadata("variance", serde_json::json!(variance)),
        );

        let slope = forecast.model.slope;
        let (direction, wording) = if slope > 0.0 {
            (TrendDirection::Up, "rising")
        } else if slope < 0.0 {
            (TrendDirection::Down, "falling")
        } else {
            (TrendDirection::Flat, "flat")
        };
        insights.push(
            Insight::new(
                InsightKind::Trend,
                "Payroll Cost Trend",
                format!(
                    "Payroll cost is {} by about {:.0} per period over the last {} periods.",
                    wording,
                    slope.abs(),
                    history.len()
                ),
                Priority::Low,
            )
            .with_confidence(ctx.confidence("payroll_cost_trend", InsightKind::Trend))
            .with_trend(direction)
            .with_metadata("slope", serde_json::json!(round_to(slope, 2))),
        );

        let catalog = &config.payroll.cost_optimization_catalog;
        if !catalog.is_empty() {
            let tip = catalog[ctx.entropy.index(catalog.len())].clone();
            insights.push(
                Insight::new(
                    InsightKind::Recommendation,
                    "Payroll Cost Optimization",
                    tip,
                    Priority::Medium,
                )
                .actionable()
                .with_confidence(
                    ctx.confidence("payroll_cost_optimization", InsightKind::Recommendation),
                ),
            );
        }

        Ok(insights)
    }
}
