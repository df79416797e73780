//! Insight composition command

use anyhow::{Context, Result};
use serde_json::Value;
use vibho_core::models::parse_date;
use vibho_core::{AnalyticsConfig, ComposeContext, EntropySource, InsightEngine};

pub fn cmd_insights(
    domain: &str,
    input: &str,
    today: Option<&str>,
    config: &AnalyticsConfig,
    entropy: &mut dyn EntropySource,
) -> Result<Value> {
    let data: Value = serde_json::from_str(input).context("Insight payload is not valid JSON")?;

    let mut ctx = match today {
        Some(raw) => ComposeContext::new(config, entropy, parse_date(raw)?),
        None => ComposeContext::current(config, entropy),
    };

    let insights = InsightEngine::new().compose_tag(domain, &data, &mut ctx)?;
    Ok(serde_json::to_value(insights)?)
}
