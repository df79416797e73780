//! Insight Engine - routes a domain payload to its composer

use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use crate::config::AnalyticsConfig;
use crate::entropy::EntropySource;
use crate::error::{Error, Result};

use super::types::{Domain, Insight, InsightKind};
use super::{
    AttendanceComposer, PayrollComposer, PerformanceComposer, RecruitmentComposer,
};

/// Context provided to insight composers
pub struct ComposeContext<'a> {
    pub config: &'a AnalyticsConfig,
    /// Randomness for confidence draws and placeholder estimates
    pub entropy: &'a mut dyn EntropySource,
    /// Reference date for deadline-based checks
    pub today: NaiveDate,
}

impl<'a> ComposeContext<'a> {
    pub fn new(
        config: &'a AnalyticsConfig,
        entropy: &'a mut dyn EntropySource,
        today: NaiveDate,
    ) -> Self {
        Self {
            config,
            entropy,
            today,
        }
    }

    /// Context dated today (local time)
    pub fn current(config: &'a AnalyticsConfig, entropy: &'a mut dyn EntropySource) -> Self {
        Self::new(config, entropy, chrono::Local::now().date_naive())
    }

    /// Draw a presentation confidence for a template
    pub fn confidence(&mut self, template: &str, kind: InsightKind) -> f64 {
        self.config.confidence.draw(template, kind, self.entropy)
    }
}

/// Turns one domain's payload into insights
pub trait DomainComposer: Send + Sync {
    fn domain(&self) -> Domain;

    /// Human-readable name
    fn name(&self) -> &'static str;

    fn compose(&self, data: &serde_json::Value, ctx: &mut ComposeContext<'_>)
        -> Result<Vec<Insight>>;
}

/// Decode a domain payload, reporting shape errors as invalid input
pub fn decode_payload<T: DeserializeOwned>(domain: Domain, data: &serde_json::Value) -> Result<T> {
    serde_json::from_value(data.clone())
        .map_err(|e| Error::InvalidInput(format!("invalid {} payload: {}", domain, e)))
}

/// The main insight engine that routes requests to composers
pub struct InsightEngine {
    composers: Vec<Box<dyn DomainComposer>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in composers
    pub fn new() -> Self {
        let mut engine = Self { composers: vec![] };

        engine.register(Box::new(AttendanceComposer));
        engine.register(Box::new(PerformanceComposer));
        engine.register(Box::new(PayrollComposer));
        engine.register(Box::new(RecruitmentComposer));

        engine
    }

    /// Register a composer, replacing any existing one for the same domain
    pub fn register(&mut self, composer: Box<dyn DomainComposer>) {
        self.composers.retain(|c| c.domain() != composer.domain());
        self.composers.push(composer);
    }

    /// Compose insights for a known domain
    pub fn compose(
        &self,
        domain: Domain,
        data: &serde_json::Value,
        ctx: &mut ComposeContext<'_>,
    ) -> Result<Vec<Insight>> {
        let Some(composer) = self.composers.iter().find(|c| c.domain() == domain) else {
            tracing::warn!(domain = domain.as_str(), "No composer registered");
            return Ok(vec![]);
        };

        let insights = composer.compose(data, ctx)?;
        tracing::debug!(
            domain = domain.as_str(),
            composer = composer.name(),
            count = insights.len(),
            "Insight composition complete"
        );
        Ok(insights)
    }

    /// Compose insights for a raw domain tag.
    ///
    /// Unknown tags yield an empty list rather than an error.
    pub fn compose_tag(
        &self,
        tag: &str,
        data: &serde_json::Value,
        ctx: &mut ComposeContext<'_>,
    ) -> Result<Vec<Insight>> {
        match tag.parse::<Domain>() {
            Ok(domain) => self.compose(domain, data, ctx),
            Err(e) => {
                tracing::warn!(tag, error = %e, "Unknown insight domain, returning no insights");
                Ok(vec![])
            }
        }
    }

    /// Domains with a registered composer
    pub fn domains(&self) -> Vec<Domain> {
        self.composers.iter().map(|c| c.domain()).collect()
    }
}
