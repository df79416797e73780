//! Forecaster - trend plus seasonality projection of a periodic series
//!
//! The model is deliberately simple:
//! 1. Ordinary least-squares slope over the series index
//! 2. A 12-bucket seasonal index, active only once a full cycle exists
//! 3. Projection from the last observation, scaled by the seasonal index and
//!    a small noise factor, with an uncertainty band that widens with the
//!    horizon

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::entropy::EntropySource;
use crate::error::{Error, Result};
use crate::models::{ForecastPoint, TimePoint};
use crate::stats::{mean, ols_slope};

/// Longest horizon a single request may ask for (100 years of monthly periods)
pub const MAX_HORIZON: usize = 1200;

/// Forecast configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// Periods projected when the caller does not ask for a specific horizon
    pub horizon: usize,
    /// Half-width of the multiplicative noise factor (0.015 = ±1.5%)
    pub noise_amplitude: f64,
    /// Band half-width at the furthest period, relative to the forecast
    pub uncertainty_ratio: f64,
    /// Spacing between consecutive periods
    pub period_days: i64,
    /// Number of seasonal buckets
    pub seasonal_period: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 3,
            noise_amplitude: 0.015,
            uncertainty_ratio: 0.05,
            period_days: 30,
            seasonal_period: 12,
        }
    }
}

/// Fitted trend and seasonality for one series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesModel {
    pub slope: f64,
    pub seasonal_index: Vec<f64>,
    pub last: TimePoint,
}

/// Full forecast output: the fitted model plus projected points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub model: SeriesModel,
    pub points: Vec<ForecastPoint>,
}

pub struct Forecaster<'a> {
    config: &'a ForecastConfig,
}

impl<'a> Forecaster<'a> {
    pub fn new(config: &'a ForecastConfig) -> Self {
        Self { config }
    }

    /// Seasonal multiplier per bucket.
    ///
    /// Bucket `i` averages every value whose index is `i` modulo the period,
    /// relative to the overall mean. Short series, empty buckets and a zero
    /// overall mean all fall back to the neutral 1.0.
    pub fn seasonal_index(&self, values: &[f64]) -> Vec<f64> {
        let period = self.config.seasonal_period.max(1);
        let mut index = vec![1.0; period];

        if values.len() < period {
            return index;
        }

        let overall = mean(values);
        if overall == 0.0 {
            return index;
        }

        for (bucket, slot) in index.iter_mut().enumerate() {
            let bucket_values: Vec<f64> = values.iter().skip(bucket).step_by(period).copied().collect();
            if !bucket_values.is_empty() {
                *slot = mean(&bucket_values) / overall;
            }
        }

        index
    }

    /// Fit slope and seasonal index
    pub fn fit(&self, series: &[TimePoint]) -> Result<SeriesModel> {
        let last = *series
            .last()
            .ok_or_else(|| Error::InvalidInput("cannot forecast an empty series".to_string()))?;

        let values: Vec<f64> = series.iter().map(|p| p.value).collect();
        let slope = ols_slope(&values);
        let seasonal_index = self.seasonal_index(&values);

        debug!(points = values.len(), slope, "Fitted series model");

        Ok(SeriesModel {
            slope,
            seasonal_index,
            last,
        })
    }

    /// Project `horizon` periods past the end of `series`
    pub fn forecast(
        &self,
        series: &[TimePoint],
        horizon: usize,
        entropy: &mut dyn EntropySource,
    ) -> Result<Forecast> {
        if horizon == 0 {
            return Err(Error::InvalidInput(
                "forecast horizon must be at least 1".to_string(),
            ));
        }

        if horizon > MAX_HORIZON {
            return Err(Error::InvalidInput(format!(
                "forecast horizon must be at most {}",
                MAX_HORIZON
            )));
        }

        let model = self.fit(series)?;
        let period = model.seasonal_index.len();
        let mut points = Vec::with_capacity(horizon);

        for k in 1..=horizon {
            let date = self.period_date(model.last.date, k)?;
            let base = model.last.value + model.slope * k as f64;
            let bucket = date.month0() as usize % period;
            let noise = 1.0 + (entropy.unit() * 2.0 * self.config.noise_amplitude
                - self.config.noise_amplitude);

            let value = base * model.seasonal_index[bucket] * noise;
            let uncertainty =
                value.abs() * self.config.uncertainty_ratio * (k as f64 / horizon as f64);

            points.push(ForecastPoint {
                date,
                value: value.round(),
                lower: (value - uncertainty).round(),
                upper: (value + uncertainty).round(),
            });
        }

        Ok(Forecast { model, points })
    }

    /// Date of the `k`-th projected period, or `InvalidInput` past the calendar range
    fn period_date(&self, last: NaiveDate, k: usize) -> Result<NaiveDate> {
        i64::try_from(k)
            .ok()
            .and_then(|k| self.config.period_days.checked_mul(k))
            .and_then(Duration::try_days)
            .and_then(|offset| last.checked_add_signed(offset))
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "forecast period {} after {} is out of the supported date range",
                    k, last
                ))
            })
    }

    /// Forecast with the configured default horizon
    pub fn forecast_default(
        &self,
        series: &[TimePoint],
        entropy: &mut dyn EntropySource,
    ) -> Result<Forecast> {
        self.forecast(series, self.config.horizon, entropy)
    }
}
