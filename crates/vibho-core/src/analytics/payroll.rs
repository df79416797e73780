//! Payroll cost prediction
//!
//! Forecasts the next months of payroll cost from a monthly history. When the
//! caller has no history, a synthetic year is generated around a fixed base
//! amount with a seasonal swing and a slight trend.

use std::f64::consts::PI;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::AnalyticsConfig;
use crate::entropy::EntropySource;
use crate::error::{Error, Result};
use crate::models::{ForecastPoint, TimePoint};
use crate::stats::{percentage, round_to};

use super::forecast::Forecaster;

/// Default cost optimization tips
pub const DEFAULT_COST_OPTIMIZATION_CATALOG: &[&str] = &[
    "Implement flexible working hours to reduce overtime costs",
    "Review contractor vs. employee cost efficiency",
    "Optimize bonus structures based on performance metrics",
    "Consider restructuring benefits packages for cost efficiency",
    "Analyze department-wise salary benchmarks for optimization",
    "Implement automated time tracking to reduce timesheet errors",
    "Review travel and expense policies for potential savings",
    "Consider skill-based compensation adjustments",
    "Optimize shift scheduling to reduce overtime",
    "Implement performance-based incentive structures",
];

/// Payroll prediction configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollConfig {
    /// Monthly payroll the synthetic history is generated around
    pub base_amount: f64,
    /// Months of synthetic history
    pub history_months: usize,
    /// Tips included in each response
    pub tips_per_response: usize,
    pub cost_optimization_catalog: Vec<String>,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            base_amount: 2_000_000.0,
            history_months: 12,
            tips_per_response: 3,
            cost_optimization_catalog: DEFAULT_COST_OPTIMIZATION_CATALOG
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Response body for a payroll prediction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollPrediction {
    /// Requested period as `M/YYYY`
    pub month: String,
    pub predicted_cost: f64,
    /// Percent change of the first forecast vs the last actual
    pub variance: f64,
    pub forecast: Vec<ForecastPoint>,
    pub historical_data: Vec<TimePoint>,
    pub cost_optimization: Vec<String>,
}

/// Validate and resolve the first day of the requested period
pub fn period_start(month: u32, year: i32) -> Result<NaiveDate> {
    if !(1970..=9999).contains(&year) {
        return Err(Error::InvalidInput(format!("year out of range: {}", year)));
    }
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::InvalidInput(format!("month out of range: {}", month)))
}

/// Synthesize a monthly history ending before `start`.
///
/// Point `i` (counting down from `months`) sits `30 * i` days before the
/// period start and carries a sinusoidal seasonal swing of ±10%, a 0.5% per
/// month trend and ±2.5% noise.
pub fn synthetic_history(
    start: NaiveDate,
    config: &PayrollConfig,
    entropy: &mut dyn EntropySource,
) -> Vec<TimePoint> {
    (1..=config.history_months)
        .rev()
        .map(|i| {
            let i = i as f64;
            let date = start - Duration::days(30 * i as i64);
            let seasonality = 1.0 + 0.1 * (i * PI / 6.0).sin();
            let trend = 1.0 + 0.005 * i;
            let noise = 1.0 + (entropy.unit() * 0.05 - 0.025);
            TimePoint::new(date, (config.base_amount * seasonality * trend * noise).round())
        })
        .collect()
}

/// Pick distinct tips from the catalog
pub fn cost_optimization(config: &PayrollConfig, entropy: &mut dyn EntropySource) -> Vec<String> {
    entropy
        .sample_indices(
            config.cost_optimization_catalog.len(),
            config.tips_per_response,
        )
        .into_iter()
        .map(|i| config.cost_optimization_catalog[i].clone())
        .collect()
}

/// Forecast payroll cost for the period after `history`
pub fn predict_payroll(
    month: u32,
    year: i32,
    history: Option<Vec<TimePoint>>,
    horizon: Option<usize>,
    config: &AnalyticsConfig,
    entropy: &mut dyn EntropySource,
) -> Result<PayrollPrediction> {
    let start = period_start(month, year)?;

    let historical_data = match history {
        Some(points) => points,
        None => synthetic_history(start, &config.payroll, entropy),
    };

    let forecaster = Forecaster::new(&config.forecast);
    let horizon = horizon.unwrap_or(config.forecast.horizon);
    let forecast = forecaster.forecast(&historical_data, horizon, entropy)?;

    let first = forecast.points[0];
    let last_actual = forecast.model.last.value;
    let variance = round_to(percentage(first.value - last_actual, last_actual), 1);

    let cost_optimization = cost_optimization(&config.payroll, entropy);

    info!(
        period = %start.format("%Y-%m"),
        predicted = first.value,
        variance,
        "Payroll prediction complete"
    );

    Ok(PayrollPrediction {
        month: format!("{}/{}", month, year),
        predicted_cost: first.value,
        variance,
        forecast: forecast.points,
        historical_data,
        cost_optimization,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::{FixedEntropy, SeededEntropy};

    #[test]
    fn test_period_validation() {
        assert!(period_start(13, 2024).is_err());
        assert!(period_start(0, 2024).is_err());
        assert!(period_start(6, 1900).is_err());
        assert_eq!(
            period_start(6, 2024).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
    }

    #[test]
    fn test_synthetic_history_shape() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let history = synthetic_history(start, &PayrollConfig::default(), &mut SeededEntropy::new(2));

        assert_eq!(history.len(), 12);
        assert_eq!(history[0].date, start - Duration::days(360));
        assert_eq!(history[11].date, start - Duration::days(30));
        assert!(history.windows(2).all(|w| w[0].date < w[1].date));
        for point in &history {
            // base × (0.9..1.1) × (1.005..1.06) × (0.975..1.025)
            assert!(point.value > 1_700_000.0 && point.value < 2_400_000.0);
        }
    }

    #[test]
    fn test_synthetic_history_without_noise() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let history =
            synthetic_history(start, &PayrollConfig::default(), &mut FixedEntropy::midpoint());
        // last point is i = 1: 2M × (1 + 0.1·sin(π/6)) × 1.005
        assert_eq!(history[11].value, (2_000_000.0f64 * 1.05 * 1.005).round());
    }

    #[test]
    fn test_predict_payroll_response() {
        let config = AnalyticsConfig::default();
        let prediction =
            predict_payroll(3, 2024, None, None, &config, &mut SeededEntropy::new(21)).unwrap();

        assert_eq!(prediction.month, "3/2024");
        assert_eq!(prediction.forecast.len(), 3);
        assert_eq!(prediction.historical_data.len(), 12);
        assert_eq!(prediction.predicted_cost, prediction.forecast[0].value);
        assert_eq!(prediction.cost_optimization.len(), 3);

        let json = serde_json::to_value(&prediction).unwrap();
        for key in ["month", "predictedCost", "variance", "forecast", "historicalData", "costOptimization"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_predict_payroll_with_history() {
        let config = AnalyticsConfig::default();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let history: Vec<TimePoint> = (0..4)
            .map(|i| TimePoint::new(start + Duration::days(30 * i), 1000.0))
            .collect();

        let prediction = predict_payroll(
            5,
            2024,
            Some(history),
            Some(2),
            &config,
            &mut FixedEntropy::midpoint(),
        )
        .unwrap();

        assert_eq!(prediction.predicted_cost, 1000.0);
        assert_eq!(prediction.variance, 0.0);
        assert_eq!(prediction.forecast.len(), 2);
    }

    #[test]
    fn test_predict_payroll_empty_history() {
        let config = AnalyticsConfig::default();
        let err = predict_payroll(
            5,
            2024,
            Some(vec![]),
            None,
            &config,
            &mut FixedEntropy::midpoint(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_zero_last_value_has_zero_variance() {
        let config = AnalyticsConfig::default();
        let history = vec![TimePoint::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 0.0)];
        let prediction =
            predict_payroll(2, 2024, Some(history), None, &config, &mut FixedEntropy::midpoint())
                .unwrap();
        assert_eq!(prediction.variance, 0.0);
    }

    #[test]
    fn test_cost_optimization_distinct() {
        let tips = cost_optimization(&PayrollConfig::default(), &mut SeededEntropy::new(4));
        assert_eq!(tips.len(), 3);
        let mut deduped = tips.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), 3);
    }
}
