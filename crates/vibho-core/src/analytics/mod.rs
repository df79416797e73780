//! Heuristic analytics over attendance records and periodic series
//!
//! Three stages, each pure apart from the injected entropy source:
//! - [`aggregate`] counts statuses, early departures and overtime
//! - [`anomaly`] scans for rule-based irregularities
//! - [`forecast`] projects a series with trend, seasonality and noise
//!
//! [`attendance`] and [`payroll`] combine them into request-level responses.

pub mod aggregate;
pub mod anomaly;
pub mod attendance;
pub mod forecast;
pub mod payroll;

pub use aggregate::{summarize, AggregateConfig, AttendancePatterns, AttendanceSummary};
pub use anomaly::{AnomalyConfig, AnomalyDetector, AnomalyRule, DispersionLevel, Finding};
pub use attendance::{
    analyze_attendance, ensure_chronological, AttendanceAnalysis, AttendancePrediction,
    RiskConfig,
};
pub use forecast::{Forecast, ForecastConfig, Forecaster, SeriesModel};
pub use payroll::{predict_payroll, PayrollConfig, PayrollPrediction};
