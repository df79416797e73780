//! Vibho Core Library
//!
//! Heuristic HR analytics for the Vibho CLI:
//! - Attendance aggregation (status counts, early departures, overtime)
//! - Rule-based anomaly detection with a fallback catalog
//! - Trend and seasonality forecasting for periodic series
//! - Payroll cost prediction
//! - Insight composition for attendance, performance, payroll and recruitment
//! - Layered TOML configuration for every threshold and catalog
//!
//! All randomness comes from an injected [`EntropySource`], so a seeded or
//! fixed source makes every result reproducible.

pub mod analytics;
pub mod config;
pub mod entropy;
pub mod error;
pub mod import;
pub mod insights;
pub mod models;
pub mod stats;

pub use analytics::{
    analyze_attendance, predict_payroll, summarize, AnomalyDetector, AttendanceAnalysis,
    Forecaster, PayrollPrediction,
};
pub use config::AnalyticsConfig;
pub use entropy::{EntropySource, FixedEntropy, SeededEntropy};
pub use error::{Error, Result};
pub use import::{parse_attendance_csv, parse_attendance_json, RecordFormat};
pub use insights::{ComposeContext, Domain, Insight, InsightEngine};
pub use models::{AttendanceRecord, AttendanceStatus, ForecastPoint, TimePoint};
