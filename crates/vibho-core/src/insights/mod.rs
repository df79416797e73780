//! Insight Composer - presentation-ready HR insights
//!
//! Turns a domain payload into a list of uniformly shaped [`Insight`]s. Each
//! domain has its own composer, registered with the [`InsightEngine`]:
//!
//! - **Attendance** - attendance rate, late arrivals, rule-based irregularities
//! - **Performance** - rating prediction, skill gaps, goal risk
//! - **Payroll** - next-period cost, trend, optimization tip
//! - **Recruitment** - candidate quality, hiring timeline
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vibho_core::insights::{ComposeContext, InsightEngine};
//!
//! let engine = InsightEngine::new();
//! let mut ctx = ComposeContext::current(&config, &mut entropy);
//! let insights = engine.compose_tag("attendance", &payload, &mut ctx)?;
//! ```

pub mod attendance;
pub mod engine;
pub mod payroll;
pub mod performance;
pub mod recruitment;
pub mod types;

pub use attendance::AttendanceComposer;
pub use engine::{ComposeContext, DomainComposer, InsightEngine};
pub use payroll::PayrollComposer;
pub use performance::PerformanceComposer;
pub use recruitment::RecruitmentComposer;
pub use types::{ConfidenceConfig, Domain, Insight, InsightKind, Priority, TrendDirection};
