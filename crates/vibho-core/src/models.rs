//! Domain models for Vibho

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Attendance status of a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    HalfDay,
    WorkFromHome,
    OnLeave,
    /// Any status string the engine does not know about
    #[serde(other)]
    Other,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Late => "late",
            Self::HalfDay => "half_day",
            Self::WorkFromHome => "work_from_home",
            Self::OnLeave => "on_leave",
            Self::Other => "other",
        }
    }

    /// Statuses that count as the employee having shown up
    pub fn is_present_like(&self) -> bool {
        matches!(self, Self::Present | Self::Late | Self::WorkFromHome)
    }

    pub fn all() -> &'static [AttendanceStatus] {
        &[
            Self::Present,
            Self::Absent,
            Self::Late,
            Self::HalfDay,
            Self::WorkFromHome,
            Self::OnLeave,
            Self::Other,
        ]
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            "late" => Ok(Self::Late),
            "half_day" | "halfday" => Ok(Self::HalfDay),
            "work_from_home" | "wfh" => Ok(Self::WorkFromHome),
            "on_leave" => Ok(Self::OnLeave),
            _ => Err(format!("Unknown attendance status: {}", s)),
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One attendance entry as delivered by the HR system
///
/// Dates and timestamps stay as raw strings: a record with an unparseable
/// field is still valid input, it just drops out of the checks that need
/// that field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default)]
    pub date: Option<String>,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub check_in: Option<String>,
    #[serde(default)]
    pub check_out: Option<String>,
    /// Overtime hours reported for the day
    #[serde(default)]
    pub overtime: Option<f64>,
}

impl AttendanceRecord {
    pub fn new(date: impl Into<String>, status: AttendanceStatus) -> Self {
        Self {
            date: Some(date.into()),
            status,
            check_in: None,
            check_out: None,
            overtime: None,
        }
    }

    pub fn with_times(mut self, check_in: impl Into<String>, check_out: impl Into<String>) -> Self {
        self.check_in = Some(check_in.into());
        self.check_out = Some(check_out.into());
        self
    }

    pub fn with_check_in(mut self, check_in: impl Into<String>) -> Self {
        self.check_in = Some(check_in.into());
        self
    }

    pub fn with_overtime(mut self, hours: f64) -> Self {
        self.overtime = Some(hours);
        self
    }

    /// Calendar date of the record
    pub fn parsed_date(&self) -> Result<NaiveDate> {
        let raw = self
            .date
            .as_deref()
            .ok_or_else(|| Error::MalformedRecord("missing date".to_string()))?;
        parse_date(raw)
    }

    pub fn parsed_check_in(&self) -> Result<Option<DateTime<FixedOffset>>> {
        self.check_in.as_deref().map(parse_timestamp).transpose()
    }

    pub fn parsed_check_out(&self) -> Result<Option<DateTime<FixedOffset>>> {
        self.check_out.as_deref().map(parse_timestamp).transpose()
    }
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 (`2024-03-04T09:15:00Z`, `...+05:30`) and naive
/// datetimes, which are read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts);
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    Err(Error::MalformedRecord(format!("invalid timestamp: {}", raw)))
}

/// Parse a record date, accepting either a plain date or a full timestamp
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    parse_timestamp(trimmed)
        .map(|ts| ts.date_naive())
        .map_err(|_| Error::MalformedRecord(format!("invalid date: {}", raw)))
}

/// One observation of a periodic numeric series (e.g. monthly payroll cost)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl TimePoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// A projected period with its uncertainty band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ForecastPoint {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}
