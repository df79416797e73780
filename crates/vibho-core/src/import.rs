//! Attendance record import (JSON and CSV)

use std::fmt;
use std::io::Read;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{AttendanceRecord, AttendanceStatus};

/// Input encoding for attendance records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordFormat {
    #[default]
    Json,
    Csv,
}

impl RecordFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordFormat::Json => "json",
            RecordFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(RecordFormat::Json),
            "csv" => Ok(RecordFormat::Csv),
            _ => Err(format!("Unknown record format: {}", s)),
        }
    }
}

/// Parse attendance records in the given format
pub fn parse_records<R: Read>(reader: R, format: RecordFormat) -> Result<Vec<AttendanceRecord>> {
    match format {
        RecordFormat::Json => parse_attendance_json(reader),
        RecordFormat::Csv => parse_attendance_csv(reader),
    }
}

/// JSON input: a bare array, or an object wrapping it under `attendanceRecords`
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonRecords {
    List(Vec<AttendanceRecord>),
    #[serde(rename_all = "camelCase")]
    Wrapped {
        attendance_records: Vec<AttendanceRecord>,
    },
}

/// Parse attendance records from JSON
pub fn parse_attendance_json<R: Read>(reader: R) -> Result<Vec<AttendanceRecord>> {
    let parsed: JsonRecords = serde_json::from_reader(reader).map_err(|e| {
        Error::InvalidInput(format!("expected a list of attendance records: {}", e))
    })?;

    let records = match parsed {
        JsonRecords::List(records) => records,
        JsonRecords::Wrapped { attendance_records } => attendance_records,
    };
    debug!(count = records.len(), "Parsed attendance records from JSON");
    Ok(records)
}

/// Column positions resolved from the CSV header
struct Columns {
    date: Option<usize>,
    status: usize,
    check_in: Option<usize>,
    check_out: Option<usize>,
    overtime: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        // camelCase and snake_case headers are both accepted
        let find = |names: &[&str]| {
            headers.iter().position(|h| {
                let h = h.trim().to_lowercase();
                names.iter().any(|n| h == *n)
            })
        };

        Ok(Self {
            date: find(&["date"]),
            status: find(&["status"])
                .ok_or_else(|| Error::InvalidInput("CSV is missing a status column".into()))?,
            check_in: find(&["checkin", "check_in"]),
            check_out: find(&["checkout", "check_out"]),
            overtime: find(&["overtime"]),
        })
    }
}

/// Non-empty trimmed cell at an optional column
fn cell(record: &StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse attendance records from CSV.
///
/// Expected headers: `date,status,checkIn,checkOut,overtime`. Only `status`
/// is required; empty cells become missing values and unrecognized statuses
/// become `other`.
pub fn parse_attendance_csv<R: Read>(reader: R) -> Result<Vec<AttendanceRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = Columns::from_headers(&headers)?;
    let mut records = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        // header is line 1
        let line = row + 2;

        let status = cell(&record, Some(columns.status))
            .map(|raw| raw.parse().unwrap_or(AttendanceStatus::Other))
            .ok_or_else(|| Error::InvalidInput(format!("line {}: missing status", line)))?;

        let overtime = match cell(&record, columns.overtime) {
            Some(raw) => Some(raw.parse::<f64>().map_err(|_| {
                Error::InvalidInput(format!("line {}: invalid overtime '{}'", line, raw))
            })?),
            None => None,
        };

        records.push(AttendanceRecord {
            date: cell(&record, columns.date),
            status,
            check_in: cell(&record, columns.check_in),
            check_out: cell(&record, columns.check_out),
            overtime,
        });
    }

    debug!(count = records.len(), "Parsed attendance records from CSV");
    Ok(records)
}
