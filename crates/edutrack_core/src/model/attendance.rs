//! Attendance record model.
//!
//! # Responsibility
//! - Define the record appended by capture flows.
//! - Keep the JSON wire shape compatible with the `attendanceHistory` slot.
//!
//! # Invariants
//! - `date` is always `YYYY-MM-DD` for records stamped by this crate.
//! - Capture flows only ever write `AttendanceStatus::Present`.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Date format used by the `date` field.
pub const RECORD_DATE_FORMAT: &str = "%Y-%m-%d";
/// Time-of-day format used by the `time` field (`9:05:12 AM`).
pub const RECORD_TIME_FORMAT: &str = "%-I:%M:%S %p";

/// Which capture flow produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceMethod {
    QrCode,
    Proximity,
    FaceRecognition,
}

impl AttendanceMethod {
    /// Stable wire tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::QrCode => "qr_code",
            Self::Proximity => "proximity",
            Self::FaceRecognition => "face_recognition",
        }
    }

    /// Parses a wire tag; surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "qr_code" => Some(Self::QrCode),
            "proximity" => Some(Self::Proximity),
            "face_recognition" => Some(Self::FaceRecognition),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
        }
    }
}

/// One attendance event as stored in the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Local time of day, e.g. `9:05:12 AM`.
    pub time: String,
    /// Absent on legacy entries written before methods were tagged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<AttendanceMethod>,
    pub status: AttendanceStatus,
    #[serde(
        rename = "studentId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub student_id: Option<String>,
    #[serde(
        rename = "studentName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub student_name: Option<String>,
}

impl AttendanceRecord {
    /// Builds a `present` record stamped from `captured_at`.
    pub fn captured(method: AttendanceMethod, captured_at: NaiveDateTime) -> Self {
        Self {
            date: format_record_date(captured_at.date()),
            time: captured_at.format(RECORD_TIME_FORMAT).to_string(),
            method: Some(method),
            status: AttendanceStatus::Present,
            student_id: None,
            student_name: None,
        }
    }

    /// Attaches the logged-in student's identity.
    pub fn with_student(mut self, student_id: Option<String>, student_name: Option<String>) -> Self {
        self.student_id = student_id;
        self.student_name = student_name;
        self
    }

    /// Returns whether this record was captured on `date`.
    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.date == format_record_date(date)
    }
}

/// Formats a date the way the `date` field stores it.
pub fn format_record_date(date: NaiveDate) -> String {
    date.format(RECORD_DATE_FORMAT).to_string()
}
