//! Attendance record store contract and storage-backed implementation.
//!
//! # Responsibility
//! - Keep the ordered attendance log in the `attendanceHistory` slot.
//! - Offer the read helpers dashboards need (`find_by_date`, `tail`).
//!
//! # Invariants
//! - Stored order equals append order.
//! - `find_by_date` returns the earliest-appended match, not the latest.
//! - Read-modify-write in `append` is not guarded; the last writer wins.
//! - Array elements that do not decode as records are hidden from reads but
//!   kept in the slot, so `append` never drops them.

use crate::model::attendance::AttendanceRecord;
use crate::storage::{KeyValueStorage, StorageError};
use log::{debug, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the JSON-encoded record array.
pub const ATTENDANCE_HISTORY_KEY: &str = "attendanceHistory";

pub type StoreResult<T> = Result<T, StoreError>;

/// Record store error.
#[derive(Debug)]
pub enum StoreError {
    Storage(StorageError),
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode attendance history: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Ordered, append-only attendance log.
pub trait RecordStore {
    fn append(&self, record: &AttendanceRecord) -> StoreResult<()>;
    fn read_all(&self) -> StoreResult<Vec<AttendanceRecord>>;
    fn clear(&self) -> StoreResult<()>;

    /// First record in stored order whose `date` equals `date`.
    fn find_by_date(&self, date: &str) -> StoreResult<Option<AttendanceRecord>> {
        Ok(self
            .read_all()?
            .into_iter()
            .find(|record| record.date == date))
    }

    /// Last `min(n, len)` records, oldest first.
    fn tail(&self, n: usize) -> StoreResult<Vec<AttendanceRecord>> {
        let mut records = self.read_all()?;
        let skip = records.len().saturating_sub(n);
        Ok(records.split_off(skip))
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.read_all()?.len())
    }
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn append(&self, record: &AttendanceRecord) -> StoreResult<()> {
        (**self).append(record)
    }

    fn read_all(&self) -> StoreResult<Vec<AttendanceRecord>> {
        (**self).read_all()
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }
}

/// Record store kept as one JSON array in a key/value storage slot.
pub struct StorageRecordStore<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> StorageRecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns the underlying storage, e.g. to share it with the session service.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: KeyValueStorage> StorageRecordStore<S> {
    fn read_slot(&self) -> StoreResult<Vec<Value>> {
        let Some(raw) = self.storage.get_item(ATTENDANCE_HISTORY_KEY)? else {
            return Ok(Vec::new());
        };
        Ok(decode_slot(&raw))
    }
}

impl<S: KeyValueStorage> RecordStore for StorageRecordStore<S> {
    fn append(&self, record: &AttendanceRecord) -> StoreResult<()> {
        let mut entries = self.read_slot()?;
        entries.push(serde_json::to_value(record).map_err(StoreError::Encode)?);
        let encoded = serde_json::to_string(&entries).map_err(StoreError::Encode)?;
        self.storage.set_item(ATTENDANCE_HISTORY_KEY, &encoded)?;
        debug!(
            "event=attendance_append module=repo status=ok total={}",
            entries.len()
        );
        Ok(())
    }

    fn read_all(&self) -> StoreResult<Vec<AttendanceRecord>> {
        Ok(decode_records(self.read_slot()?))
    }

    fn clear(&self) -> StoreResult<()> {
        self.storage.remove_item(ATTENDANCE_HISTORY_KEY)?;
        Ok(())
    }
}

/// Raw slot elements; anything but a JSON array reads as empty.
fn decode_slot(raw: &str) -> Vec<Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(other) => {
            warn!(
                "event=attendance_decode module=repo status=recovered error_code=history_not_array bytes={} kind={}",
                raw.len(),
                json_kind(&other)
            );
            Vec::new()
        }
        Err(err) => {
            warn!(
                "event=attendance_decode module=repo status=recovered error_code=corrupt_history bytes={} line={} column={}",
                raw.len(),
                err.line(),
                err.column()
            );
            Vec::new()
        }
    }
}

fn decode_records(entries: Vec<Value>) -> Vec<AttendanceRecord> {
    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<AttendanceRecord>(entry) {
            Ok(record) => records.push(record),
            Err(err) => warn!(
                "event=attendance_decode module=repo status=skipped error_code=invalid_record index={} error={}",
                index, err
            ),
        }
    }
    records
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
