//! Dashboard read models over the attendance record store.
//!
//! # Responsibility
//! - Compute the student view: attended today, recent attendance.
//! - Run the teacher "sync", which empties the whole store.
//!
//! # Invariants
//! - "Attended today" uses the first record for the date, not the latest.
//! - Sync removes every record, not only the ones counted.

use crate::config::DEFAULT_RECENT_WINDOW;
use crate::model::attendance::{format_record_date, AttendanceRecord};
use crate::repo::attendance_repo::{RecordStore, StoreResult};
use chrono::NaiveDate;
use log::info;

/// Student dashboard state, computed on mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentOverview {
    /// `YYYY-MM-DD` of the day the overview was computed for.
    pub today: String,
    pub today_record: Option<AttendanceRecord>,
    /// Trailing window, oldest first.
    pub recent: Vec<AttendanceRecord>,
}

impl StudentOverview {
    pub fn attended_today(&self) -> bool {
        self.today_record.is_some()
    }
}

pub struct DashboardService<R: RecordStore> {
    store: R,
    recent_window: usize,
}

impl<R: RecordStore> DashboardService<R> {
    pub fn new(store: R) -> Self {
        Self::with_recent_window(store, DEFAULT_RECENT_WINDOW)
    }

    pub fn with_recent_window(store: R, recent_window: usize) -> Self {
        Self {
            store,
            recent_window,
        }
    }

    pub fn student_overview(&self, today: NaiveDate) -> StoreResult<StudentOverview> {
        let today = format_record_date(today);
        let today_record = self.store.find_by_date(&today)?;
        let recent = self.store.tail(self.recent_window)?;
        Ok(StudentOverview {
            today,
            today_record,
            recent,
        })
    }

    pub fn attended_on(&self, date: NaiveDate) -> StoreResult<bool> {
        Ok(self
            .store
            .find_by_date(&format_record_date(date))?
            .is_some())
    }

    pub fn recent(&self) -> StoreResult<Vec<AttendanceRecord>> {
        self.store.tail(self.recent_window)
    }

    /// Simulated upload: clears the store and returns how many records it held.
    pub fn sync_records(&self) -> StoreResult<usize> {
        let pending = self.store.len()?;
        self.store.clear()?;
        info!(
            "event=attendance_sync module=service status=ok synced={}",
            pending
        );
        Ok(pending)
    }
}
