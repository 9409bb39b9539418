//! Core domain logic for EduTrack attendance and study planning.
//! This crate is the single source of truth for attendance invariants.

pub mod capture;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;
pub mod tasks;

pub use capture::clock::{Clock, ManualClock, SystemClock};
pub use capture::flow::{
    CaptureFlow, CaptureSource, FlowError, FlowState, FlowTimings, Transition, UserAction,
};
pub use capture::session::{CaptureError, CaptureSession};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::attendance::{AttendanceMethod, AttendanceRecord, AttendanceStatus};
pub use model::session::{Session, UserType};
pub use model::task::{Task, TaskPriority, TaskType};
pub use repo::attendance_repo::{
    RecordStore, StorageRecordStore, StoreError, StoreResult, ATTENDANCE_HISTORY_KEY,
};
pub use service::dashboard_service::{DashboardService, StudentOverview};
pub use service::session_service::{Credentials, SessionError, SessionService};
pub use service::task_service::TaskService;
pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage, StorageError};
pub use tasks::provider::{
    CannedResponseProvider, TaskProvider, TaskProviderError, TemplateTaskProvider,
};
pub use tasks::supplier::{fallback_tasks, supply_tasks, DEFAULT_SUBJECT};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
