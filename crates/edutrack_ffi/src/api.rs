//! FFI use-case API for UI-facing calls.
//!
//! # Responsibility
//! - Expose login, dashboard, attendance and task functions to the UI shell.
//! - Keep error semantics simple: envelopes with `ok` + `message`.
//!
//! - Drive capture flows through opaque handles the UI polls.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call opens its own connection; no connection is shared between calls.
//! - A closed or finished capture handle is forgotten; later calls on it fail
//!   without writing.

use chrono::Local;
use edutrack_core::db::open_db;
use edutrack_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AttendanceMethod, AttendanceRecord, CaptureError, CaptureSession, CaptureSource, CoreConfig,
    Credentials, DashboardService, FlowTimings, RecordStore, SessionService, SqliteStorage,
    StorageError, StorageRecordStore, StoreResult, SystemClock, Task, TaskService,
    TemplateTaskProvider, UserType,
};
use log::{info, warn};
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

const RECENT_LIMIT_MAX: u32 = 30;
const BRIDGE_DB_FILE_NAME: &str = "edutrack_local.sqlite3";
const DB_PATH_ENV: &str = "EDUTRACK_DB_PATH";
const CONFIG_PATH_ENV: &str = "EDUTRACK_CONFIG";
static BRIDGE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static BRIDGE_CONFIG: OnceLock<CoreConfig> = OnceLock::new();

type BridgeCapture = CaptureSession<BridgeRecordStore, SystemClock>;

static CAPTURES: Mutex<BTreeMap<u64, BridgeCapture>> = Mutex::new(BTreeMap::new());
static NEXT_CAPTURE_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Minimal health-check API for bridge smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
/// Safe to call repeatedly with the same `level + log_dir`. A blank `level`
/// uses the configured `log_level`.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = match level.trim() {
        "" => bridge_config().log_level.as_str(),
        explicit => explicit,
    };
    match init_logging_inner(level, log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Logged-in user as shown in the navbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    /// `student|teacher`.
    pub user_type: String,
    pub user_name: Option<String>,
    /// Student or teacher id, depending on `user_type`.
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResponse {
    pub ok: bool,
    pub session: Option<SessionView>,
    pub message: String,
}

/// One attendance row for list display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceItem {
    pub date: String,
    pub time: String,
    /// Empty for legacy records without a method tag.
    pub method: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDashboardResponse {
    pub attended_today: bool,
    pub today_record: Option<AttendanceItem>,
    pub recent: Vec<AttendanceItem>,
    pub applied_limit: u32,
    pub message: String,
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub record: Option<AttendanceItem>,
    /// Records affected, e.g. how many a sync uploaded.
    pub count: u32,
    pub message: String,
}

impl ActionResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            record: None,
            count: 0,
            message: message.into(),
        }
    }
}

/// State of one capture flow after a bridge call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResponse {
    pub ok: bool,
    pub handle: u64,
    /// `idle|camera|upload|scanning|processing|success|done|abandoned`.
    pub state: String,
    /// Milliseconds until the next `capture_poll` can advance the flow.
    pub poll_after_ms: Option<u64>,
    /// Set only by the call that wrote the record.
    pub record: Option<AttendanceItem>,
    pub message: String,
}

impl CaptureResponse {
    fn failure(handle: u64, state: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            handle,
            state: state.to_string(),
            poll_after_ms: None,
            record: None,
            message: message.into(),
        }
    }

    fn from_session(handle: u64, session: &BridgeCapture, record: Option<AttendanceRecord>) -> Self {
        let message = if record.is_some() {
            "Attendance recorded."
        } else {
            ""
        };
        Self {
            ok: true,
            handle,
            state: session.state().as_str().to_string(),
            poll_after_ms: session
                .until_next_step()
                .map(|left| u64::try_from(left.as_millis()).unwrap_or(u64::MAX)),
            record: record.map(to_attendance_item),
            message: message.to_string(),
        }
    }
}

/// Task card content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub title: String,
    pub kind: String,
    pub duration: String,
    pub priority: String,
    pub description: String,
}

/// Demo login. Any non-blank email and password are accepted.
#[flutter_rust_bridge::frb(sync)]
pub fn login(user_type: String, email: String, password: String) -> SessionResponse {
    let Some(user_type) = UserType::parse(&user_type) else {
        return SessionResponse {
            ok: false,
            session: None,
            message: format!("login failed: unknown user type `{}`", user_type.trim()),
        };
    };
    let credentials = Credentials::new(email, password);
    let result = with_connection(|conn| {
        SessionService::new(SqliteStorage::new(conn))
            .login(user_type, &credentials)
            .map_err(|err| err.to_string())
    });

    match result {
        Ok(session) => SessionResponse {
            ok: true,
            message: format!(
                "Welcome back, {}!",
                session.first_name().unwrap_or("there")
            ),
            session: Some(to_session_view(session)),
        },
        Err(err) => SessionResponse {
            ok: false,
            session: None,
            message: format!("login failed: {err}"),
        },
    }
}

/// Clears the session. Returns an empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn logout() -> String {
    match with_connection(|conn| {
        SessionService::new(SqliteStorage::new(conn))
            .logout()
            .map_err(|err| err.to_string())
    }) {
        Ok(()) => String::new(),
        Err(err) => format!("logout failed: {err}"),
    }
}

/// Current session, or `None` when logged out or storage is unavailable.
#[flutter_rust_bridge::frb(sync)]
pub fn current_session() -> Option<SessionView> {
    let result = with_connection(|conn| {
        SessionService::new(SqliteStorage::new(conn))
            .current()
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(session) => session.map(to_session_view),
        Err(err) => {
            warn!("event=current_session module=ffi status=error error={err}");
            None
        }
    }
}

/// Student dashboard state for today.
#[flutter_rust_bridge::frb(sync)]
pub fn student_dashboard(recent_limit: Option<u32>) -> StudentDashboardResponse {
    let applied_limit = normalize_recent_limit(recent_limit, bridge_config().recent_window);
    let today = Local::now().date_naive();
    let result = with_connection(|conn| {
        let store = StorageRecordStore::new(SqliteStorage::new(conn));
        DashboardService::with_recent_window(store, applied_limit as usize)
            .student_overview(today)
            .map_err(|err| err.to_string())
    });

    match result {
        Ok(overview) => StudentDashboardResponse {
            attended_today: overview.attended_today(),
            message: if overview.attended_today() {
                "Attendance marked for today.".to_string()
            } else {
                "Attendance not marked yet.".to_string()
            },
            today_record: overview.today_record.map(to_attendance_item),
            recent: overview.recent.into_iter().map(to_attendance_item).collect(),
            applied_limit,
        },
        Err(err) => StudentDashboardResponse {
            attended_today: false,
            today_record: None,
            recent: Vec::new(),
            applied_limit,
            message: format!("student_dashboard failed: {err}"),
        },
    }
}

/// Opens a capture flow for `method` and returns its handle.
///
/// The written record is stamped with the logged-in student, if any.
#[flutter_rust_bridge::frb(sync)]
pub fn start_capture(method: String) -> CaptureResponse {
    start_capture_with(&method, bridge_config().flow_timings)
}

/// Starts a QR or proximity scan.
#[flutter_rust_bridge::frb(sync)]
pub fn capture_scan(handle: u64) -> CaptureResponse {
    with_capture(handle, "capture_scan", |session| session.scan().map(|_| None))
}

/// Picks the face capture source: `camera|upload`.
#[flutter_rust_bridge::frb(sync)]
pub fn capture_select_source(handle: u64, source: String) -> CaptureResponse {
    let source = match source.trim() {
        "camera" => CaptureSource::Camera,
        "upload" => CaptureSource::Upload,
        other => {
            return CaptureResponse::failure(
                handle,
                "",
                format!("capture_select_source failed: unknown source `{other}`"),
            )
        }
    };
    with_capture(handle, "capture_select_source", |session| {
        session.capture(source).map(|_| None)
    })
}

/// Fires due steps. The call that reaches `done` returns the written record.
#[flutter_rust_bridge::frb(sync)]
pub fn capture_poll(handle: u64) -> CaptureResponse {
    with_capture(handle, "capture_poll", |session| session.poll())
}

/// Closes the flow. Pending steps are cancelled and nothing is written.
#[flutter_rust_bridge::frb(sync)]
pub fn capture_abandon(handle: u64) -> CaptureResponse {
    let Some(mut session) = lock_captures().remove(&handle) else {
        return CaptureResponse::failure(
            handle,
            "",
            format!("capture_abandon failed: unknown capture handle {handle}"),
        );
    };
    session.abandon();
    CaptureResponse::from_session(handle, &session, None)
}

/// Teacher "sync": uploads nothing, empties the local history.
#[flutter_rust_bridge::frb(sync)]
pub fn teacher_sync() -> ActionResponse {
    let result = with_connection(|conn| {
        let store = StorageRecordStore::new(SqliteStorage::new(conn));
        DashboardService::new(store)
            .sync_records()
            .map_err(|err| err.to_string())
    });

    match result {
        Ok(synced) => ActionResponse {
            ok: true,
            record: None,
            count: u32::try_from(synced).unwrap_or(u32::MAX),
            message: format!("Synced {synced} record(s)."),
        },
        Err(err) => ActionResponse::failure(format!("teacher_sync failed: {err}")),
    }
}

/// Suggested tasks for a subject. Never fails; worst case is the fallback list.
///
/// Blocks for the simulated provider latency.
pub fn fetch_tasks(subject: String) -> Vec<TaskItem> {
    let provider = TemplateTaskProvider::with_latency(bridge_config().task_latency());
    TaskService::new(provider)
        .fetch_tasks(&subject)
        .into_iter()
        .map(to_task_item)
        .collect()
}

fn start_capture_with(method: &str, timings: FlowTimings) -> CaptureResponse {
    let Some(method) = AttendanceMethod::parse(method) else {
        return CaptureResponse::failure(
            0,
            "",
            format!("start_capture failed: unknown method `{}`", method.trim()),
        );
    };

    let student = with_connection(|conn| {
        SessionService::new(SqliteStorage::new(conn))
            .current()
            .map_err(|err| err.to_string())
    });
    let (student_id, student_name) = match student {
        Ok(Some(session)) if session.user_type == UserType::Student => {
            (session.user_id, session.user_name)
        }
        Ok(_) => (None, None),
        Err(err) => {
            return CaptureResponse::failure(0, "", format!("start_capture failed: {err}"))
        }
    };

    let session = CaptureSession::new(method, BridgeRecordStore, SystemClock::new(), timings)
        .with_student(student_id, student_name);
    let handle = NEXT_CAPTURE_HANDLE.fetch_add(1, Ordering::Relaxed);
    let response = CaptureResponse::from_session(handle, &session, None);
    lock_captures().insert(handle, session);
    info!(
        "event=capture_open module=ffi status=ok method={} handle={handle}",
        method.as_str()
    );
    response
}

fn with_capture(
    handle: u64,
    op: &str,
    step: impl FnOnce(&mut BridgeCapture) -> Result<Option<AttendanceRecord>, CaptureError>,
) -> CaptureResponse {
    let mut captures = lock_captures();
    let Some(session) = captures.get_mut(&handle) else {
        return CaptureResponse::failure(
            handle,
            "",
            format!("{op} failed: unknown capture handle {handle}"),
        );
    };

    let response = match step(&mut *session) {
        Ok(record) => CaptureResponse::from_session(handle, session, record),
        Err(err) => {
            CaptureResponse::failure(handle, session.state().as_str(), format!("{op} failed: {err}"))
        }
    };
    if session.state().is_terminal() {
        captures.remove(&handle);
    }
    response
}

fn lock_captures() -> MutexGuard<'static, BTreeMap<u64, BridgeCapture>> {
    CAPTURES.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Record store that opens the bridge database for every operation, so a
/// capture flow can outlive any single connection.
struct BridgeRecordStore;

impl BridgeRecordStore {
    fn with_store<T>(
        &self,
        op: impl FnOnce(&StorageRecordStore<SqliteStorage<'_>>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let conn = open_db(resolve_bridge_db_path()).map_err(StorageError::from)?;
        op(&StorageRecordStore::new(SqliteStorage::new(&conn)))
    }
}

impl RecordStore for BridgeRecordStore {
    fn append(&self, record: &AttendanceRecord) -> StoreResult<()> {
        self.with_store(|store| store.append(record))
    }

    fn read_all(&self) -> StoreResult<Vec<AttendanceRecord>> {
        self.with_store(|store| store.read_all())
    }

    fn clear(&self) -> StoreResult<()> {
        self.with_store(|store| store.clear())
    }
}

fn normalize_recent_limit(limit: Option<u32>, default_window: usize) -> u32 {
    match limit {
        Some(0) | None => u32::try_from(default_window)
            .unwrap_or(u32::MAX)
            .min(RECENT_LIMIT_MAX),
        Some(value) => value.min(RECENT_LIMIT_MAX),
    }
}

fn bridge_config() -> &'static CoreConfig {
    BRIDGE_CONFIG.get_or_init(|| load_bridge_config(std::env::var(CONFIG_PATH_ENV).ok().as_deref()))
}

/// Reads the config file named by `path`. Missing or invalid files fall back
/// to defaults so the UI still starts.
fn load_bridge_config(path: Option<&str>) -> CoreConfig {
    let Some(path) = path.map(str::trim).filter(|path| !path.is_empty()) else {
        return CoreConfig::default();
    };
    match CoreConfig::from_json_file(path) {
        Ok(config) => {
            info!("event=config_load module=ffi status=ok path={path}");
            config
        }
        Err(err) => {
            warn!("event=config_load module=ffi status=error path={path} error={err}");
            CoreConfig::default()
        }
    }
}

fn resolve_bridge_db_path() -> PathBuf {
    BRIDGE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(BRIDGE_DB_FILE_NAME)
        })
        .clone()
}

fn with_connection<T>(f: impl FnOnce(&Connection) -> Result<T, String>) -> Result<T, String> {
    let db_path = resolve_bridge_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("local DB open failed: {err}"))?;
    f(&conn)
}

fn to_session_view(session: edutrack_core::Session) -> SessionView {
    SessionView {
        user_type: session.user_type.as_str().to_string(),
        user_name: session.user_name,
        user_id: session.user_id,
    }
}

fn to_attendance_item(record: AttendanceRecord) -> AttendanceItem {
    AttendanceItem {
        date: record.date,
        time: record.time,
        method: record
            .method
            .map(|method| method.as_str().to_string())
            .unwrap_or_default(),
        status: record.status.as_str().to_string(),
    }
}

fn to_task_item(task: Task) -> TaskItem {
    TaskItem {
        title: task.title,
        kind: task.kind.as_str().to_string(),
        duration: task.duration,
        priority: task.priority.as_str().to_string(),
        description: task.description.unwrap_or_default(),
    }
}
