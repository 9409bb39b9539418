//! Capture flow state machine.
//!
//! # Responsibility
//! - Encode the legal state progression for each attendance method.
//! - Report how long each state dwells before its timed successor.
//!
//! # Invariants
//! - `Done` and `Abandoned` are terminal; no transition leaves them.
//! - QR and proximity flows never visit camera/upload/processing states.
//! - The flow itself performs no I/O; callers schedule and persist.

use crate::model::attendance::AttendanceMethod;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Simulated hardware latencies, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowTimings {
    pub qr_scan_ms: u64,
    pub proximity_scan_ms: u64,
    pub camera_capture_ms: u64,
    pub upload_ms: u64,
    pub processing_ms: u64,
    /// How long the success screen shows before the record is written.
    pub success_hold_ms: u64,
}

impl Default for FlowTimings {
    fn default() -> Self {
        Self {
            qr_scan_ms: 3_000,
            proximity_scan_ms: 2_500,
            camera_capture_ms: 2_000,
            upload_ms: 1_000,
            processing_ms: 3_000,
            success_hold_ms: 2_000,
        }
    }
}

/// UI-visible flow state. `Idle` doubles as the face flow's source picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowState {
    Idle,
    Camera,
    Upload,
    Scanning,
    Processing,
    Success,
    Done,
    Abandoned,
}

impl FlowState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Camera => "camera",
            Self::Upload => "upload",
            Self::Scanning => "scanning",
            Self::Processing => "processing",
            Self::Success => "success",
            Self::Done => "done",
            Self::Abandoned => "abandoned",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Abandoned)
    }
}

/// Where the face image comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureSource {
    Camera,
    Upload,
}

/// Explicit user input to a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAction {
    /// Tap "scan" on the QR or proximity screen.
    Scan,
    /// Pick a face capture source.
    Capture(CaptureSource),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    UnexpectedAction {
        method: AttendanceMethod,
        state: FlowState,
        action: UserAction,
    },
    NoTimedStep(FlowState),
}

impl Display for FlowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedAction {
                method,
                state,
                action,
            } => write!(
                f,
                "{} flow cannot handle {action:?} in state `{}`",
                method.as_str(),
                state.as_str()
            ),
            Self::NoTimedStep(state) => {
                write!(f, "state `{}` has no timed successor", state.as_str())
            }
        }
    }
}

impl Error for FlowError {}

/// Result of one state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: FlowState,
    pub to: FlowState,
    /// Delay before the next timed step, `None` when `to` waits on nothing.
    pub dwell: Option<Duration>,
}

impl Transition {
    /// The flow just reached the state that writes a record.
    pub fn completes(&self) -> bool {
        self.to == FlowState::Done
    }
}

#[derive(Debug, Clone)]
pub struct CaptureFlow {
    method: AttendanceMethod,
    timings: FlowTimings,
    state: FlowState,
}

impl CaptureFlow {
    pub fn new(method: AttendanceMethod, timings: FlowTimings) -> Self {
        Self {
            method,
            timings,
            state: FlowState::Idle,
        }
    }

    pub fn method(&self) -> AttendanceMethod {
        self.method
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Applies a user action from `Idle`.
    pub fn apply(&mut self, action: UserAction) -> Result<Transition, FlowError> {
        let next = match (self.method, self.state, action) {
            (
                AttendanceMethod::QrCode | AttendanceMethod::Proximity,
                FlowState::Idle,
                UserAction::Scan,
            ) => FlowState::Scanning,
            (
                AttendanceMethod::FaceRecognition,
                FlowState::Idle,
                UserAction::Capture(CaptureSource::Camera),
            ) => FlowState::Camera,
            (
                AttendanceMethod::FaceRecognition,
                FlowState::Idle,
                UserAction::Capture(CaptureSource::Upload),
            ) => FlowState::Upload,
            (method, state, action) => {
                return Err(FlowError::UnexpectedAction {
                    method,
                    state,
                    action,
                })
            }
        };
        Ok(self.enter(next))
    }

    /// Advances to the timed successor of the current state.
    pub fn on_timer(&mut self) -> Result<Transition, FlowError> {
        let next = match self.state {
            FlowState::Scanning | FlowState::Success => FlowState::Done,
            FlowState::Camera | FlowState::Upload => FlowState::Processing,
            FlowState::Processing => FlowState::Success,
            other => return Err(FlowError::NoTimedStep(other)),
        };
        Ok(self.enter(next))
    }

    /// Moves to `Abandoned` unless already terminal. Returns whether it moved.
    pub fn abandon(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = FlowState::Abandoned;
        true
    }

    fn enter(&mut self, to: FlowState) -> Transition {
        let from = self.state;
        self.state = to;
        Transition {
            from,
            to,
            dwell: self.dwell(to).map(Duration::from_millis),
        }
    }

    fn dwell(&self, state: FlowState) -> Option<u64> {
        let timings = &self.timings;
        match state {
            FlowState::Scanning => Some(match self.method {
                AttendanceMethod::Proximity => timings.proximity_scan_ms,
                _ => timings.qr_scan_ms,
            }),
            FlowState::Camera => Some(timings.camera_capture_ms),
            FlowState::Upload => Some(timings.upload_ms),
            FlowState::Processing => Some(timings.processing_ms),
            FlowState::Success => Some(timings.success_hold_ms),
            FlowState::Idle | FlowState::Done | FlowState::Abandoned => None,
        }
    }
}
