//! One running capture flow bound to a record store and a clock.
//!
//! # Responsibility
//! - Arm a timer for every timed state and fire it on `poll`.
//! - Append the attendance record when the flow reaches `Done`.
//! - Invalidate pending timers when the owning view closes.
//!
//! # Invariants
//! - At most one timer is pending at any time.
//! - A timer only advances the flow if the flow is still in the state that
//!   armed it.
//! - Chained steps are scheduled from the previous step's due time, so a late
//!   `poll` yields the same state as timely ones.
//! - Dropping a session abandons it; nothing is written afterwards.

use crate::capture::clock::Clock;
use crate::capture::flow::{
    CaptureFlow, CaptureSource, FlowError, FlowState, FlowTimings, Transition, UserAction,
};
use crate::capture::scheduler::{Scheduler, TimerId};
use crate::model::attendance::{AttendanceMethod, AttendanceRecord};
use crate::repo::attendance_repo::{RecordStore, StoreError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

#[derive(Debug)]
pub enum CaptureError {
    Flow(FlowError),
    Store(StoreError),
}

impl Display for CaptureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flow(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "failed to record attendance: {err}"),
        }
    }
}

impl Error for CaptureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Flow(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<FlowError> for CaptureError {
    fn from(value: FlowError) -> Self {
        Self::Flow(value)
    }
}

impl From<StoreError> for CaptureError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub struct CaptureSession<R: RecordStore, C: Clock> {
    flow: CaptureFlow,
    store: R,
    clock: C,
    scheduler: Scheduler<FlowState>,
    pending: Option<TimerId>,
    student_id: Option<String>,
    student_name: Option<String>,
    record: Option<AttendanceRecord>,
}

impl<R: RecordStore, C: Clock> CaptureSession<R, C> {
    pub fn new(method: AttendanceMethod, store: R, clock: C, timings: FlowTimings) -> Self {
        Self {
            flow: CaptureFlow::new(method, timings),
            store,
            clock,
            scheduler: Scheduler::new(),
            pending: None,
            student_id: None,
            student_name: None,
            record: None,
        }
    }

    /// Stamps the written record with the logged-in student.
    pub fn with_student(mut self, student_id: Option<String>, student_name: Option<String>) -> Self {
        self.student_id = student_id;
        self.student_name = student_name;
        self
    }

    pub fn method(&self) -> AttendanceMethod {
        self.flow.method()
    }

    pub fn state(&self) -> FlowState {
        self.flow.state()
    }

    /// Record written on completion, if the flow got there.
    pub fn record(&self) -> Option<&AttendanceRecord> {
        self.record.as_ref()
    }

    /// Timeline position of the next timed step.
    pub fn next_due(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    /// Time left until the next timed step, `None` when nothing is pending.
    pub fn until_next_step(&self) -> Option<Duration> {
        self.next_due()
            .map(|due| due.saturating_sub(self.clock.elapsed()))
    }

    /// Starts a QR or proximity scan.
    pub fn scan(&mut self) -> Result<FlowState, CaptureError> {
        self.act(UserAction::Scan)
    }

    /// Starts face capture from the chosen source.
    pub fn capture(&mut self, source: CaptureSource) -> Result<FlowState, CaptureError> {
        self.act(UserAction::Capture(source))
    }

    pub fn act(&mut self, action: UserAction) -> Result<FlowState, CaptureError> {
        let transition = self.flow.apply(action)?;
        info!(
            "event=capture_start module=capture status=ok method={} state={}",
            self.method().as_str(),
            transition.to.as_str()
        );
        self.arm(self.clock.elapsed(), &transition);
        Ok(transition.to)
    }

    /// Fires every timer due by now. Returns the record if this call wrote it.
    pub fn poll(&mut self) -> Result<Option<AttendanceRecord>, CaptureError> {
        let now = self.clock.elapsed();
        while let Some(fired) = self.scheduler.pop_due(now) {
            if self.pending != Some(fired.id) {
                continue;
            }
            self.pending = None;
            if fired.event != self.flow.state() {
                warn!(
                    "event=capture_step module=capture status=skipped method={} armed_in={} state={}",
                    self.method().as_str(),
                    fired.event.as_str(),
                    self.flow.state().as_str()
                );
                continue;
            }

            let transition = self.flow.on_timer()?;
            debug!(
                "event=capture_step module=capture status=ok method={} from={} to={} due_ms={}",
                self.method().as_str(),
                transition.from.as_str(),
                transition.to.as_str(),
                fired.due.as_millis()
            );

            if transition.completes() {
                return self.complete().map(Some);
            }
            self.arm(fired.due, &transition);
        }
        Ok(None)
    }

    /// Closes the flow. Pending timers are cancelled so no late write can happen.
    pub fn abandon(&mut self) -> bool {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel(id);
        }
        self.scheduler.cancel_all();
        let from = self.flow.state();
        let abandoned = self.flow.abandon();
        if abandoned {
            info!(
                "event=capture_abandon module=capture status=ok method={} state={}",
                self.method().as_str(),
                from.as_str()
            );
        }
        abandoned
    }

    fn arm(&mut self, base: Duration, transition: &Transition) {
        if let Some(dwell) = transition.dwell {
            self.pending = Some(self.scheduler.schedule(base, dwell, transition.to));
        }
    }

    fn complete(&mut self) -> Result<AttendanceRecord, CaptureError> {
        let record = AttendanceRecord::captured(self.method(), self.clock.now())
            .with_student(self.student_id.clone(), self.student_name.clone());

        if let Err(err) = self.store.append(&record) {
            warn!(
                "event=capture_complete module=capture status=error method={} error={}",
                self.method().as_str(),
                err
            );
            return Err(err.into());
        }

        info!(
            "event=capture_complete module=capture status=ok method={} date={}",
            self.method().as_str(),
            record.date
        );
        self.record = Some(record.clone());
        Ok(record)
    }
}

impl<R: RecordStore, C: Clock> Drop for CaptureSession<R, C> {
    fn drop(&mut self) {
        self.abandon();
    }
}
