//! Wall-clock and monotonic time sources.

use chrono::{Local, NaiveDateTime, TimeDelta};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Time source for capture sessions.
pub trait Clock {
    /// Local wall time, used to stamp records.
    fn now(&self) -> NaiveDateTime;
    /// Monotonic time since the clock was created, used for timers.
    fn elapsed(&self) -> Duration;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }

    fn elapsed(&self) -> Duration {
        (**self).elapsed()
    }
}

/// Real clock backed by the OS.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    started_at: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Virtual clock that only moves when told to.
///
/// Clones share the same timeline, so a test can keep one handle and give
/// another to the session under test.
#[derive(Debug, Clone)]
pub struct ManualClock {
    state: Rc<RefCell<ManualState>>,
}

#[derive(Debug)]
struct ManualState {
    origin: NaiveDateTime,
    elapsed: Duration,
}

impl ManualClock {
    pub fn starting_at(origin: NaiveDateTime) -> Self {
        Self {
            state: Rc::new(RefCell::new(ManualState {
                origin,
                elapsed: Duration::ZERO,
            })),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.state.borrow_mut().elapsed += by;
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        let state = self.state.borrow();
        let millis = i64::try_from(state.elapsed.as_millis()).unwrap_or(i64::MAX);
        let offset = TimeDelta::milliseconds(millis);
        state.origin.checked_add_signed(offset).unwrap_or(state.origin)
    }

    fn elapsed(&self) -> Duration {
        self.state.borrow().elapsed
    }
}
