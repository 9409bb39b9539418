//! One-shot timer queue on a caller-supplied timeline.
//!
//! # Invariants
//! - A cancelled timer never fires.
//! - Due timers pop in `(due, scheduling order)` order.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle for one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// A timer that came due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredTimer<E> {
    pub id: TimerId,
    /// Scheduled due time; may be earlier than the poll time.
    pub due: Duration,
    pub event: E,
}

#[derive(Debug)]
pub struct Scheduler<E> {
    next_id: u64,
    queue: BTreeMap<(Duration, TimerId), E>,
    due_by_id: HashMap<TimerId, Duration>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            queue: BTreeMap::new(),
            due_by_id: HashMap::new(),
        }
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `event` to fire at `base + delay`.
    pub fn schedule(&mut self, base: Duration, delay: Duration, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = base.saturating_add(delay);
        self.queue.insert((due, id), event);
        self.due_by_id.insert(id, due);
        id
    }

    /// Cancels a pending timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.due_by_id.remove(&id) {
            Some(due) => self.queue.remove(&(due, id)).is_some(),
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        self.queue.clear();
        self.due_by_id.clear();
    }

    /// Pops the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<FiredTimer<E>> {
        let (&(due, id), _) = self.queue.first_key_value()?;
        if due > now {
            return None;
        }
        let event = self.queue.remove(&(due, id))?;
        self.due_by_id.remove(&id);
        Some(FiredTimer { id, due, event })
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Scheduler;
    use std::time::Duration;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn pops_in_due_order_then_insertion_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(0), ms(300), "late");
        scheduler.schedule(ms(0), ms(100), "first");
        scheduler.schedule(ms(50), ms(50), "second");

        assert!(scheduler.pop_due(ms(99)).is_none());
        let fired: Vec<_> = std::iter::from_fn(|| scheduler.pop_due(ms(300)))
            .map(|timer| timer.event)
            .collect();
        assert_eq!(fired, vec!["first", "second", "late"]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(ms(0), ms(10), ());
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.pop_due(ms(1_000)).is_none());
        assert_eq!(scheduler.next_due(), None);
    }
}
