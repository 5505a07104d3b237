#![forbid(unsafe_code)]

//! Single-shot deadline timers driven by explicit timestamps.
//!
//! A [`TimerSlot`] holds at most one pending deadline. Arming an armed slot
//! replaces the previous deadline, cancelling is idempotent, and a slot
//! fires at most once per arm. Time is never read from the system clock
//! here: callers pass `now`, which keeps timer behaviour deterministic in
//! tests and lets the runtime decide when to wake.
//!
//! # Invariants
//!
//! 1. `fire_if_due(now)` returns `true` at most once per `arm`.
//! 2. After `cancel()` the slot never fires until re-armed.

use std::time::{Duration, Instant};

/// A cancellable single-shot deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerSlot {
    deadline: Option<Instant>,
}

impl TimerSlot {
    /// Create an idle slot.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Schedule the slot to fire `delay` after `now`, replacing any pending deadline.
    #[inline]
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    /// Cancel the pending deadline. Returns whether one was pending.
    #[inline]
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Whether a deadline is pending.
    #[inline]
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline, if any.
    #[inline]
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the deadline has been reached at `now`.
    #[inline]
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= now)
    }

    /// Disarm and report `true` if the deadline has been reached at `now`.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}

/// Return the earliest of several optional deadlines.
#[must_use]
pub fn earliest(deadlines: impl IntoIterator<Item = Option<Instant>>) -> Option<Instant> {
    deadlines.into_iter().flatten().min()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn idle_slot_never_fires() {
        let mut slot = TimerSlot::new();
        assert!(!slot.is_armed());
        assert!(!slot.fire_if_due(Instant::now()));
    }

    #[test]
    fn fires_once_at_deadline() {
        let t0 = Instant::now();
        let mut slot = TimerSlot::new();
        slot.arm(t0, 150 * MS);

        assert!(!slot.fire_if_due(t0 + 149 * MS));
        assert!(slot.fire_if_due(t0 + 150 * MS));
        assert!(!slot.fire_if_due(t0 + 500 * MS));
        assert!(!slot.is_armed());
    }

    #[test]
    fn rearm_replaces_deadline() {
        let t0 = Instant::now();
        let mut slot = TimerSlot::new();
        slot.arm(t0, 10 * MS);
        slot.arm(t0 + 5 * MS, 100 * MS);
        assert_eq!(slot.deadline(), Some(t0 + 105 * MS));
        assert!(!slot.fire_if_due(t0 + 50 * MS));
    }

    #[test]
    fn cancel_is_idempotent() {
        let t0 = Instant::now();
        let mut slot = TimerSlot::new();
        slot.arm(t0, MS);
        assert!(slot.cancel());
        assert!(!slot.cancel());
        assert!(!slot.fire_if_due(t0 + 10 * MS));
    }

    #[test]
    fn zero_delay_is_due_immediately() {
        let t0 = Instant::now();
        let mut slot = TimerSlot::new();
        slot.arm(t0, Duration::ZERO);
        assert!(slot.is_due(t0));
    }

    #[test]
    fn earliest_skips_idle() {
        let t0 = Instant::now();
        assert_eq!(earliest([None, Some(t0 + 5 * MS), Some(t0 + 2 * MS)]), Some(t0 + 2 * MS));
        assert_eq!(earliest([None, None]), None);
    }
}
