#![forbid(unsafe_code)]

//! Shared scroll notification bus.
//!
//! Anything in the application that scrolls (the terminal wheel, a list
//! moving its viewport, a pager) announces it with [`ScrollBus::dispatch`].
//! Every live [`ScrollListener`] observes every dispatch, wherever it came
//! from, the same way a capturing window listener sees scrolls on any
//! scrollable ancestor.
//!
//! Delivery is pull-based: a dispatch bumps each listener's pending count
//! and the owner drains it with [`ScrollListener::take_pending`] on its next
//! tick or render. The bus also remembers when the last dispatch happened,
//! so an owner that registers late (a show timer fired by a tick that ran
//! after its deadline) can tell whether it missed a scroll.
//!
//! # Invariants
//!
//! 1. Dropping a `ScrollListener` removes its registration.
//! 2. `listener_count()` equals the number of live listeners.
//! 3. A listener only sees dispatches made while it was registered.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Instant;

use trunctip_core::event::Event;

#[derive(Debug, Default)]
struct BusInner {
    next_id: u64,
    listeners: Vec<Registration>,
    dispatched: u64,
    last_dispatch: Option<Instant>,
}

#[derive(Debug)]
struct Registration {
    id: u64,
    pending: u32,
}

/// Handle to the shared scroll bus. Cloning shares the same bus.
#[derive(Debug, Clone, Default)]
pub struct ScrollBus {
    inner: Rc<RefCell<BusInner>>,
}

impl ScrollBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until dropped.
    #[must_use]
    pub fn listen(&self) -> ScrollListener {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push(Registration { id, pending: 0 });
        ScrollListener {
            id,
            bus: Rc::downgrade(&self.inner),
        }
    }

    /// Announce that something scrolled at `now`.
    pub fn dispatch(&self, now: Instant) {
        let mut inner = self.inner.borrow_mut();
        inner.dispatched += 1;
        inner.last_dispatch = Some(inner.last_dispatch.map_or(now, |last| last.max(now)));
        for reg in &mut inner.listeners {
            reg.pending = reg.pending.saturating_add(1);
        }
    }

    /// Dispatch if `event` is a wheel event. Returns whether it was one.
    pub fn dispatch_event(&self, event: &Event, now: Instant) -> bool {
        let is_scroll = event.as_mouse().is_some_and(|m| m.kind.is_scroll());
        if is_scroll {
            self.dispatch(now);
        }
        is_scroll
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Total dispatches since the bus was created.
    pub fn dispatched(&self) -> u64 {
        self.inner.borrow().dispatched
    }

    /// Time of the latest dispatch, if any.
    pub fn last_dispatch(&self) -> Option<Instant> {
        self.inner.borrow().last_dispatch
    }
}

/// A live registration on a [`ScrollBus`].
#[derive(Debug)]
pub struct ScrollListener {
    id: u64,
    bus: Weak<RefCell<BusInner>>,
}

impl ScrollListener {
    /// Drain and return the number of scrolls seen since the last drain.
    pub fn take_pending(&self) -> u32 {
        let Some(bus) = self.bus.upgrade() else {
            return 0;
        };
        let mut inner = bus.borrow_mut();
        inner
            .listeners
            .iter_mut()
            .find(|reg| reg.id == self.id)
            .map_or(0, |reg| std::mem::take(&mut reg.pending))
    }
}

impl Drop for ScrollListener {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            // try_borrow_mut: a listener dropped while the bus is borrowed
            // (re-entrant drop) must not panic.
            if let Ok(mut inner) = bus.try_borrow_mut() {
                inner.listeners.retain(|reg| reg.id != self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use trunctip_core::event::{MouseEvent, MouseEventKind};

    #[test]
    fn dispatch_reaches_every_listener() {
        let bus = ScrollBus::new();
        let t0 = Instant::now();
        let a = bus.listen();
        let b = bus.listen();
        bus.dispatch(t0);
        bus.dispatch(t0);
        assert_eq!(a.take_pending(), 2);
        assert_eq!(a.take_pending(), 0);
        assert_eq!(b.take_pending(), 2);
        assert_eq!(bus.dispatched(), 2);
    }

    #[test]
    fn drop_deregisters() {
        let bus = ScrollBus::new();
        let listener = bus.listen();
        assert_eq!(bus.listener_count(), 1);
        drop(listener);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn late_listener_misses_earlier_dispatches() {
        let bus = ScrollBus::new();
        bus.dispatch(Instant::now());
        let listener = bus.listen();
        assert_eq!(listener.take_pending(), 0);
    }

    #[test]
    fn only_wheel_events_dispatch() {
        let bus = ScrollBus::new();
        let listener = bus.listen();
        let wheel = Event::Mouse(MouseEvent::new(MouseEventKind::ScrollDown, 0, 0));
        let moved = Event::Mouse(MouseEvent::new(MouseEventKind::Moved, 0, 0));
        let t0 = Instant::now();
        assert!(bus.dispatch_event(&wheel, t0));
        assert!(!bus.dispatch_event(&moved, t0));
        assert!(!bus.dispatch_event(&Event::Tick, t0));
        assert_eq!(listener.take_pending(), 1);
    }

    #[test]
    fn listener_outliving_bus_is_inert() {
        let bus = ScrollBus::new();
        let listener = bus.listen();
        drop(bus);
        assert_eq!(listener.take_pending(), 0);
    }

    #[test]
    fn last_dispatch_tracks_latest_time() {
        let bus = ScrollBus::new();
        let t0 = Instant::now();
        assert_eq!(bus.last_dispatch(), None);
        bus.dispatch(t0 + Duration::from_millis(30));
        bus.dispatch(t0 + Duration::from_millis(10));
        assert_eq!(bus.last_dispatch(), Some(t0 + Duration::from_millis(30)));
        assert_eq!(bus.dispatched(), 2);
    }
}
