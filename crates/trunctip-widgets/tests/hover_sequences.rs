#![forbid(unsafe_code)]

//! Hover sequencing against a reference model.
//!
//! Random enter/leave/scroll/advance sequences are applied both to a
//! `HoverController` and to a millisecond-resolution model of the debounce
//! rules; the two must agree after every step.

use std::time::{Duration, Instant};

use proptest::prelude::*;
use trunctip_widgets::{HoverController, ListenState, ScrollBus, TipConfig};

#[derive(Debug, Clone, Copy)]
enum Op {
    Enter,
    Leave,
    Scroll,
    Advance(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Enter),
        3 => Just(Op::Leave),
        1 => Just(Op::Scroll),
        4 => (0u64..400).prop_map(Op::Advance),
    ]
}

/// The debounce rules, in plain integers.
#[derive(Debug, Default)]
struct Model {
    now: u64,
    hovered: bool,
    show_at: Option<u64>,
    hide_at: Option<u64>,
}

impl Model {
    fn enter(&mut self, show_delay: u64) {
        self.hide_at = None;
        if show_delay == 0 {
            self.hovered = true;
        } else {
            self.show_at = Some(self.now + show_delay);
        }
    }

    fn leave(&mut self, hide_delay: u64) {
        self.show_at = None;
        if !self.hovered {
            return;
        }
        if hide_delay == 0 {
            self.hovered = false;
        } else {
            self.hide_at = Some(self.now + hide_delay);
        }
    }

    fn scroll(&mut self) {
        if self.hovered {
            self.hovered = false;
            self.hide_at = None;
        }
    }

    fn advance(&mut self, ms: u64) {
        self.now += ms;
        if self.show_at.is_some_and(|at| at <= self.now) {
            self.show_at = None;
            self.hovered = true;
        }
        if self.hide_at.is_some_and(|at| at <= self.now) {
            self.hide_at = None;
            self.hovered = false;
        }
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

proptest! {
    #[test]
    fn controller_matches_model(
        show_delay in prop_oneof![Just(0u64), 1u64..300],
        hide_delay in prop_oneof![Just(0u64), 1u64..300],
        ops in prop::collection::vec(op_strategy(), 0..60),
    ) {
        let t0 = Instant::now();
        let bus = ScrollBus::new();
        let config = TipConfig::default().show_delay_ms(show_delay).hide_delay_ms(hide_delay);
        let mut hover = HoverController::new(config, bus.clone());
        let mut model = Model::default();

        for op in ops {
            let now = t0 + ms(model.now);
            match op {
                Op::Enter => {
                    hover.on_mouse_enter(now);
                    model.enter(show_delay);
                }
                Op::Leave => {
                    hover.on_mouse_leave(now);
                    model.leave(hide_delay);
                }
                Op::Scroll => {
                    bus.dispatch(now);
                    hover.drain_scroll();
                    model.scroll();
                }
                Op::Advance(step) => {
                    model.advance(step);
                    hover.tick(t0 + ms(model.now));
                }
            }

            prop_assert_eq!(hover.is_hovered(), model.hovered, "after {:?}", op);
            prop_assert!(!(hover.show_pending() && hover.hide_pending()));
            prop_assert_eq!(hover.show_pending(), model.show_at.is_some());
            prop_assert_eq!(hover.hide_pending(), model.hide_at.is_some());
            prop_assert_eq!(bus.listener_count(), usize::from(model.hovered));
            prop_assert_eq!(
                hover.listen_state(),
                if model.hovered { ListenState::Hovering } else { ListenState::Idle }
            );
        }

        hover.unmount();
        prop_assert!(!hover.has_pending_timers());
        prop_assert!(!hover.is_hovered());
        prop_assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn last_pointer_call_wins_after_settling(
        show_delay in 0u64..300,
        hide_delay in 0u64..300,
        calls in prop::collection::vec((any::<bool>(), 0u64..400), 1..40),
    ) {
        let t0 = Instant::now();
        let config = TipConfig::default().show_delay_ms(show_delay).hide_delay_ms(hide_delay);
        let mut hover = HoverController::new(config, ScrollBus::new());
        let mut now = t0;

        for &(enter, gap) in &calls {
            if enter {
                hover.on_mouse_enter(now);
            } else {
                hover.on_mouse_leave(now);
            }
            now += ms(gap);
            hover.tick(now);
        }
        hover.tick(now + ms(1_000));

        let last_was_enter = calls.last().is_some_and(|&(enter, _)| enter);
        prop_assert_eq!(hover.is_hovered(), last_was_enter);
        prop_assert_eq!(hover.next_deadline(), None);
    }

    #[test]
    fn unmount_at_any_point_releases_everything(
        ops in prop::collection::vec(op_strategy(), 0..30),
    ) {
        let t0 = Instant::now();
        let bus = ScrollBus::new();
        let mut hover = HoverController::new(TipConfig::default(), bus.clone());
        let mut elapsed = 0u64;
        for op in ops {
            let now = t0 + ms(elapsed);
            match op {
                Op::Enter => hover.on_mouse_enter(now),
                Op::Leave => hover.on_mouse_leave(now),
                Op::Scroll => bus.dispatch(now),
                Op::Advance(step) => {
                    elapsed += step;
                    hover.tick(t0 + ms(elapsed));
                }
            }
        }
        hover.unmount();
        prop_assert!(!hover.has_pending_timers());
        prop_assert_eq!(bus.listener_count(), 0);

        // Nothing fires afterwards.
        prop_assert!(!hover.tick(t0 + ms(elapsed + 10_000)));
        prop_assert!(!hover.is_hovered());
    }
}

#[test]
fn zero_delays_are_immediate() {
    let t0 = Instant::now();
    let mut hover = HoverController::new(TipConfig::immediate(), ScrollBus::new());
    hover.on_mouse_enter(t0);
    assert!(hover.is_hovered());
    hover.on_mouse_leave(t0);
    assert!(!hover.is_hovered());
    assert!(!hover.has_pending_timers());
}

#[test]
fn leave_before_show_delay_never_hovers() {
    let t0 = Instant::now();
    let mut hover = HoverController::new(TipConfig::default(), ScrollBus::new());
    hover.on_mouse_enter(t0);
    for step in 0..10 {
        hover.tick(t0 + ms(step * 10));
        assert!(!hover.is_hovered());
    }
    hover.on_mouse_leave(t0 + ms(100));
    for step in 10..50 {
        hover.tick(t0 + ms(step * 10));
        assert!(!hover.is_hovered());
    }
}

#[test]
fn leave_while_idle_changes_nothing() {
    let t0 = Instant::now();
    let bus = ScrollBus::new();
    let mut hover = HoverController::new(TipConfig::default(), bus.clone());
    hover.on_mouse_leave(t0);
    assert!(!hover.is_hovered());
    assert_eq!(hover.next_deadline(), None);
    assert_eq!(bus.listener_count(), 0);
}

#[test]
fn scroll_from_any_source_dismisses() {
    let t0 = Instant::now();
    let bus = ScrollBus::new();
    let mut first = HoverController::new(TipConfig::immediate(), bus.clone());
    let mut second = HoverController::new(TipConfig::immediate(), bus.clone());
    first.on_mouse_enter(t0);
    second.on_mouse_enter(t0);
    assert_eq!(bus.listener_count(), 2);

    bus.dispatch(t0);
    first.tick(t0 + ms(100));
    second.tick(t0 + ms(100));
    assert!(!first.is_hovered());
    assert!(!second.is_hovered());
    assert_eq!(bus.listener_count(), 0);
}

#[test]
fn scroll_after_hide_timer_armed_cancels_it() {
    let t0 = Instant::now();
    let mut hover = HoverController::new(TipConfig::default().show_delay_ms(0), ScrollBus::new());
    hover.on_mouse_enter(t0);
    hover.on_mouse_leave(t0 + ms(60));
    assert!(hover.hide_pending());
    hover.on_scroll();
    assert!(!hover.is_hovered());
    assert!(!hover.hide_pending());
}
