#![forbid(unsafe_code)]

//! Debounced hover state with scroll dismissal.
//!
//! [`HoverController`] turns pointer enter/leave notifications into a single
//! `hovered` flag, delayed by a show and a hide debounce, and forced off
//! whenever anything scrolls while the flag is on.
//!
//! # State machine
//!
//! ```text
//!            enter (+show_delay)                 leave (+hide_delay)
//!   Idle ───────────────────────▶ Hovering ─────────────────────────▶ Idle
//!     ▲                             │  │
//!     │           scroll            │  │ relisten (+50ms): listener
//!     └─────────────────────────────┘  └─ re-registered, scroll trusted
//! ```
//!
//! Entering `Hovering` registers a scroll listener at once and arms the
//! relisten checkpoint. Layout that settles right after the tooltip appears
//! can emit a scroll; such early scrolls still dismiss, and are reported at
//! trace level as untrusted so they can be told apart from user scrolling.
//!
//! # Invariants
//!
//! 1. The show and hide timers are never armed at the same time.
//! 2. The most recent enter/leave wins: arming one cancels the other.
//! 3. A listener is registered iff `hovered` is true.
//! 4. After [`unmount`](HoverController::unmount) no timer is armed and no
//!    listener is registered.
//!
//! Time is passed in explicitly, so a controller is fully deterministic:
//! nothing changes between calls.

use std::time::{Duration, Instant};

use trunctip_core::timer::{TimerSlot, earliest};

use crate::scroll::{ScrollBus, ScrollListener};

/// Default show and hide debounce.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(150);

/// Delay after showing at which the scroll listener is re-registered and
/// scroll dismissal is treated as user-initiated.
pub const SCROLL_RELISTEN_GRACE: Duration = Duration::from_millis(50);

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Hover debounce configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "TipConfigRepr", into = "TipConfigRepr")
)]
pub struct TipConfig {
    /// Delay between the pointer entering and the tooltip showing.
    /// Zero shows immediately. Default: 150ms.
    pub show_delay: Duration,

    /// Delay between the pointer leaving and the tooltip hiding.
    /// Zero hides immediately. Default: 150ms.
    pub hide_delay: Duration,
}

impl Default for TipConfig {
    fn default() -> Self {
        Self {
            show_delay: DEFAULT_DELAY,
            hide_delay: DEFAULT_DELAY,
        }
    }
}

impl TipConfig {
    /// No debounce in either direction.
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            show_delay: Duration::ZERO,
            hide_delay: Duration::ZERO,
        }
    }

    /// Set the show delay.
    #[must_use]
    pub fn show_delay(mut self, delay: Duration) -> Self {
        self.show_delay = delay;
        self
    }

    /// Set the hide delay.
    #[must_use]
    pub fn hide_delay(mut self, delay: Duration) -> Self {
        self.hide_delay = delay;
        self
    }

    /// Set the show delay in milliseconds.
    #[must_use]
    pub fn show_delay_ms(self, ms: u64) -> Self {
        self.show_delay(Duration::from_millis(ms))
    }

    /// Set the hide delay in milliseconds.
    #[must_use]
    pub fn hide_delay_ms(self, ms: u64) -> Self {
        self.hide_delay(Duration::from_millis(ms))
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct TipConfigRepr {
    show_delay_ms: u64,
    hide_delay_ms: u64,
}

#[cfg(feature = "serde")]
impl Default for TipConfigRepr {
    fn default() -> Self {
        TipConfig::default().into()
    }
}

#[cfg(feature = "serde")]
impl From<TipConfigRepr> for TipConfig {
    fn from(repr: TipConfigRepr) -> Self {
        TipConfig::default()
            .show_delay_ms(repr.show_delay_ms)
            .hide_delay_ms(repr.hide_delay_ms)
    }
}

#[cfg(feature = "serde")]
impl From<TipConfig> for TipConfigRepr {
    fn from(config: TipConfig) -> Self {
        Self {
            show_delay_ms: config.show_delay.as_millis().min(u64::MAX as u128) as u64,
            hide_delay_ms: config.hide_delay.as_millis().min(u64::MAX as u128) as u64,
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Scroll-listener attachment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenState {
    /// Not hovered, no listener.
    Idle,
    /// Hovered, listener registered.
    Hovering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Show,
    Hide,
    Relisten,
}

/// Debounced hover state machine.
#[derive(Debug)]
pub struct HoverController {
    config: TipConfig,
    hovered: bool,
    show: TimerSlot,
    hide: TimerSlot,
    relisten: TimerSlot,
    bus: ScrollBus,
    listener: Option<ScrollListener>,
    scroll_trusted: bool,
}

impl HoverController {
    /// Create an idle controller listening on `bus` while hovered.
    #[must_use]
    pub fn new(config: TipConfig, bus: ScrollBus) -> Self {
        Self {
            config,
            hovered: false,
            show: TimerSlot::new(),
            hide: TimerSlot::new(),
            relisten: TimerSlot::new(),
            bus,
            listener: None,
            scroll_trusted: false,
        }
    }

    /// Current configuration.
    #[inline]
    pub fn config(&self) -> TipConfig {
        self.config
    }

    /// The bus this controller listens on.
    pub fn bus(&self) -> &ScrollBus {
        &self.bus
    }

    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    #[inline]
    pub fn listen_state(&self) -> ListenState {
        if self.hovered {
            ListenState::Hovering
        } else {
            ListenState::Idle
        }
    }

    /// Whether the relisten checkpoint has passed for the current hover.
    #[inline]
    pub fn scroll_trusted(&self) -> bool {
        self.scroll_trusted
    }

    #[inline]
    pub fn show_pending(&self) -> bool {
        self.show.is_armed()
    }

    #[inline]
    pub fn hide_pending(&self) -> bool {
        self.hide.is_armed()
    }

    #[inline]
    pub fn relisten_pending(&self) -> bool {
        self.relisten.is_armed()
    }

    /// Whether a scroll listener is currently registered.
    #[inline]
    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// Whether any timer is armed.
    pub fn has_pending_timers(&self) -> bool {
        self.show.is_armed() || self.hide.is_armed() || self.relisten.is_armed()
    }

    /// Earliest armed deadline, if any. The runtime should tick no later.
    ///
    /// Ticking late is tolerated: a scroll dispatched after a show deadline
    /// but before the tick that fires it still dismisses the tooltip.
    pub fn next_deadline(&self) -> Option<Instant> {
        earliest([
            self.show.deadline(),
            self.hide.deadline(),
            self.relisten.deadline(),
        ])
    }

    /// The pointer entered the anchor.
    pub fn on_mouse_enter(&mut self, now: Instant) {
        self.hide.cancel();
        if self.config.show_delay.is_zero() {
            self.set_hovered(true, now);
        } else {
            self.show.arm(now, self.config.show_delay);
            trunctip_core::trace!(delay_ms = self.config.show_delay.as_millis() as u64, "show armed");
        }
    }

    /// The pointer left the anchor.
    ///
    /// A no-op beyond cancelling a pending show when not hovered.
    pub fn on_mouse_leave(&mut self, now: Instant) {
        self.show.cancel();
        if !self.hovered {
            return;
        }
        if self.config.hide_delay.is_zero() {
            self.set_hovered(false, now);
        } else {
            self.hide.arm(now, self.config.hide_delay);
            trunctip_core::trace!(delay_ms = self.config.hide_delay.as_millis() as u64, "hide armed");
        }
    }

    /// Something scrolled: dismiss immediately.
    ///
    /// A pending hide is redundant afterwards and is cancelled. A pending
    /// show is left alone.
    pub fn on_scroll(&mut self) {
        self.hide.cancel();
        if self.hovered {
            if !self.scroll_trusted {
                trunctip_core::trace!("scroll before relisten checkpoint");
            }
            self.leave_hovering();
            trunctip_core::debug!(reason = "scroll", "tooltip dismissed");
        }
    }

    /// Consume pending scroll notifications. Returns whether any arrived.
    pub fn drain_scroll(&mut self) -> bool {
        let pending = self.listener.as_ref().map_or(0, ScrollListener::take_pending);
        if pending > 0 {
            self.on_scroll();
        }
        pending > 0
    }

    /// Drain scrolls, then fire every due timer in deadline order.
    ///
    /// Returns whether `hovered` differs from before the call.
    pub fn tick(&mut self, now: Instant) -> bool {
        let before = self.hovered;
        self.drain_scroll();

        while let Some((at, kind)) = self.next_due(now) {
            match kind {
                TimerKind::Show => {
                    if self.show.fire_if_due(now) {
                        self.set_hovered(true, at);
                        self.dismiss_if_scrolled_after(at);
                    }
                }
                TimerKind::Hide => {
                    if self.hide.fire_if_due(now) {
                        self.set_hovered(false, at);
                    }
                }
                TimerKind::Relisten => {
                    if self.relisten.fire_if_due(now) {
                        self.relisten_checkpoint();
                    }
                }
            }
        }

        self.hovered != before
    }

    /// Cancel everything and release the listener. Idempotent.
    pub fn unmount(&mut self) {
        let live = self.hovered || self.has_pending_timers() || self.listener.is_some();
        self.show.cancel();
        self.hide.cancel();
        self.relisten.cancel();
        self.listener = None;
        self.hovered = false;
        self.scroll_trusted = false;
        if live {
            trunctip_core::debug!("hover controller unmounted");
        }
    }

    fn next_due(&self, now: Instant) -> Option<(Instant, TimerKind)> {
        [
            (self.show, TimerKind::Show),
            (self.hide, TimerKind::Hide),
            (self.relisten, TimerKind::Relisten),
        ]
        .into_iter()
        .filter(|(slot, _)| slot.is_due(now))
        .filter_map(|(slot, kind)| slot.deadline().map(|at| (at, kind)))
        .min_by_key(|(at, _)| *at)
    }

    /// A show fired late registers its listener after the fact; a scroll
    /// the bus saw after the deadline would have reached it.
    fn dismiss_if_scrolled_after(&mut self, at: Instant) {
        if self.bus.last_dispatch().is_some_and(|scrolled| scrolled > at) {
            trunctip_core::trace!("scroll missed by late show");
            self.on_scroll();
        }
    }

    fn set_hovered(&mut self, hovered: bool, now: Instant) {
        if self.hovered == hovered {
            return;
        }
        if hovered {
            self.hovered = true;
            self.listener = Some(self.bus.listen());
            self.relisten.arm(now, SCROLL_RELISTEN_GRACE);
            self.scroll_trusted = false;
            trunctip_core::debug!("tooltip shown");
        } else {
            self.leave_hovering();
            trunctip_core::debug!(reason = "leave", "tooltip hidden");
        }
    }

    fn leave_hovering(&mut self) {
        self.hovered = false;
        self.relisten.cancel();
        self.listener = None;
        self.scroll_trusted = false;
    }

    fn relisten_checkpoint(&mut self) {
        if !self.hovered {
            return;
        }
        if self.listener.is_none() {
            self.listener = Some(self.bus.listen());
        }
        self.scroll_trusted = true;
        trunctip_core::trace!("scroll dismissal trusted");
    }
}

impl Drop for HoverController {
    fn drop(&mut self) {
        self.unmount();
    }
}
