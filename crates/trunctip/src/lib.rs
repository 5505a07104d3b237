#![forbid(unsafe_code)]

//! Public facade.
//!
//! Re-exports the pieces an application needs to put a [`TruncatedText`] on
//! screen: geometry and events, the frame it renders into, styles, and the
//! widget with its hover state. Day-to-day code can `use trunctip::prelude::*`.
//!
//! ```
//! use std::time::Instant;
//! use trunctip::prelude::*;
//!
//! let bus = ScrollBus::new();
//! let mut state = TruncatedTextState::new(TipConfig::immediate(), bus.clone());
//! let widget = TruncatedText::new("a label that does not fit");
//! let area = Rect::new(2, 5, 8, 1);
//!
//! let mut frame = Frame::new(40, 10);
//! widget.render(area, &mut frame, &mut state);
//!
//! let now = Instant::now();
//! let hover = Event::Mouse(MouseEvent::new(MouseEventKind::Moved, 3, 5));
//! bus.dispatch_event(&hover, now);
//! state.handle_event(&hover, now);
//!
//! let mut frame = Frame::new(40, 10);
//! widget.render(area, &mut frame, &mut state);
//! frame.flush_portals();
//! assert!(state.show_tooltip());
//! ```

// --- Core re-exports -------------------------------------------------------

pub use trunctip_core::event::{Event, MouseButton, MouseEvent, MouseEventKind};
pub use trunctip_core::geometry::{Rect, Size};
pub use trunctip_core::timer::{TimerSlot, earliest};

// --- Render re-exports -----------------------------------------------------

pub use trunctip_render::buffer::Buffer;
pub use trunctip_render::cell::{Cell, PackedRgba};
pub use trunctip_render::frame::{Frame, HitId, HitRegion, Marker};
pub use trunctip_render::portal::{PortalContainer, PortalLayer};
pub use trunctip_render::display_width;

// --- Style re-exports ------------------------------------------------------

pub use trunctip_style::{Style, StyleFlags, StyleSheet};

// --- Widget re-exports -----------------------------------------------------

pub use trunctip_widgets::{
    HoverController, ListenState, ParsePlacementError, Placed, Placement, PlacementRequest,
    Positioner, Propagation, ScrollBus, ScrollListener, StatefulWidget, TipConfig, TruncatedText,
    TruncatedTextState, ViewportPositioner,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Event, Frame, MouseButton, MouseEvent, MouseEventKind, Placement, PortalContainer,
        Propagation, Rect, ScrollBus, StatefulWidget, Style, StyleSheet, TipConfig, TruncatedText,
        TruncatedTextState,
    };
}
