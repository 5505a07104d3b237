#![forbid(unsafe_code)]

//! Truncation-aware text with a hover tooltip.
//!
//! The pieces, bottom up:
//!
//! - [`placement`]: the six tooltip placements and their parsing.
//! - [`scroll`]: a shared scroll notification bus with RAII listeners.
//! - [`hover`]: the debounced hover state machine.
//! - [`measure`]: content-vs-area truncation measurement.
//! - [`position`]: tooltip positioning inside the viewport.
//! - [`truncated_text`]: the widget and its state, tying it all together.

pub mod hover;
pub mod measure;
pub mod placement;
pub mod position;
pub mod scroll;
pub mod truncated_text;

pub use hover::{HoverController, ListenState, TipConfig};
pub use placement::{Placement, ParsePlacementError};
pub use position::{Placed, PlacementRequest, Positioner, ViewportPositioner};
pub use scroll::{ScrollBus, ScrollListener};
pub use truncated_text::{Propagation, TruncatedText, TruncatedTextState};

use trunctip_core::geometry::Rect;
use trunctip_render::buffer::Buffer;
use trunctip_render::cell::Cell;
use trunctip_render::frame::Frame;
use trunctip_render::grapheme_width;
use trunctip_style::Style;
use unicode_segmentation::UnicodeSegmentation;

/// A `StatefulWidget` is a widget that renders based on mutable state.
pub trait StatefulWidget {
    type State;

    /// Render the widget into the frame with mutable state.
    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State);
}

/// Helper to apply style to a cell.
pub(crate) fn apply_style(cell: &mut Cell, style: Style) {
    style.apply_to(cell);
}

/// Apply a style to all cells in a rectangular area.
///
/// This modifies existing cells, preserving their content.
pub(crate) fn set_style_area(buf: &mut Buffer, area: Rect, style: Style) {
    if style.is_empty() {
        return;
    }
    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if let Some(cell) = buf.get_mut(x, y) {
                apply_style(cell, style);
            }
        }
    }
}

/// Draw a text span into a buffer at the given position.
///
/// Returns the x position after the last drawn character.
/// Stops at `max_x` (exclusive); a grapheme that would straddle `max_x`
/// is not drawn.
pub(crate) fn draw_text_span(
    buf: &mut Buffer,
    mut x: u16,
    y: u16,
    content: &str,
    style: Style,
    max_x: u16,
) -> u16 {
    for grapheme in content.graphemes(true) {
        if x >= max_x {
            break;
        }
        let w = grapheme_width(grapheme);
        if w == 0 {
            continue;
        }
        if x as usize + w > max_x as usize {
            break;
        }
        if let Some(c) = grapheme.chars().next() {
            let mut cell = Cell::from_char(c);
            apply_style(&mut cell, style);
            buf.set(x, y, cell);
        }
        x = x.saturating_add(w as u16);
    }
    x
}
