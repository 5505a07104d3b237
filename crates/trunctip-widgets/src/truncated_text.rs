#![forbid(unsafe_code)]

//! Text that shows a tooltip when it does not fit.
//!
//! [`TruncatedText`] draws its content into the given area, clipped, with an
//! ellipsis in the last cell when the content is wider than the area. While
//! the pointer rests on a truncated anchor, a tooltip with the full text is
//! rendered into a portal layer above or below it.
//!
//! All timing lives in [`TruncatedTextState`]: feed it events with
//! [`handle_event`](TruncatedTextState::handle_event), call
//! [`tick`](TruncatedTextState::tick) when
//! [`next_deadline`](TruncatedTextState::next_deadline) passes, and render.
//!
//! # Markers
//!
//! | attribute | element | value |
//! |---|---|---|
//! | `tip-anchor` | configured tag (default `block`) | `"true"` while the tooltip is shown, else `"false"` |
//! | `tip-tooltip` | `tooltip` | resolved placement, e.g. `"bottom-start"` |
//! | `tip-arrow` | `arrow` | resolved placement |
//!
//! # Example
//!
//! ```
//! use trunctip_core::geometry::Rect;
//! use trunctip_render::frame::Frame;
//! use trunctip_widgets::{ScrollBus, StatefulWidget, TipConfig, TruncatedText, TruncatedTextState};
//!
//! let bus = ScrollBus::new();
//! let mut state = TruncatedTextState::new(TipConfig::default(), bus.clone());
//! let mut frame = Frame::new(40, 10);
//!
//! TruncatedText::new("a rather long file name.txt")
//!     .render(Rect::new(5, 5, 10, 1), &mut frame, &mut state);
//! frame.flush_portals();
//!
//! assert_eq!(frame.marker("tip-anchor").map(|m| m.value.as_str()), Some("false"));
//! ```

use std::borrow::Cow;
use std::fmt;
use std::time::Instant;

use trunctip_core::event::Event;
use trunctip_core::geometry::{Rect, Size};
use trunctip_render::cell::Cell;
use trunctip_render::frame::{Frame, HitId, HitRegion};
use trunctip_render::portal::{PortalContainer, PortalLayer};
use trunctip_render::{display_width, grapheme_width};
use trunctip_style::stylesheet::{
    DEFAULT_TOOLTIP_ARROW_STYLE, DEFAULT_TOOLTIP_STYLE, TOOLTIP_ARROW_CLASS, TOOLTIP_CLASS,
};
use trunctip_style::{Style, StyleSheet};
use unicode_segmentation::UnicodeSegmentation;

use crate::hover::{HoverController, TipConfig};
use crate::measure::{TargetMeasurement, is_truncated, should_show};
use crate::placement::{Placement, Side};
use crate::position::{Placed, PlacementRequest, Positioner, ViewportPositioner};
use crate::scroll::ScrollBus;
use crate::{StatefulWidget, draw_text_span, set_style_area};

/// Marker on the anchor: whether the tooltip is shown.
pub const ANCHOR_ATTR: &str = "tip-anchor";
/// Marker on the tooltip body: resolved placement.
pub const TOOLTIP_ATTR: &str = "tip-tooltip";
/// Marker on the arrow: resolved placement.
pub const ARROW_ATTR: &str = "tip-arrow";

/// Element name recorded on the anchor marker by default.
pub const DEFAULT_TAG: &str = "block";

const ELLIPSIS: char = '…';
const ARROW_DOWN: char = '▼';
const ARROW_UP: char = '▲';

static DEFAULT_POSITIONER: ViewportPositioner = ViewportPositioner;

/// Whether an event should keep travelling to other handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Not consumed.
    Continue,
    /// Consumed by the tooltip; do not deliver further.
    Stop,
}

impl Propagation {
    #[inline]
    pub fn is_stop(self) -> bool {
        self == Self::Stop
    }
}

/// Callback receiving the anchor area whenever it changes, and `None` when
/// the widget unmounts.
pub type InnerRef = Box<dyn FnMut(Option<Rect>)>;

/// Callback run when the pointer crosses into or out of the widget.
pub type PointerHook = Box<dyn FnMut(Instant)>;

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// A line of text with a tooltip for when it is cut off.
#[derive(Clone)]
pub struct TruncatedText<'a> {
    content: Cow<'a, str>,
    tooltip: Option<Cow<'a, str>>,
    tag: Cow<'static, str>,
    placement: Placement,
    style: Style,
    tooltip_class: Option<Cow<'a, str>>,
    tooltip_style: Style,
    arrow_class: Option<Cow<'a, str>>,
    arrow_style: Style,
    tooltip_max_width: Option<u16>,
    hide_arrow: bool,
    container: PortalContainer,
    ellipsis: bool,
    stylesheet: Option<&'a StyleSheet>,
    positioner: &'a dyn Positioner,
}

impl<'a> TruncatedText<'a> {
    /// Create a widget showing `content`.
    #[must_use]
    pub fn new(content: impl Into<Cow<'a, str>>) -> Self {
        Self {
            content: content.into(),
            tooltip: None,
            tag: Cow::Borrowed(DEFAULT_TAG),
            placement: Placement::default(),
            style: Style::new(),
            tooltip_class: None,
            tooltip_style: Style::new(),
            arrow_class: None,
            arrow_style: Style::new(),
            tooltip_max_width: None,
            hide_arrow: false,
            container: PortalContainer::Root,
            ellipsis: true,
            stylesheet: None,
            positioner: &DEFAULT_POSITIONER,
        }
    }

    /// Tooltip text. Defaults to the content; an empty string also falls
    /// back to the content.
    #[must_use]
    pub fn tooltip(mut self, tooltip: impl Into<Cow<'a, str>>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Element name recorded on the anchor marker.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<Cow<'static, str>>) -> Self {
        self.tag = tag.into();
        self
    }

    #[must_use]
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Set the placement from its string form. Unknown names fall back to
    /// `top` with a warning.
    #[must_use]
    pub fn placement_str(self, placement: &str) -> Self {
        self.placement(Placement::parse_or_default(placement))
    }

    /// Style of the anchor text.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Named style for the tooltip body, looked up in the style sheet.
    #[must_use]
    pub fn tooltip_class(mut self, class: impl Into<Cow<'a, str>>) -> Self {
        self.tooltip_class = Some(class.into());
        self
    }

    /// Inline style patched over the tooltip class.
    #[must_use]
    pub fn tooltip_style(mut self, style: Style) -> Self {
        self.tooltip_style = style;
        self
    }

    /// Named style for the arrow, looked up in the style sheet.
    #[must_use]
    pub fn arrow_class(mut self, class: impl Into<Cow<'a, str>>) -> Self {
        self.arrow_class = Some(class.into());
        self
    }

    /// Inline style patched over the arrow class.
    #[must_use]
    pub fn arrow_style(mut self, style: Style) -> Self {
        self.arrow_style = style;
        self
    }

    /// Wrap the tooltip text at this many cells.
    #[must_use]
    pub fn tooltip_max_width(mut self, width: u16) -> Self {
        self.tooltip_max_width = Some(width);
        self
    }

    #[must_use]
    pub fn hide_arrow(mut self, hide: bool) -> Self {
        self.hide_arrow = hide;
        self
    }

    /// Where the tooltip layer is attached. Defaults to the whole frame.
    #[must_use]
    pub fn container(mut self, container: PortalContainer) -> Self {
        self.container = container;
        self
    }

    /// Draw `…` in the last visible cell when truncated. Default: on.
    #[must_use]
    pub fn ellipsis(mut self, ellipsis: bool) -> Self {
        self.ellipsis = ellipsis;
        self
    }

    /// Style sheet the class names are resolved against.
    #[must_use]
    pub fn stylesheet(mut self, sheet: &'a StyleSheet) -> Self {
        self.stylesheet = Some(sheet);
        self
    }

    /// Replace the tooltip positioner.
    #[must_use]
    pub fn positioner(mut self, positioner: &'a dyn Positioner) -> Self {
        self.positioner = positioner;
        self
    }

    fn tooltip_text(&self) -> &str {
        self.tooltip
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.content)
    }

    fn resolve_style(&self, class: Option<&str>, default_class: &str, fallback: Style, inline: Style) -> Style {
        let class = class.unwrap_or(default_class);
        match self.stylesheet {
            Some(sheet) => sheet.resolve(class, fallback, inline),
            None => fallback.patch(inline),
        }
    }

    fn draw_anchor(&self, area: Rect, frame: &mut Frame) {
        set_style_area(&mut frame.buffer, area, self.style);
        for (row, line) in self.content.lines().take(area.height as usize).enumerate() {
            let y = area.y + row as u16;
            let overflows = display_width(line) > area.width as usize;
            if overflows && self.ellipsis {
                let end = area.right() - 1;
                draw_text_span(&mut frame.buffer, area.x, y, line, self.style, end);
                let mut cell = Cell::from_char(ELLIPSIS);
                self.style.apply_to(&mut cell);
                frame.buffer.set(end, y, cell);
            } else {
                draw_text_span(&mut frame.buffer, area.x, y, line, self.style, area.right());
            }
        }
    }

    fn render_tooltip(&self, anchor: Rect, frame: &mut Frame, hit_id: HitId) -> Option<Placed> {
        let viewport = frame.bounds();
        let max_width = self
            .tooltip_max_width
            .unwrap_or(viewport.width)
            .clamp(1, viewport.width.max(1));
        let lines = wrap_lines(self.tooltip_text(), max_width as usize);
        let width = lines
            .iter()
            .map(|line| display_width(line))
            .max()
            .unwrap_or(0)
            .min(max_width as usize);
        let size = Size::new(width as u16, lines.len().min(u16::MAX as usize) as u16);

        let request = PlacementRequest::new(anchor, viewport, size, self.placement).arrow(!self.hide_arrow);
        let placed = self.positioner.place(&request)?;
        let mut layer = PortalLayer::new(placed.area(), self.container)?;
        let origin = layer.bounds();

        let body_style = self.resolve_style(
            self.tooltip_class.as_deref(),
            TOOLTIP_CLASS,
            DEFAULT_TOOLTIP_STYLE,
            self.tooltip_style,
        );
        let body = Rect::new(
            placed.bounds.x - origin.x,
            placed.bounds.y - origin.y,
            placed.bounds.width,
            placed.bounds.height,
        );
        let buf = layer.buffer_mut();
        buf.fill(body, Cell::from_char(' '));
        set_style_area(buf, body, body_style);
        for (row, line) in lines.iter().take(body.height as usize).enumerate() {
            draw_text_span(buf, body.x, body.y + row as u16, line, body_style, body.right());
        }

        if let Some(arrow) = placed.arrow {
            let arrow_style = self.resolve_style(
                self.arrow_class.as_deref(),
                TOOLTIP_ARROW_CLASS,
                DEFAULT_TOOLTIP_ARROW_STYLE,
                self.arrow_style,
            );
            let glyph = match placed.placement.side() {
                Side::Top => ARROW_DOWN,
                Side::Bottom => ARROW_UP,
            };
            let mut cell = Cell::from_char(glyph);
            arrow_style.apply_to(&mut cell);
            buf.set(arrow.x - origin.x, arrow.y - origin.y, cell);
        }

        let container = self.container.resolve(viewport);
        frame.register_hit(placed.bounds.intersection(&container), hit_id, HitRegion::Overlay);
        frame.mark("tooltip", TOOLTIP_ATTR, placed.placement.as_str(), placed.bounds);
        if let Some(arrow) = placed.arrow {
            frame.register_hit(arrow.intersection(&container), hit_id, HitRegion::Overlay);
            frame.mark("arrow", ARROW_ATTR, placed.placement.as_str(), arrow);
        }
        frame.mount_portal(layer);
        Some(placed)
    }
}

impl fmt::Debug for TruncatedText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TruncatedText")
            .field("content", &self.content)
            .field("tooltip", &self.tooltip)
            .field("tag", &self.tag)
            .field("placement", &self.placement)
            .field("tooltip_max_width", &self.tooltip_max_width)
            .field("hide_arrow", &self.hide_arrow)
            .field("container", &self.container)
            .field("ellipsis", &self.ellipsis)
            .finish_non_exhaustive()
    }
}

impl StatefulWidget for TruncatedText<'_> {
    type State = TruncatedTextState;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State) {
        let _span = trunctip_core::debug_span!(
            "widget_render",
            widget = "TruncatedText",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        state.hover.drain_scroll();

        let area = area.intersection(&frame.bounds());
        state.set_anchor((!area.is_empty()).then_some(area));
        state.interactive = !self.content.is_empty();

        let measurement = if state.interactive {
            TargetMeasurement::measure(&self.content, area)
        } else {
            None
        };

        if !area.is_empty() {
            self.draw_anchor(area, frame);
            frame.register_hit(area, state.hit_id, HitRegion::Content);
        }

        let placed = if should_show(state.hover.is_hovered(), measurement) {
            self.render_tooltip(area, frame, state.hit_id)
        } else {
            None
        };
        if state.hover.is_hovered() && !is_truncated(measurement) {
            trunctip_core::trace!("hovered but not truncated");
        }

        state.tooltip = placed;
        state.tooltip_clip = self.container.resolve(frame.bounds());
        frame.mark(
            self.tag.clone(),
            ANCHOR_ATTR,
            if placed.is_some() { "true" } else { "false" },
            area,
        );
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Per-instance state: hover timing, pointer tracking, last geometry.
pub struct TruncatedTextState {
    hover: HoverController,
    hit_id: HitId,
    anchor: Option<Rect>,
    tooltip: Option<Placed>,
    tooltip_clip: Rect,
    pointer_inside: bool,
    interactive: bool,
    inner_ref: Option<InnerRef>,
    on_enter: Option<PointerHook>,
    on_leave: Option<PointerHook>,
}

impl TruncatedTextState {
    /// Create state for one mounted widget.
    #[must_use]
    pub fn new(config: TipConfig, bus: ScrollBus) -> Self {
        Self {
            hover: HoverController::new(config, bus),
            hit_id: HitId::default(),
            anchor: None,
            tooltip: None,
            tooltip_clip: Rect::default(),
            pointer_inside: false,
            interactive: true,
            inner_ref: None,
            on_enter: None,
            on_leave: None,
        }
    }

    /// Hit id registered for the anchor and the tooltip.
    #[must_use]
    pub fn with_hit_id(mut self, id: HitId) -> Self {
        self.hit_id = id;
        self
    }

    #[inline]
    pub fn hit_id(&self) -> HitId {
        self.hit_id
    }

    /// Observe the anchor area. Called immediately with the current area
    /// if the widget has already rendered.
    pub fn set_inner_ref(&mut self, mut callback: impl FnMut(Option<Rect>) + 'static) {
        if let Some(anchor) = self.anchor {
            callback(Some(anchor));
        }
        self.inner_ref = Some(Box::new(callback));
    }

    /// Run `callback` each time the pointer enters the widget, before the
    /// show debounce starts.
    pub fn set_on_mouse_enter(&mut self, callback: impl FnMut(Instant) + 'static) {
        self.on_enter = Some(Box::new(callback));
    }

    /// Run `callback` each time the pointer leaves the widget, before the
    /// hide debounce starts.
    pub fn set_on_mouse_leave(&mut self, callback: impl FnMut(Instant) + 'static) {
        self.on_leave = Some(Box::new(callback));
    }

    pub fn hover(&self) -> &HoverController {
        &self.hover
    }

    pub fn hover_mut(&mut self) -> &mut HoverController {
        &mut self.hover
    }

    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.hover.is_hovered()
    }

    /// Whether the last render showed the tooltip.
    #[inline]
    pub fn show_tooltip(&self) -> bool {
        self.tooltip.is_some()
    }

    /// Anchor area of the last render.
    #[inline]
    pub fn anchor_area(&self) -> Option<Rect> {
        self.anchor
    }

    /// Tooltip geometry of the last render.
    #[inline]
    pub fn tooltip_geometry(&self) -> Option<Placed> {
        self.tooltip
    }

    /// Earliest time [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.hover.next_deadline()
    }

    /// Fire due timers. Returns whether a re-render is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.hover.tick(now)
    }

    /// Route an input event.
    ///
    /// Button events on the visible part of the tooltip are consumed.
    /// Pointer positions over the anchor or the visible tooltip count as
    /// hovering; anything else, or the terminal losing focus, counts as
    /// leaving. Wheel events are not handled here: dispatch them on the
    /// [`ScrollBus`].
    pub fn handle_event(&mut self, event: &Event, now: Instant) -> Propagation {
        match event {
            Event::Mouse(mouse) => {
                let on_tooltip = self.on_tooltip(mouse.x, mouse.y);
                if on_tooltip && mouse.kind.is_button() {
                    trunctip_core::trace!(x = mouse.x, y = mouse.y, "tooltip button event stopped");
                    return Propagation::Stop;
                }
                if mouse.kind.is_scroll() {
                    return Propagation::Continue;
                }
                let on_anchor = self.anchor.is_some_and(|a| a.contains(mouse.x, mouse.y));
                self.track_pointer(self.interactive && (on_anchor || on_tooltip), now);
                Propagation::Continue
            }
            Event::Focus(false) => {
                self.track_pointer(false, now);
                Propagation::Continue
            }
            Event::Focus(true) | Event::Resize { .. } | Event::Tick => Propagation::Continue,
        }
    }

    /// Tear down: cancel timers, release the scroll listener, and report
    /// the anchor gone. Idempotent; also run on drop.
    pub fn unmount(&mut self) {
        self.hover.unmount();
        self.tooltip = None;
        self.tooltip_clip = Rect::default();
        self.pointer_inside = false;
        if self.anchor.take().is_some()
            && let Some(callback) = self.inner_ref.as_mut()
        {
            callback(None);
        }
    }

    /// Only cells the container lets through belong to the tooltip.
    fn on_tooltip(&self, x: u16, y: u16) -> bool {
        self.tooltip.is_some_and(|t| t.contains(x, y)) && self.tooltip_clip.contains(x, y)
    }

    fn track_pointer(&mut self, inside: bool, now: Instant) {
        if inside == self.pointer_inside {
            return;
        }
        self.pointer_inside = inside;
        if inside {
            if let Some(hook) = self.on_enter.as_mut() {
                hook(now);
            }
            self.hover.on_mouse_enter(now);
        } else {
            if let Some(hook) = self.on_leave.as_mut() {
                hook(now);
            }
            self.hover.on_mouse_leave(now);
        }
    }

    fn set_anchor(&mut self, anchor: Option<Rect>) {
        if self.anchor == anchor {
            return;
        }
        self.anchor = anchor;
        if let Some(callback) = self.inner_ref.as_mut() {
            callback(anchor);
        }
    }
}

impl fmt::Debug for TruncatedTextState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TruncatedTextState")
            .field("hover", &self.hover)
            .field("hit_id", &self.hit_id)
            .field("anchor", &self.anchor)
            .field("tooltip", &self.tooltip)
            .field("tooltip_clip", &self.tooltip_clip)
            .field("pointer_inside", &self.pointer_inside)
            .field("interactive", &self.interactive)
            .field("inner_ref", &self.inner_ref.is_some())
            .field("on_enter", &self.on_enter.is_some())
            .field("on_leave", &self.on_leave.is_some())
            .finish()
    }
}

impl Drop for TruncatedTextState {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Word-wrap `text` to `max_width` cells. Words wider than a line are
/// broken between graphemes; blank paragraphs are kept as empty lines.
fn wrap_lines(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if max_width == 0 {
        return lines;
    }
    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_width = 0usize;
        for word in paragraph.split_whitespace() {
            let word_width = display_width(word);
            if current_width > 0 && current_width + 1 + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += 1 + word_width;
                continue;
            }
            if current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if word_width <= max_width {
                current.push_str(word);
                current_width = word_width;
                continue;
            }
            for grapheme in word.graphemes(true) {
                let w = grapheme_width(grapheme);
                if current_width > 0 && current_width + w > max_width {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push_str(grapheme);
                current_width += w;
            }
        }
        lines.push(current);
    }
    lines
}
