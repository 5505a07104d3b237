#![forbid(unsafe_code)]

//! Tooltip positioning.
//!
//! A [`Positioner`] decides where a tooltip of a given size goes, relative
//! to its anchor and inside a viewport. [`ViewportPositioner`] is the
//! default and does what a tooltip needs, nothing more:
//!
//! 1. **Flip**: use the requested side if the tooltip (plus the arrow row)
//!    fits there, else the opposite side if that fits, else whichever side
//!    has more room.
//! 2. **Align**: start, center, or end against the anchor on the x axis.
//! 3. **Prevent overflow**: clamp x so the tooltip stays `padding` cells
//!    away from the viewport edges. The padding shrinks when the viewport
//!    is too narrow to honour it on both sides; y is clamped to the
//!    viewport with no padding.
//! 4. **Arrow**: one cell in the row between tooltip and anchor, as close
//!    to the anchor's center as the overlap of the two allows.
//!
//! The resolved placement (after flipping) is reported back so that the
//! markers describe what was drawn, not what was asked for.

use trunctip_core::geometry::{Rect, Size};

use crate::placement::{Align, Placement, Side};

/// Inset from the viewport edges kept on the cross axis.
pub const VIEWPORT_PADDING: u16 = 10;

/// Input to a [`Positioner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementRequest {
    /// The anchor's area.
    pub anchor: Rect,
    /// Area the tooltip must stay inside.
    pub viewport: Rect,
    /// Tooltip size before clipping.
    pub size: Size,
    /// Requested placement.
    pub placement: Placement,
    /// Cross-axis inset from the viewport edges.
    pub padding: u16,
    /// Reserve a row for the arrow between tooltip and anchor.
    pub arrow: bool,
}

impl PlacementRequest {
    /// A request with the default padding and an arrow.
    #[must_use]
    pub fn new(anchor: Rect, viewport: Rect, size: Size, placement: Placement) -> Self {
        Self {
            anchor,
            viewport,
            size,
            placement,
            padding: VIEWPORT_PADDING,
            arrow: true,
        }
    }

    #[must_use]
    pub fn padding(mut self, padding: u16) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn arrow(mut self, arrow: bool) -> Self {
        self.arrow = arrow;
        self
    }
}

/// Output of a [`Positioner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placed {
    /// Tooltip body area.
    pub bounds: Rect,
    /// Placement actually used.
    pub placement: Placement,
    /// Arrow cell, if requested and there was room for it.
    pub arrow: Option<Rect>,
}

impl Placed {
    /// Smallest area covering the body and the arrow.
    #[must_use]
    pub fn area(&self) -> Rect {
        match self.arrow {
            Some(arrow) => union(self.bounds, arrow),
            None => self.bounds,
        }
    }

    /// Whether a position lies on the body or the arrow.
    #[must_use]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        self.bounds.contains(x, y) || self.arrow.is_some_and(|a| a.contains(x, y))
    }
}

/// Computes tooltip geometry.
pub trait Positioner {
    /// Place a tooltip. `None` means it cannot be shown at all (empty
    /// viewport or empty content).
    fn place(&self, request: &PlacementRequest) -> Option<Placed>;
}

/// Flip, align, and clamp inside the viewport.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportPositioner;

impl Positioner for ViewportPositioner {
    fn place(&self, req: &PlacementRequest) -> Option<Placed> {
        let vp = req.viewport;
        if vp.is_empty() || req.size.is_empty() {
            return None;
        }
        let anchor = req.anchor;
        let gap = u16::from(req.arrow);
        let width = req.size.width.min(vp.width);
        let height = req.size.height.min(vp.height.saturating_sub(gap).max(1));
        let needed = height.saturating_add(gap);

        let room = |side: Side| match side {
            Side::Top => anchor.y.saturating_sub(vp.y),
            Side::Bottom => vp.bottom().saturating_sub(anchor.bottom()),
        };
        let preferred = req.placement.side();
        let opposite = preferred.opposite();
        let side = if room(preferred) >= needed {
            preferred
        } else if room(opposite) >= needed || room(opposite) > room(preferred) {
            opposite
        } else {
            preferred
        };
        let placement = Placement::from_parts(side, req.placement.align());
        if side != preferred {
            trunctip_core::trace!(requested = req.placement.as_str(), resolved = placement.as_str(), "tooltip flipped");
        }

        let y = match side {
            Side::Top => anchor.y as i32 - gap as i32 - height as i32,
            Side::Bottom => anchor.bottom() as i32 + gap as i32,
        };
        let y = clamp(y, vp.y as i32, vp.bottom() as i32 - height as i32);

        let x = match req.placement.align() {
            Align::Start => anchor.x as i32,
            Align::Center => anchor.x as i32 + (anchor.width as i32 - width as i32) / 2,
            Align::End => anchor.right() as i32 - width as i32,
        };
        let pad = req.padding.min((vp.width - width) / 2);
        let x = clamp(
            x,
            vp.x as i32 + pad as i32,
            vp.right() as i32 - pad as i32 - width as i32,
        );

        let bounds = Rect::new(x, y, width, height);
        let arrow = req
            .arrow
            .then(|| arrow_cell(anchor, bounds, side))
            .flatten()
            .filter(|cell| vp.contains_rect(cell) && !bounds.contains(cell.x, cell.y));

        Some(Placed {
            bounds,
            placement,
            arrow,
        })
    }
}

fn arrow_cell(anchor: Rect, bounds: Rect, side: Side) -> Option<Rect> {
    let y = match side {
        Side::Top => bounds.bottom() as i32,
        Side::Bottom => bounds.y as i32 - 1,
    };
    if y < 0 || y > u16::MAX as i32 {
        return None;
    }
    let center = anchor.x as i32 + anchor.width as i32 / 2;
    let lo = bounds.x.max(anchor.x) as i32;
    let hi = bounds.right().min(anchor.right()) as i32 - 1;
    let x = if lo <= hi {
        center.clamp(lo, hi)
    } else {
        center.clamp(bounds.x as i32, bounds.right() as i32 - 1)
    };
    Some(Rect::new(x.max(0) as u16, y as u16, 1, 1))
}

fn clamp(v: i32, lo: i32, hi: i32) -> u16 {
    v.min(hi).max(lo).max(0) as u16
}

fn union(a: Rect, b: Rect) -> Rect {
    let x = a.x.min(b.x);
    let y = a.y.min(b.y);
    let right = a.right().max(b.right());
    let bottom = a.bottom().max(b.bottom());
    Rect::new(x, y, right - x, bottom - y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VIEWPORT: Rect = Rect::new(0, 0, 80, 24);

    fn place(anchor: Rect, size: Size, placement: Placement) -> Placed {
        ViewportPositioner
            .place(&PlacementRequest::new(anchor, VIEWPORT, size, placement))
            .expect("placed")
    }

    #[test]
    fn top_centered_with_arrow() {
        let placed = place(Rect::new(30, 10, 10, 1), Size::new(6, 1), Placement::Top);
        assert_eq!(placed.placement, Placement::Top);
        assert_eq!(placed.bounds, Rect::new(32, 8, 6, 1));
        assert_eq!(placed.arrow, Some(Rect::new(35, 9, 1, 1)));
        assert_eq!(placed.area(), Rect::new(32, 8, 6, 2));
    }

    #[test]
    fn start_and_end_alignment() {
        let anchor = Rect::new(30, 10, 10, 1);
        assert_eq!(place(anchor, Size::new(4, 1), Placement::BottomStart).bounds.x, 30);
        assert_eq!(place(anchor, Size::new(4, 1), Placement::BottomEnd).bounds.x, 36);
        assert_eq!(place(anchor, Size::new(4, 1), Placement::Bottom).bounds.y, 12);
    }

    #[test]
    fn flips_to_bottom_at_top_edge() {
        let placed = place(Rect::new(30, 0, 10, 1), Size::new(6, 2), Placement::TopStart);
        assert_eq!(placed.placement, Placement::BottomStart);
        assert_eq!(placed.bounds.y, 2);
        assert_eq!(placed.arrow.map(|a| a.y), Some(1));
    }

    #[test]
    fn flips_to_top_at_bottom_edge() {
        let placed = place(Rect::new(30, 23, 10, 1), Size::new(6, 2), Placement::Bottom);
        assert_eq!(placed.placement, Placement::Top);
        assert_eq!(placed.bounds, Rect::new(32, 20, 6, 2));
    }

    #[test]
    fn padding_keeps_tooltip_off_the_edge() {
        let placed = place(Rect::new(0, 10, 4, 1), Size::new(6, 1), Placement::TopStart);
        assert_eq!(placed.bounds.x, VIEWPORT_PADDING);
        // The arrow cannot reach the anchor any more; it hugs the tooltip.
        assert_eq!(placed.arrow.map(|a| a.x), Some(VIEWPORT_PADDING));
    }

    #[test]
    fn padding_shrinks_in_narrow_viewport() {
        let viewport = Rect::new(0, 0, 20, 10);
        let req = PlacementRequest::new(Rect::new(0, 5, 20, 1), viewport, Size::new(16, 1), Placement::Top);
        let placed = ViewportPositioner.place(&req).unwrap();
        assert_eq!(placed.bounds.x, 2);
        assert!(viewport.contains_rect(&placed.bounds));
    }

    #[test]
    fn oversized_tooltip_is_clipped_to_viewport() {
        let placed = place(Rect::new(0, 12, 80, 1), Size::new(200, 1), Placement::Top);
        assert_eq!(placed.bounds.width, 80);
        assert_eq!(placed.bounds.x, 0);
    }

    #[test]
    fn no_arrow_means_no_gap() {
        let req = PlacementRequest::new(Rect::new(30, 10, 10, 1), VIEWPORT, Size::new(6, 1), Placement::Top)
            .arrow(false);
        let placed = ViewportPositioner.place(&req).unwrap();
        assert_eq!(placed.bounds.y, 9);
        assert_eq!(placed.arrow, None);
    }

    #[test]
    fn empty_inputs_are_unplaceable() {
        let req = PlacementRequest::new(Rect::new(0, 0, 1, 1), Rect::new(0, 0, 0, 0), Size::new(3, 1), Placement::Top);
        assert!(ViewportPositioner.place(&req).is_none());
        let req = PlacementRequest::new(Rect::new(0, 0, 1, 1), VIEWPORT, Size::new(0, 1), Placement::Top);
        assert!(ViewportPositioner.place(&req).is_none());
    }

    proptest! {
        #[test]
        fn stays_inside_viewport(
            ax in 0u16..80, ay in 0u16..24, aw in 1u16..40,
            w in 1u16..90, h in 1u16..6,
            idx in 0usize..6,
        ) {
            let anchor = Rect::new(ax, ay, aw.min(80 - ax).max(1), 1);
            let placed = place(anchor, Size::new(w, h), Placement::ALL[idx]);
            prop_assert!(VIEWPORT.contains_rect(&placed.bounds));
            prop_assert!(VIEWPORT.contains_rect(&placed.area()));
            if let Some(arrow) = placed.arrow {
                prop_assert!(!placed.bounds.contains(arrow.x, arrow.y));
            }
        }

        #[test]
        fn keeps_requested_side_when_it_fits(ay in 3u16..21, idx in 0usize..6) {
            let requested = Placement::ALL[idx];
            let placed = place(Rect::new(20, ay, 10, 1), Size::new(8, 2), requested);
            prop_assert_eq!(placed.placement, requested);
        }
    }
}
