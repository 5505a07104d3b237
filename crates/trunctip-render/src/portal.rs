#![forbid(unsafe_code)]

//! Portal layers: content rendered outside its owner's area.
//!
//! A widget that needs to draw beyond the rectangle it was given (a
//! tooltip above its anchor, say) renders into a [`PortalLayer`] and mounts
//! it on the [`Frame`](crate::frame::Frame). The frame composites every
//! mounted layer after the main pass, clipped to the layer's container.
//!
//! # Invariants
//!
//! 1. A layer never writes outside `bounds ∩ container`.
//! 2. Empty cells in a layer are transparent: they leave the frame as is.

use crate::buffer::Buffer;
use trunctip_core::geometry::Rect;

/// Where a portal layer is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortalContainer {
    /// The whole frame.
    #[default]
    Root,
    /// A caller-supplied region; the layer is clipped to it.
    Region(Rect),
}

impl PortalContainer {
    /// Resolve the container against the frame bounds.
    pub fn resolve(self, frame_bounds: Rect) -> Rect {
        match self {
            Self::Root => frame_bounds,
            Self::Region(rect) => rect.intersection(&frame_bounds),
        }
    }
}

/// A detached layer of cells positioned in frame coordinates.
///
/// The layer's buffer is addressed in local coordinates: `(0, 0)` is the
/// top-left corner of [`bounds`](Self::bounds).
#[derive(Debug, Clone)]
pub struct PortalLayer {
    bounds: Rect,
    container: PortalContainer,
    buffer: Buffer,
}

impl PortalLayer {
    /// Create a layer covering `bounds`. Returns `None` for an empty area.
    pub fn new(bounds: Rect, container: PortalContainer) -> Option<Self> {
        if bounds.is_empty() {
            return None;
        }
        Some(Self {
            bounds,
            container,
            buffer: Buffer::new(bounds.width, bounds.height),
        })
    }

    /// Area covered by the layer, in frame coordinates.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Container the layer is attached to.
    #[inline]
    pub fn container(&self) -> PortalContainer {
        self.container
    }

    /// Local cell buffer.
    #[inline]
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Mutable local cell buffer.
    #[inline]
    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    /// Convert a frame position to layer-local coordinates.
    pub fn to_local(&self, x: u16, y: u16) -> Option<(u16, u16)> {
        self.bounds
            .contains(x, y)
            .then(|| (x - self.bounds.x, y - self.bounds.y))
    }

    /// Copy the non-empty cells of this layer into `target`.
    pub(crate) fn composite_into(&self, target: &mut Buffer) {
        let clip = self.container.resolve(target.bounds());
        target.push_scissor(clip);
        for ly in 0..self.bounds.height {
            for lx in 0..self.bounds.width {
                let Some(cell) = self.buffer.get(lx, ly) else {
                    continue;
                };
                if cell.is_empty() || cell.is_continuation() {
                    continue;
                }
                target.set(self.bounds.x + lx, self.bounds.y + ly, *cell);
            }
        }
        target.pop_scissor();
    }
}
