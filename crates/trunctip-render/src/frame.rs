#![forbid(unsafe_code)]

//! Frame = Buffer + metadata for a render pass.
//!
//! The `Frame` is the render target widgets write to. Alongside the cell
//! grid it carries:
//!
//! - an optional hit grid for mouse hit testing,
//! - element markers (the attribute contract consumed by styling and tests),
//! - portal layers mounted during the pass and composited at the end.
//!
//! # Usage
//!
//! ```
//! use trunctip_render::frame::Frame;
//! use trunctip_render::cell::Cell;
//!
//! let mut frame = Frame::new(80, 24);
//! frame.buffer.set(0, 0, Cell::from_char('H'));
//! frame.flush_portals();
//! ```

use std::borrow::Cow;

use crate::buffer::Buffer;
use crate::portal::PortalLayer;
use trunctip_core::geometry::Rect;

/// Identifier for an interactive region in the hit grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HitId(pub u32);

impl HitId {
    /// Create a new hit ID from a raw value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Regions within a widget for mouse interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HitRegion {
    /// No interactive region.
    #[default]
    None,
    /// Main content area (the anchor text).
    Content,
    /// A floating overlay such as a tooltip.
    Overlay,
}

/// A single hit cell in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitCell {
    /// Widget that registered this cell, if any.
    pub widget_id: Option<HitId>,
    /// Region tag for the hit area.
    pub region: HitRegion,
}

/// Hit testing grid mapping screen positions to widget IDs.
#[derive(Debug, Clone)]
pub struct HitGrid {
    width: u16,
    height: u16,
    cells: Vec<HitCell>,
}

impl HitGrid {
    /// Create a new hit grid with the given dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![HitCell::default(); width as usize * height as usize],
        }
    }

    /// Register a region. Later registrations win over earlier ones.
    pub fn register(&mut self, rect: Rect, widget_id: HitId, region: HitRegion) {
        let x_end = (rect.x as usize + rect.width as usize).min(self.width as usize);
        let y_end = (rect.y as usize + rect.height as usize).min(self.height as usize);
        if rect.x as usize >= x_end || rect.y as usize >= y_end {
            return;
        }

        let hit_cell = HitCell {
            widget_id: Some(widget_id),
            region,
        };
        for y in rect.y as usize..y_end {
            let row_start = y * self.width as usize;
            self.cells[row_start + rect.x as usize..row_start + x_end].fill(hit_cell);
        }
    }

    /// Hit test at the given position.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<(HitId, HitRegion)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let cell = self.cells[y as usize * self.width as usize + x as usize];
        cell.widget_id.map(|id| (id, cell.region))
    }

    /// Clear all hit regions.
    pub fn clear(&mut self) {
        self.cells.fill(HitCell::default());
    }
}

/// An attribute attached to a rendered element.
///
/// Markers play the role of `data-*` attributes: they are the observable
/// contract of a render pass, keyed by attribute name and scoped to the
/// area the element occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Element name, e.g. `"block"` or `"tooltip"`.
    pub element: Cow<'static, str>,
    /// Attribute name.
    pub attr: &'static str,
    /// Attribute value.
    pub value: String,
    /// Area the element occupies.
    pub area: Rect,
}

/// Render target for one pass.
#[derive(Debug)]
pub struct Frame {
    /// The cell grid for this render pass.
    pub buffer: Buffer,

    /// Optional hit grid for mouse hit testing.
    pub hit_grid: Option<HitGrid>,

    markers: Vec<Marker>,
    portals: Vec<PortalLayer>,
}

impl Frame {
    /// Create a new frame without hit testing.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::new(width, height),
            hit_grid: None,
            markers: Vec::new(),
            portals: Vec::new(),
        }
    }

    /// Create a frame with hit testing enabled.
    pub fn with_hit_grid(width: u16, height: u16) -> Self {
        Self {
            hit_grid: Some(HitGrid::new(width, height)),
            ..Self::new(width, height)
        }
    }

    /// Frame width in cells.
    #[inline]
    pub fn width(&self) -> u16 {
        self.buffer.width()
    }

    /// Frame height in cells.
    #[inline]
    pub fn height(&self) -> u16 {
        self.buffer.height()
    }

    /// The whole frame area (the "viewport").
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.buffer.bounds()
    }

    /// Reset cells, hits, markers, and pending portals for a new pass.
    pub fn clear(&mut self) {
        self.buffer = Buffer::new(self.width(), self.height());
        if let Some(grid) = &mut self.hit_grid {
            grid.clear();
        }
        self.markers.clear();
        self.portals.clear();
    }

    // ========== Hit testing ==========

    /// Register a hit region (if hit grid is enabled).
    ///
    /// Returns `true` if the region was registered, `false` if no hit grid.
    /// The region is clipped against the current scissor.
    pub fn register_hit(&mut self, rect: Rect, id: HitId, region: HitRegion) -> bool {
        let clipped = rect.intersection(&self.buffer.current_scissor());
        match &mut self.hit_grid {
            Some(grid) => {
                if !clipped.is_empty() {
                    grid.register(clipped, id, region);
                }
                true
            }
            None => false,
        }
    }

    /// Hit test at the given position (if hit grid is enabled).
    pub fn hit_test(&self, x: u16, y: u16) -> Option<(HitId, HitRegion)> {
        self.hit_grid.as_ref().and_then(|grid| grid.hit_test(x, y))
    }

    // ========== Markers ==========

    /// Attach an attribute to an element area.
    pub fn mark(
        &mut self,
        element: impl Into<Cow<'static, str>>,
        attr: &'static str,
        value: impl Into<String>,
        area: Rect,
    ) {
        self.markers.push(Marker {
            element: element.into(),
            attr,
            value: value.into(),
            area,
        });
    }

    /// All markers recorded in this pass, in recording order.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// The most recent marker with the given attribute name.
    pub fn marker(&self, attr: &str) -> Option<&Marker> {
        self.markers.iter().rev().find(|m| m.attr == attr)
    }

    // ========== Portals ==========

    /// Mount a layer to be composited over the main pass.
    ///
    /// Layers are drawn by [`flush_portals`](Self::flush_portals) in mount
    /// order, after every widget has rendered, so they sit above anything
    /// drawn later in the same pass.
    pub fn mount_portal(&mut self, layer: PortalLayer) {
        self.portals.push(layer);
    }

    /// Layers mounted and not yet flushed.
    pub fn portals(&self) -> &[PortalLayer] {
        &self.portals
    }

    /// Composite and drop all mounted layers.
    pub fn flush_portals(&mut self) {
        for layer in std::mem::take(&mut self.portals) {
            layer.composite_into(&mut self.buffer);
        }
    }
}
