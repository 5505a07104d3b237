#![forbid(unsafe_code)]

//! Buffer grid storage.
//!
//! The `Buffer` is a 2D grid of [`Cell`]s with a scissor (clipping) stack.
//!
//! # Layout
//!
//! Cells are stored in row-major order: `index = y * width + x`.
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`
//! 2. Width and height never change after creation
//! 3. Scissor stack intersection monotonically decreases on push
//! 4. The scissor stack always has at least one element

use crate::cell::Cell;
use trunctip_core::geometry::Rect;

/// A 2D grid of terminal cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    scissor_stack: Vec<Rect>,
}

impl Buffer {
    /// Create a new buffer with the given dimensions.
    ///
    /// # Panics
    ///
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0, "buffer width must be > 0");
        assert!(height > 0, "buffer height must be > 0");

        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
            scissor_stack: vec![Rect::from_size(width, height)],
        }
    }

    /// Buffer width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Bounding rect of the entire buffer.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Get a reference to the cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Get a mutable reference to the cell at (x, y).
    ///
    /// Bypasses the scissor stack.
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Set the cell at (x, y).
    ///
    /// - Respects the current scissor region (skips if outside)
    /// - Does nothing if coordinates are out of bounds
    /// - Writes CONTINUATION cells after a wide character; if the whole
    ///   character does not fit, nothing is written
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let width = cell.content.width().max(1) as u16;
        let scissor = self.current_scissor();
        let span = Rect::new(x, y, width, 1);
        if !scissor.contains_rect(&span) || span.right() > self.width || y >= self.height {
            return;
        }
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = cell;
        }
        for dx in 1..width {
            if let Some(idx) = self.index(x + dx, y) {
                self.cells[idx] = Cell::CONTINUATION;
            }
        }
    }

    /// Fill a rectangle with the given cell, clipped to the scissor.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let clipped = rect.intersection(&self.current_scissor());
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                if let Some(idx) = self.index(x, y) {
                    self.cells[idx] = cell;
                }
            }
        }
    }

    /// Read one row as a string, skipping continuation cells and
    /// rendering empty cells as spaces.
    pub fn row_text(&self, y: u16) -> String {
        let mut out = String::new();
        for x in 0..self.width {
            if let Some(cell) = self.get(x, y) {
                if cell.is_continuation() {
                    continue;
                }
                out.push(cell.content.as_char().unwrap_or(' '));
            }
        }
        out
    }

    // ========== Scissor Stack ==========

    /// Push a scissor (clipping) region onto the stack.
    ///
    /// The effective scissor is the intersection of all pushed rects.
    pub fn push_scissor(&mut self, rect: Rect) {
        let intersected = self.current_scissor().intersection(&rect);
        self.scissor_stack.push(intersected);
    }

    /// Pop a scissor region from the stack.
    ///
    /// Does nothing if only the base scissor remains.
    pub fn pop_scissor(&mut self) {
        if self.scissor_stack.len() > 1 {
            self.scissor_stack.pop();
        }
    }

    /// Get the current effective scissor region.
    #[inline]
    pub fn current_scissor(&self) -> Rect {
        self.scissor_stack
            .last()
            .copied()
            .unwrap_or_else(|| self.bounds())
    }

    /// Get the scissor stack depth.
    #[inline]
    pub fn scissor_depth(&self) -> usize {
        self.scissor_stack.len()
    }
}

impl Default for Buffer {
    /// Create a 1x1 buffer (minimum size).
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut buf = Buffer::new(4, 2);
        buf.set(1, 1, Cell::from_char('x'));
        assert_eq!(buf.get(1, 1).and_then(|c| c.content.as_char()), Some('x'));
        assert!(buf.get(4, 0).is_none());
    }

    #[test]
    fn scissor_clips_writes() {
        let mut buf = Buffer::new(5, 1);
        buf.push_scissor(Rect::new(1, 0, 2, 1));
        buf.set(0, 0, Cell::from_char('a'));
        buf.set(1, 0, Cell::from_char('b'));
        buf.set(3, 0, Cell::from_char('c'));
        buf.pop_scissor();
        assert_eq!(buf.row_text(0), " b   ");
    }

    #[test]
    fn pop_keeps_base_scissor() {
        let mut buf = Buffer::new(3, 3);
        buf.pop_scissor();
        assert_eq!(buf.scissor_depth(), 1);
        assert_eq!(buf.current_scissor(), Rect::new(0, 0, 3, 3));
    }

    #[test]
    fn wide_char_writes_continuation() {
        let mut buf = Buffer::new(4, 1);
        buf.set(0, 0, Cell::from_char('界'));
        assert!(buf.get(1, 0).is_some_and(Cell::is_continuation));
        assert_eq!(buf.row_text(0), "界  ");
    }

    #[test]
    fn wide_char_at_edge_is_skipped() {
        let mut buf = Buffer::new(2, 1);
        buf.set(1, 0, Cell::from_char('界'));
        assert!(buf.get(1, 0).is_some_and(Cell::is_empty));
    }

    #[test]
    fn fill_respects_scissor() {
        let mut buf = Buffer::new(4, 2);
        buf.push_scissor(Rect::new(0, 0, 2, 2));
        buf.fill(Rect::new(0, 0, 4, 2), Cell::from_char('#'));
        assert_eq!(buf.row_text(0), "##  ");
        assert_eq!(buf.row_text(1), "##  ");
    }
}
