#![forbid(unsafe_code)]

//! A partial cell style.
//!
//! Every field is optional: `None` means "inherit whatever is underneath".
//! Styles compose by [`merge`](Style::merge), where the receiver wins on
//! conflicting colors and attribute flags are unioned.

use trunctip_render::cell::{Cell, PackedRgba};

pub use trunctip_render::cell::StyleFlags;

/// Foreground, background, and attribute overrides for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    /// Foreground color override.
    pub fg: Option<PackedRgba>,
    /// Background color override.
    pub bg: Option<PackedRgba>,
    /// Attribute flags to add.
    pub attrs: Option<StyleFlags>,
}

impl Style {
    /// An empty style (inherits everything).
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: None,
        }
    }

    /// Set the foreground color.
    #[inline]
    #[must_use]
    pub const fn fg(mut self, color: PackedRgba) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color.
    #[inline]
    #[must_use]
    pub const fn bg(mut self, color: PackedRgba) -> Self {
        self.bg = Some(color);
        self
    }

    /// Add attribute flags.
    #[inline]
    #[must_use]
    pub fn attrs(mut self, flags: StyleFlags) -> Self {
        self.attrs = Some(self.attrs.unwrap_or_default() | flags);
        self
    }

    /// Add bold.
    #[inline]
    #[must_use]
    pub fn bold(self) -> Self {
        self.attrs(StyleFlags::BOLD)
    }

    /// Add dim.
    #[inline]
    #[must_use]
    pub fn dim(self) -> Self {
        self.attrs(StyleFlags::DIM)
    }

    /// Add italic.
    #[inline]
    #[must_use]
    pub fn italic(self) -> Self {
        self.attrs(StyleFlags::ITALIC)
    }

    /// Add underline.
    #[inline]
    #[must_use]
    pub fn underline(self) -> Self {
        self.attrs(StyleFlags::UNDERLINE)
    }

    /// Add reverse video.
    #[inline]
    #[must_use]
    pub fn reverse(self) -> Self {
        self.attrs(StyleFlags::REVERSE)
    }

    /// Whether this style overrides nothing.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_none()
    }

    /// Merge with a parent style. Fields set on `self` take precedence.
    #[must_use]
    pub fn merge(&self, parent: &Style) -> Style {
        let attrs = match (self.attrs, parent.attrs) {
            (Some(a), Some(b)) => Some(a | b),
            (a, b) => a.or(b),
        };
        Style {
            fg: self.fg.or(parent.fg),
            bg: self.bg.or(parent.bg),
            attrs,
        }
    }

    /// Apply `overrides` on top of this style.
    #[must_use]
    pub fn patch(self, overrides: Style) -> Style {
        overrides.merge(&self)
    }

    /// Write the set fields into a cell, keeping its content.
    pub fn apply_to(&self, cell: &mut Cell) {
        if let Some(fg) = self.fg {
            cell.fg = fg;
        }
        if let Some(bg) = self.bg {
            cell.bg = bg;
        }
        if let Some(attrs) = self.attrs {
            cell.attrs |= attrs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: PackedRgba = PackedRgba::rgb(255, 0, 0);
    const BLUE: PackedRgba = PackedRgba::rgb(0, 0, 255);

    #[test]
    fn new_is_empty() {
        assert!(Style::new().is_empty());
        assert!(!Style::new().bold().is_empty());
    }

    #[test]
    fn merge_prefers_self_and_unions_flags() {
        let child = Style::new().fg(RED).bold();
        let parent = Style::new().fg(BLUE).bg(BLUE).underline();
        let merged = child.merge(&parent);
        assert_eq!(merged.fg, Some(RED));
        assert_eq!(merged.bg, Some(BLUE));
        assert_eq!(merged.attrs, Some(StyleFlags::BOLD | StyleFlags::UNDERLINE));
    }

    #[test]
    fn patch_overrides_base() {
        let base = Style::new().fg(BLUE).bg(BLUE);
        let patched = base.patch(Style::new().fg(RED));
        assert_eq!(patched.fg, Some(RED));
        assert_eq!(patched.bg, Some(BLUE));
    }

    #[test]
    fn apply_to_keeps_content() {
        let mut cell = Cell::from_char('Z');
        Style::new().bg(RED).dim().apply_to(&mut cell);
        assert_eq!(cell.content.as_char(), Some('Z'));
        assert_eq!(cell.bg, RED);
        assert!(cell.attrs.contains(StyleFlags::DIM));
    }
}
