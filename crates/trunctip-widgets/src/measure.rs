#![forbid(unsafe_code)]

//! Truncation measurement.
//!
//! Measurement is taken fresh on every render and never cached: the text or
//! the area can change between frames.

use trunctip_core::geometry::Rect;
use trunctip_render::display_width;

/// Content width against the width of the area showing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetMeasurement {
    /// Display width of the widest content line, in cells.
    pub content_width: usize,
    /// Width of the area the content is drawn into, in cells.
    pub visible_width: u16,
}

impl TargetMeasurement {
    /// Measure `content` against `area`.
    ///
    /// Returns `None` when the area is empty: there is nothing mounted to
    /// measure.
    #[must_use]
    pub fn measure(content: &str, area: Rect) -> Option<Self> {
        if area.is_empty() {
            return None;
        }
        let content_width = content.lines().map(display_width).max().unwrap_or(0);
        Some(Self {
            content_width,
            visible_width: area.width,
        })
    }

    /// Whether the content overflows the area.
    #[inline]
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.content_width > self.visible_width as usize
    }
}

/// Truncation of an optional measurement. No measurement means not truncated.
#[inline]
#[must_use]
pub fn is_truncated(measurement: Option<TargetMeasurement>) -> bool {
    measurement.is_some_and(|m| m.is_truncated())
}

/// Whether the tooltip should be displayed.
#[inline]
#[must_use]
pub fn should_show(hovered: bool, measurement: Option<TargetMeasurement>) -> bool {
    hovered && is_truncated(measurement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_area_is_unmeasured() {
        assert_eq!(TargetMeasurement::measure("hello", Rect::new(0, 0, 0, 1)), None);
        assert!(!is_truncated(None));
        assert!(!should_show(true, None));
    }

    #[test]
    fn wide_chars_count_double() {
        let m = TargetMeasurement::measure("日本語", Rect::new(0, 0, 5, 1)).unwrap();
        assert_eq!(m.content_width, 6);
        assert!(m.is_truncated());
    }

    #[test]
    fn exact_fit_is_not_truncated() {
        let m = TargetMeasurement::measure("abcde", Rect::new(3, 3, 5, 1)).unwrap();
        assert!(!m.is_truncated());
    }

    #[test]
    fn widest_line_decides() {
        let m = TargetMeasurement::measure("ab\nabcdef\nabc", Rect::new(0, 0, 4, 3)).unwrap();
        assert_eq!(m.content_width, 6);
    }

    proptest! {
        #[test]
        fn show_iff_hovered_and_overflowing(
            hovered in any::<bool>(),
            text in "[a-z ]{0,40}",
            width in 0u16..50,
        ) {
            let m = TargetMeasurement::measure(&text, Rect::new(0, 0, width, 1));
            let expected = hovered && width > 0 && text.len() > width as usize;
            prop_assert_eq!(should_show(hovered, m), expected);
        }
    }
}
