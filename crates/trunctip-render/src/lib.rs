#![forbid(unsafe_code)]

//! Render kernel: cells, buffers, frames, hit testing, markers, and portal layers.

pub mod buffer;
pub mod cell;
pub mod frame;
pub mod portal;

mod text_width {
    use unicode_display_width::width as unicode_display_width;
    use unicode_segmentation::UnicodeSegmentation;
    use unicode_width::UnicodeWidthChar;

    #[inline]
    fn ascii_display_width(text: &str) -> usize {
        let mut width = 0;
        for b in text.bytes() {
            match b {
                b'\t' | b'\n' | b'\r' => width += 1,
                0x20..=0x7E => width += 1,
                _ => {}
            }
        }
        width
    }

    #[inline]
    fn is_zero_width_codepoint(c: char) -> bool {
        let u = c as u32;
        matches!(u, 0x0000..=0x001F | 0x007F..=0x009F)
            || matches!(u, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF)
            || matches!(u, 0xFE00..=0xFE0F | 0xFE20..=0xFE2F | 0xE0100..=0xE01EF)
            || matches!(
                u,
                0x00AD | 0x034F | 0x180E | 0x200B | 0x200C | 0x200D | 0x200E | 0x200F | 0x2060 | 0xFEFF
            )
            || matches!(u, 0x202A..=0x202E | 0x2066..=0x2069 | 0x206A..=0x206F)
    }

    /// Display width of a single grapheme cluster in cells.
    #[inline]
    pub fn grapheme_width(grapheme: &str) -> usize {
        if grapheme.is_ascii() {
            return ascii_display_width(grapheme);
        }
        if grapheme.chars().all(is_zero_width_codepoint) {
            return 0;
        }
        unicode_display_width(grapheme).min(usize::MAX as u64) as usize
    }

    /// Display width of a single character in cells.
    #[inline]
    pub fn char_width(ch: char) -> usize {
        if ch.is_ascii() {
            return match ch {
                '\t' | '\n' | '\r' => 1,
                ' '..='~' => 1,
                _ => 0,
            };
        }
        if is_zero_width_codepoint(ch) {
            return 0;
        }
        UnicodeWidthChar::width(ch).unwrap_or(0)
    }

    /// Display width of a string in cells.
    ///
    /// This is the "content width" used for truncation: the number of
    /// cells the text would occupy with no clipping.
    #[inline]
    pub fn display_width(text: &str) -> usize {
        if text.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
            return text.len();
        }
        if text.is_ascii() {
            return ascii_display_width(text);
        }
        text.graphemes(true).map(grapheme_width).sum()
    }
}

pub use text_width::{char_width, display_width, grapheme_width};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_width_is_length() {
        assert_eq!(display_width("hello world"), 11);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn wide_and_combining_widths() {
        assert_eq!(display_width("日本"), 4);
        assert_eq!(grapheme_width("e\u{301}"), 1);
        assert_eq!(char_width('\u{200B}'), 0);
        assert_eq!(char_width('界'), 2);
    }
}
