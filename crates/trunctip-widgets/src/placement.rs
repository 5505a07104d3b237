#![forbid(unsafe_code)]

//! Tooltip placement relative to its anchor.
//!
//! A placement is a side (above or below the anchor) plus an alignment on
//! the cross axis. The string forms are `top`, `top-start`, `top-end`,
//! `bottom`, `bottom-start` and `bottom-end`.

use std::fmt;
use std::str::FromStr;

/// Which side of the anchor the tooltip sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Above the anchor.
    Top,
    /// Below the anchor.
    Bottom,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}

/// Horizontal alignment against the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Align {
    /// Left edges line up.
    Start,
    /// Centers line up.
    Center,
    /// Right edges line up.
    End,
}

/// Requested tooltip placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Placement {
    #[default]
    Top,
    TopStart,
    TopEnd,
    Bottom,
    BottomStart,
    BottomEnd,
}

impl Placement {
    /// Every placement, in declaration order.
    pub const ALL: [Placement; 6] = [
        Self::Top,
        Self::TopStart,
        Self::TopEnd,
        Self::Bottom,
        Self::BottomStart,
        Self::BottomEnd,
    ];

    /// Build a placement from its parts.
    #[must_use]
    pub const fn from_parts(side: Side, align: Align) -> Self {
        match (side, align) {
            (Side::Top, Align::Center) => Self::Top,
            (Side::Top, Align::Start) => Self::TopStart,
            (Side::Top, Align::End) => Self::TopEnd,
            (Side::Bottom, Align::Center) => Self::Bottom,
            (Side::Bottom, Align::Start) => Self::BottomStart,
            (Side::Bottom, Align::End) => Self::BottomEnd,
        }
    }

    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Self::Top | Self::TopStart | Self::TopEnd => Side::Top,
            Self::Bottom | Self::BottomStart | Self::BottomEnd => Side::Bottom,
        }
    }

    #[must_use]
    pub const fn align(self) -> Align {
        match self {
            Self::Top | Self::Bottom => Align::Center,
            Self::TopStart | Self::BottomStart => Align::Start,
            Self::TopEnd | Self::BottomEnd => Align::End,
        }
    }

    /// Same alignment on the opposite side.
    #[must_use]
    pub const fn flip(self) -> Self {
        Self::from_parts(self.side().opposite(), self.align())
    }

    /// The canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::TopStart => "top-start",
            Self::TopEnd => "top-end",
            Self::Bottom => "bottom",
            Self::BottomStart => "bottom-start",
            Self::BottomEnd => "bottom-end",
        }
    }

    /// Parse a placement, falling back to [`Placement::Top`] on bad input.
    ///
    /// Surrounding whitespace and ASCII case are ignored. The fallback is
    /// logged at warn level.
    #[must_use]
    pub fn parse_or_default(input: &str) -> Self {
        match input.parse() {
            Ok(placement) => placement,
            Err(_err) => {
                trunctip_core::warn!(error = %_err, fallback = "top", "invalid tooltip placement");
                Self::default()
            }
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParsePlacementError {
                input: s.to_string(),
            })
    }
}

/// Error returned when a string names no placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePlacementError {
    input: String,
}

impl ParsePlacementError {
    /// The rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParsePlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown placement {:?}: expected one of top, top-start, top-end, bottom, bottom-start, bottom-end",
            self.input
        )
    }
}

impl std::error::Error for ParsePlacementError {}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::Placement;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Placement {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.as_str())
        }
    }

    // Lenient: configuration files with a bad placement still load.
    impl<'de> Deserialize<'de> for Placement {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let raw = String::deserialize(deserializer)?;
            Ok(Placement::parse_or_default(&raw))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_canonical_name() {
        for placement in Placement::ALL {
            assert_eq!(placement.as_str().parse::<Placement>(), Ok(placement));
            assert_eq!(placement.to_string(), placement.as_str());
        }
    }

    #[test]
    fn parse_ignores_case_and_whitespace() {
        assert_eq!(" Bottom-End ".parse::<Placement>(), Ok(Placement::BottomEnd));
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "left".parse::<Placement>().unwrap_err();
        assert_eq!(err.input(), "left");
        assert!(err.to_string().contains("\"left\""));
    }

    #[test]
    fn parse_or_default_falls_back_to_top() {
        assert_eq!(Placement::parse_or_default("diagonal"), Placement::Top);
        assert_eq!(Placement::parse_or_default("top-start"), Placement::TopStart);
    }

    #[test]
    fn flip_keeps_alignment() {
        assert_eq!(Placement::TopStart.flip(), Placement::BottomStart);
        assert_eq!(Placement::Bottom.flip(), Placement::Top);
        for p in Placement::ALL {
            assert_eq!(p.flip().flip(), p);
            assert_eq!(Placement::from_parts(p.side(), p.align()), p);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_is_lenient() {
        let p: Placement = serde_json::from_str("\"bottom-start\"").unwrap();
        assert_eq!(p, Placement::BottomStart);
        let p: Placement = serde_json::from_str("\"sideways\"").unwrap();
        assert_eq!(p, Placement::Top);
        assert_eq!(serde_json::to_string(&Placement::TopEnd).unwrap(), "\"top-end\"");
    }
}
