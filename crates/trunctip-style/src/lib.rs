#![forbid(unsafe_code)]

//! Style types and the named-style registry.

pub mod style;
pub mod stylesheet;

pub use style::{Style, StyleFlags};
pub use stylesheet::StyleSheet;
