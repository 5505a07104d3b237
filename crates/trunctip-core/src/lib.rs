#![forbid(unsafe_code)]

//! Core: geometry, input events, deadline timers, and logging.

pub mod event;
pub mod geometry;
pub mod logging;
pub mod timer;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, trace_span, warn};
