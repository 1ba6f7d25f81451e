#![forbid(unsafe_code)]

//! Core: geometry, input events, and logging shared by every weft crate.

pub mod event;
pub mod geometry;
pub mod logging;

#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, warn};
