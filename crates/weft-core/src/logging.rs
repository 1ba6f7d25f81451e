#![forbid(unsafe_code)]

//! Diagnostics macros used across the workspace.
//!
//! The layout solver and the focus dispatcher log through
//! `weft_core::debug!`, `weft_core::warn!` and `weft_core::debug_span!`.
//! With the `tracing` feature these are the `tracing` macros. Without it
//! they expand to nothing, and `debug_span!` yields a [`NoopSpan`], so
//! call sites need no `cfg` of their own.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, warn};

#[cfg(not(feature = "tracing"))]
mod disabled {
    /// Discards its arguments.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Discards its arguments.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    /// Discards its arguments and yields a
    /// [`NoopSpan`](crate::logging::NoopSpan).
    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}

/// What `debug_span!` yields without the `tracing` feature.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    pub fn enter(&self) -> NoopGuard {
        NoopGuard
    }

    /// Like `tracing::Span::entered`.
    pub fn entered(self) -> NoopGuard {
        NoopGuard
    }

    /// Runs `f`.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        f()
    }
}

#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct NoopGuard;
