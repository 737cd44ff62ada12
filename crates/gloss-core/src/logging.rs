#![forbid(unsafe_code)]

//! Diagnostics macros shared by every gloss crate.
//!
//! Widgets log through `gloss_core::debug!` and friends instead of naming
//! `tracing` directly. The `tracing` feature (on by default) forwards each
//! macro to its `tracing` namesake. With the feature off the macros swallow
//! their arguments, and span macros hand back an [`InertSpan`] whose
//! `enter()` matches the real API, so instrumented code compiles unchanged.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, trace, trace_span, warn};

#[cfg(not(feature = "tracing"))]
mod disabled {
    /// Discards a debug event.
    #[macro_export]
    macro_rules! debug {
        ($($event:tt)*) => {};
    }

    /// Discards a trace event.
    #[macro_export]
    macro_rules! trace {
        ($($event:tt)*) => {};
    }

    /// Discards a warning.
    #[macro_export]
    macro_rules! warn {
        ($($event:tt)*) => {};
    }

    /// Builds an [`InertSpan`](crate::logging::InertSpan).
    #[macro_export]
    macro_rules! debug_span {
        ($($span:tt)*) => {
            $crate::logging::InertSpan
        };
    }

    /// Builds an [`InertSpan`](crate::logging::InertSpan).
    #[macro_export]
    macro_rules! trace_span {
        ($($span:tt)*) => {
            $crate::logging::InertSpan
        };
    }
}

/// Returned by the span macros when diagnostics are compiled out.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct InertSpan;

#[cfg(not(feature = "tracing"))]
impl InertSpan {
    #[must_use]
    pub fn enter(&self) -> InertGuard {
        InertGuard
    }
}

/// Held for the lifetime of an entered [`InertSpan`].
#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct InertGuard;
