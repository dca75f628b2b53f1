#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature the usual `tracing` macros are re-exported, so
//! downstream crates write `imkit_core::warn!(..)` and get real events.
//! Without it the same names expand to nothing and the arguments are never
//! evaluated.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op `debug!`.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op `info!`.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// No-op `trace!`.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op `warn!`.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    /// No-op `error!`.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    #[macro_export]
    macro_rules! info_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    #[macro_export]
    macro_rules! trace_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    #[macro_export]
    macro_rules! warn_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    #[macro_export]
    macro_rules! error_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}

/// Stand-in span returned by the `*_span!` macros when tracing is off.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Enter the span. The guard does nothing on drop.
    #[must_use]
    pub fn enter(&self) -> NoopGuard {
        NoopGuard
    }
}

/// Guard returned by [`NoopSpan::enter`].
#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct NoopGuard;
