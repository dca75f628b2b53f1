#![forbid(unsafe_code)]

//! Core: geometry, draw lists, input events, and pointer routing.
//!
//! Everything above this crate (layout, widgets, the session runtime) speaks
//! in these types. Nothing here paints pixels or talks to a window system;
//! the host feeds raw pointer input into a [`router::PointerRouter`] and
//! consumes the [`draw::DrawList`] a frame produces.

pub mod draw;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod router;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
