#![forbid(unsafe_code)]

//! imkit public facade crate.
//!
//! Re-exports the types an application touches day to day, plus a prelude.
//! The layer crates stay reachable as [`core`], [`layout`], [`widgets`] and
//! (with the `runtime` feature) [`runtime`].
//!
//! ```
//! use imkit::prelude::*;
//!
//! let mut session = UiSession::default();
//! let mut router = PointerRouter::new();
//! let mut show_settings = true;
//! let mut volume = 0.5;
//!
//! let mut frame = session.frame(&mut router, Size::new(800.0, 600.0));
//! frame.begin_panel("Settings", &mut show_settings, |ui| {
//!     ui.slider_float("Volume", &mut volume, 0.0, 1.0);
//! });
//! let output = frame.finish();
//! assert_eq!(output.stats.panels, 1);
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use imkit_core::draw::{DrawCommand, DrawList, Rgba};
pub use imkit_core::event::{
    EditKey, EventFilter, EventKinds, EventSource, EventTarget, HitArea, InputEvent, PointerEvent,
    PointerKind,
};
pub use imkit_core::geometry::{Point, Rect, Sides, Size};
pub use imkit_core::router::PointerRouter;

// --- Layout re-exports -----------------------------------------------------

pub use imkit_layout::{ChromeMetrics, Constraints, Direction, SizeMode, WindowGeometry};

// --- Widget re-exports -----------------------------------------------------

pub use imkit_widgets::{CacheRetention, Palette, Theme, Ui, UiContext, WidgetStateCache};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use imkit_runtime::{
    ConfigError, Frame, FrameOutput, FrameStats, SessionConfig, SessionError, StateRegistry,
    StorageError, UiSession,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for imkit apps.
#[derive(Debug)]
pub enum Error {
    #[cfg(feature = "runtime")]
    Config(ConfigError),
    #[cfg(feature = "runtime")]
    Session(SessionError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            #[cfg(feature = "runtime")]
            Self::Config(ref err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Session(ref err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            #[cfg(feature = "runtime")]
            Self::Config(ref err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Session(ref err) => Some(err),
        }
    }
}

#[cfg(feature = "runtime")]
impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(feature = "runtime")]
impl From<SessionError> for Error {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

#[cfg(feature = "runtime")]
impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Session(SessionError::Storage(err))
    }
}

/// Standard result type for imkit APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DrawList, EditKey, Error, Point, PointerRouter, Rect, Result, Rgba, Sides, Size,
        SizeMode, Theme, Ui,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{Frame, SessionConfig, StateRegistry, UiSession};

    pub use crate::{core, layout, widgets};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use imkit_core as core;
pub use imkit_layout as layout;
#[cfg(feature = "runtime")]
pub use imkit_runtime as runtime;
pub use imkit_widgets as widgets;

#[cfg(all(test, feature = "runtime"))]
mod tests {
    use super::*;

    fn open_session() -> Result<UiSession> {
        let session = UiSession::new(SessionConfig::default().with_retention(CacheRetention::MaxIdleFrames(0)))?;
        Ok(session)
    }

    #[test]
    fn config_errors_convert() {
        let err = open_session().unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Retention)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn storage_errors_wrap_as_session_errors() {
        let err: Error = StorageError::Unavailable.into();
        assert_eq!(err.to_string(), "storage: storage backend unavailable");
    }
}
