#![forbid(unsafe_code)]

//! Session runtime: windows, frames, configuration and persistence.
//!
//! The runtime ties the lower layers together. A [`UiSession`] lives for
//! the whole program; every frame borrows it as a [`Frame`], opens panels
//! with [`Frame::begin_panel`], and ends with [`Frame::finish`], which
//! returns the frame's draw list. Window geometry and theme spacing survive
//! restarts through a [`StateRegistry`].
//!
//! ```
//! use imkit_core::geometry::Size;
//! use imkit_core::router::PointerRouter;
//! use imkit_runtime::{SessionConfig, UiSession};
//!
//! let mut session = UiSession::new(SessionConfig::default()).unwrap();
//! let mut router = PointerRouter::new();
//! let mut open = true;
//! let mut clicks = 0;
//!
//! let mut frame = session.frame(&mut router, Size::new(1280.0, 720.0));
//! frame.begin_panel("Hello", &mut open, |ui| {
//!     ui.text("Hello, world");
//!     if ui.button("Count") {
//!         clicks += 1;
//!     }
//! });
//! let output = frame.finish();
//! assert_eq!(output.stats.panels, 1);
//! assert!(!output.draw.is_empty());
//! ```

pub mod config;
pub mod error;
pub mod frame;
pub mod persistence;
pub mod registry;
pub mod session;
pub mod snapshot;
pub mod theme_editor;

pub use config::{ConfigError, SessionConfig};
pub use error::SessionError;
pub use frame::{Frame, FrameOutput, FrameStats};
#[cfg(feature = "state-persistence")]
pub use persistence::FileStorage;
pub use persistence::{
    MemoryStorage, RegistryStats, StateRegistry, StorageBackend, StorageError, StorageResult,
    StoredEntry,
};
pub use registry::{Window, WindowRegistry};
pub use session::{BACKGROUND_SCOPE, RestoreReport, UiSession};
pub use snapshot::{GeometrySnapshot, InsetSnapshot, ThemeSnapshot};
pub use theme_editor::THEME_EDITOR_TITLE;
