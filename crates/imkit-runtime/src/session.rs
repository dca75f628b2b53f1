//! The long-lived UI session.
//!
//! A [`UiSession`] owns everything that outlives a frame: the window
//! registry, the shared pointer trajectory, the live theme, and geometry
//! loaded from a previous run. Each frame borrows it mutably through
//! [`UiSession::frame`], so two frames can never be in flight at once.
//!
//! # Lifecycle
//!
//! ```text
//! new(config) ─► restore(&registry) ─► [ frame(..) ─► finish() ]* ─► shutdown(&mut registry)
//! ```
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Invalid config | Negative sizes, zero retention | `new` returns `ConfigError` |
//! | Corrupt stored entry | Bad JSON, old schema version | Entry skipped with `warn!`, counted in `RestoreReport::skipped` |
//! | Snapshot encode failure | Non-serializable state | `persist` returns `SessionError::Snapshot` |
//! | Storage failure on shutdown | I/O | `shutdown` returns `SessionError::Storage` |

use std::collections::{BTreeMap, HashMap};

use imkit_core::event::{EventSource, EventTarget, HitArea};
use imkit_core::geometry::Size;
use imkit_layout::{WindowGeometry, WindowManagerState};
use imkit_widgets::{Theme, UiContext};

use crate::config::{ConfigError, SessionConfig};
use crate::error::SessionError;
use crate::frame::Frame;
use crate::persistence::StateRegistry;
use crate::registry::{Window, WindowRegistry};
use crate::snapshot::{
    self, GEOMETRY_VERSION, GeometrySnapshot, THEME_KEY, THEME_VERSION, ThemeSnapshot, WINDOW_PREFIX,
};

/// Scope of widgets drawn straight onto the surface.
pub const BACKGROUND_SCOPE: &str = "##background";

/// What [`UiSession::restore`] picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestoreReport {
    /// Window geometries restored.
    pub windows: usize,
    /// Whether theme spacing was restored.
    pub theme: bool,
    /// Entries that could not be decoded.
    pub skipped: usize,
}

/// Cross-frame UI state.
#[derive(Debug)]
pub struct UiSession {
    pub(crate) config: SessionConfig,
    pub(crate) theme: Theme,
    pub(crate) windows: WindowRegistry,
    pub(crate) manager: WindowManagerState,
    pub(crate) background: UiContext,
    /// Geometry known for windows, including ones not yet drawn this run.
    pub(crate) saved: HashMap<String, WindowGeometry>,
    pub(crate) frame_index: u64,
}

impl UiSession {
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: SessionConfig) -> Self {
        Self {
            theme: config.theme,
            background: UiContext::new(BACKGROUND_SCOPE).with_retention(config.retention),
            config,
            windows: WindowRegistry::new(),
            manager: WindowManagerState::default(),
            saved: HashMap::new(),
            frame_index: 0,
        }
    }

    /// Start a frame.
    ///
    /// Surface press/drag events are folded into the shared pointer
    /// trajectory before any panel runs, and the surface capture region is
    /// registered beneath everything the frame adds.
    pub fn frame<'s>(&'s mut self, events: &'s mut dyn EventSource, surface: Size) -> Frame<'s> {
        self.frame_index += 1;
        self.manager.update(events);
        events.register(EventTarget::Surface, HitArea::Everywhere);
        Frame::new(self, events, surface)
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Live theme; changes take effect from the next panel drawn.
    pub fn theme_mut(&mut self) -> &mut Theme {
        &mut self.theme
    }

    #[must_use]
    pub fn manager(&self) -> &WindowManagerState {
        &self.manager
    }

    #[must_use]
    pub fn window(&self, title: &str) -> Option<&Window> {
        self.windows.get(title)
    }

    pub fn window_mut(&mut self, title: &str) -> Option<&mut Window> {
        self.windows.get_mut(title)
    }

    #[must_use]
    pub fn windows(&self) -> &WindowRegistry {
        &self.windows
    }

    /// Widget state of the background scope.
    #[must_use]
    pub fn background(&self) -> &UiContext {
        &self.background
    }

    /// Frames started so far.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Current geometry of `title`: live if the window exists, otherwise
    /// what was restored or recorded for it.
    #[must_use]
    pub fn saved_geometry(&self, title: &str) -> Option<WindowGeometry> {
        self.windows
            .get(title)
            .map(|w| w.geometry)
            .or_else(|| self.saved.get(title).copied())
    }

    /// Set the geometry `title` opens with, moving it if it already exists.
    pub fn record_geometry(&mut self, title: &str, geometry: WindowGeometry) {
        if let Some(window) = self.windows.get_mut(title) {
            window.geometry = geometry;
        }
        self.saved.insert(title.to_owned(), geometry);
    }

    /// Load window geometry and theme spacing from `registry`.
    ///
    /// Entries that fail to decode are skipped.
    pub fn restore(&mut self, registry: &StateRegistry) -> RestoreReport {
        let mut report = RestoreReport::default();
        for key in registry.keys_with_prefix(WINDOW_PREFIX) {
            let (Some(title), Some(entry)) = (snapshot::window_title(key), registry.get(key)) else {
                continue;
            };
            match snapshot::decode::<GeometrySnapshot>(entry, GEOMETRY_VERSION) {
                Ok(snap) => {
                    self.record_geometry(title, snap.into());
                    report.windows += 1;
                }
                Err(e) => {
                    tracing::warn!(key, error = %e, "skipping stored window geometry");
                    report.skipped += 1;
                }
            }
        }
        if let Some(entry) = registry.get(THEME_KEY) {
            match snapshot::decode::<ThemeSnapshot>(entry, THEME_VERSION) {
                Ok(snap) => {
                    snap.apply(&mut self.theme);
                    report.theme = true;
                }
                Err(e) => {
                    tracing::warn!(key = THEME_KEY, error = %e, "skipping stored theme spacing");
                    report.skipped += 1;
                }
            }
        }
        tracing::info!(
            backend = registry.backend_name(),
            windows = report.windows,
            theme = report.theme,
            skipped = report.skipped,
            "session restored"
        );
        report
    }

    /// Write every known window geometry and the theme spacing into
    /// `registry`. Does not flush.
    ///
    /// Returns the number of entries written.
    pub fn persist(&self, registry: &mut StateRegistry) -> Result<usize, SessionError> {
        let mut geometries: BTreeMap<&str, WindowGeometry> =
            self.saved.iter().map(|(t, g)| (t.as_str(), *g)).collect();
        for window in self.windows.iter() {
            geometries.insert(window.title(), window.geometry);
        }

        let mut written = 0;
        for (title, geometry) in geometries {
            let key = snapshot::window_key(title);
            let data = snapshot::encode(&key, &GeometrySnapshot::from(geometry))?;
            registry.set(key, GEOMETRY_VERSION, data);
            written += 1;
        }
        let data = snapshot::encode(THEME_KEY, &ThemeSnapshot::capture(&self.theme))?;
        registry.set(THEME_KEY, THEME_VERSION, data);
        written += 1;

        tracing::debug!(entries = written, "session state persisted");
        Ok(written)
    }

    /// Persist and flush. Returns whether anything reached the backend.
    pub fn shutdown(self, registry: &mut StateRegistry) -> Result<bool, SessionError> {
        self.persist(registry)?;
        let wrote = registry.flush()?;
        tracing::info!(
            frames = self.frame_index,
            windows = self.windows.len(),
            wrote,
            "session shut down"
        );
        Ok(wrote)
    }
}

impl Default for UiSession {
    fn default() -> Self {
        Self::from_valid(SessionConfig::default())
    }
}
