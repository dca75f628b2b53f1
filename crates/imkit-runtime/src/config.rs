//! Session configuration.
//!
//! ```
//! use imkit_runtime::SessionConfig;
//! use imkit_core::geometry::Size;
//!
//! let config = SessionConfig::default()
//!     .with_default_window_size(Size::new(320.0, 240.0))
//!     .with_snap_to_integral(false);
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;

use imkit_core::geometry::{Point, Size};
use imkit_layout::{ChromeMetrics, WindowGeometry};
use imkit_widgets::{CacheRetention, Theme};

/// Everything a [`UiSession`](crate::UiSession) needs up front.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Size of a window seen for the first time.
    pub default_window_size: Size,
    /// Position of a window seen for the first time.
    pub default_window_position: Point,
    pub chrome: ChromeMetrics,
    /// Truncate resized extents to whole units.
    pub snap_to_integral: bool,
    /// Eviction policy of every window's widget cache.
    pub retention: CacheRetention,
    /// Theme the session starts with; the theme editor changes the live copy.
    pub theme: Theme,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_window_size: Size::new(500.0, 400.0),
            default_window_position: Point::ZERO,
            chrome: ChromeMetrics::default(),
            snap_to_integral: true,
            retention: CacheRetention::default(),
            theme: Theme::default(),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn with_default_window_size(mut self, size: Size) -> Self {
        self.default_window_size = size;
        self
    }

    #[must_use]
    pub fn with_default_window_position(mut self, position: Point) -> Self {
        self.default_window_position = position;
        self
    }

    #[must_use]
    pub fn with_chrome(mut self, chrome: ChromeMetrics) -> Self {
        self.chrome = chrome;
        self
    }

    #[must_use]
    pub fn with_snap_to_integral(mut self, snap: bool) -> Self {
        self.snap_to_integral = snap;
        self
    }

    #[must_use]
    pub fn with_retention(mut self, retention: CacheRetention) -> Self {
        self.retention = retention;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Geometry of a window that has no saved state.
    #[must_use]
    pub fn default_geometry(&self) -> WindowGeometry {
        WindowGeometry::new(self.default_window_position, self.default_window_size)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.default_window_size;
        if !(size.width.is_finite() && size.height.is_finite()) || size.width < 0.0 || size.height < 0.0 {
            return Err(ConfigError::WindowSize(size));
        }
        let metrics = [
            ("title_bar_height", self.chrome.title_bar_height),
            ("resize_handle", self.chrome.resize_handle),
            ("close_button_width", self.chrome.close_button_width),
            ("outline_width", self.chrome.outline_width),
        ];
        for (name, value) in metrics {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ChromeMetric { name, value });
            }
        }
        if self.retention == CacheRetention::MaxIdleFrames(0) {
            return Err(ConfigError::Retention);
        }
        Ok(())
    }
}

/// Rejected [`SessionConfig`] values.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Default window size is negative or not finite.
    WindowSize(Size),
    ChromeMetric { name: &'static str, value: f32 },
    /// `MaxIdleFrames(0)` would evict widgets the frame after creating them.
    Retention,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WindowSize(s) => write!(f, "invalid default window size {}x{}", s.width, s.height),
            Self::ChromeMetric { name, value } => write!(f, "invalid chrome metric {name} = {value}"),
            Self::Retention => write!(f, "cache retention must keep widgets at least one idle frame"),
        }
    }
}

impl std::error::Error for ConfigError {}
