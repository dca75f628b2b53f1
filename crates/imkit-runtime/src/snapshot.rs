//! Serializable forms of session state and their registry keys.
//!
//! Layout and widget types stay free of serde; these mirror types are what
//! actually reaches storage.

use imkit_core::geometry::{Point, Sides, Size};
use imkit_layout::WindowGeometry;
use imkit_widgets::Theme;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::persistence::StoredEntry;

/// Prefix of per-window geometry keys.
pub const WINDOW_PREFIX: &str = "window::";
/// Key of the theme spacing entry.
pub const THEME_KEY: &str = "theme::spacing";

pub const GEOMETRY_VERSION: u32 = 1;
pub const THEME_VERSION: u32 = 1;

#[must_use]
pub fn window_key(title: &str) -> String {
    format!("{WINDOW_PREFIX}{title}")
}

/// Title encoded in a window key, if `key` is one.
#[must_use]
pub fn window_title(key: &str) -> Option<&str> {
    key.strip_prefix(WINDOW_PREFIX)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometrySnapshot {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<WindowGeometry> for GeometrySnapshot {
    fn from(g: WindowGeometry) -> Self {
        Self {
            x: g.position.x,
            y: g.position.y,
            width: g.size.width,
            height: g.size.height,
        }
    }
}

impl From<GeometrySnapshot> for WindowGeometry {
    fn from(s: GeometrySnapshot) -> Self {
        // Stored sizes are trusted no more than dragged ones.
        WindowGeometry::new(
            Point::new(s.x, s.y),
            Size::new(s.width, s.height).clamp_non_negative(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsetSnapshot {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl From<Sides> for InsetSnapshot {
    fn from(s: Sides) -> Self {
        Self {
            top: s.top,
            right: s.right,
            bottom: s.bottom,
            left: s.left,
        }
    }
}

impl From<InsetSnapshot> for Sides {
    fn from(s: InsetSnapshot) -> Self {
        Sides::new(s.top, s.right, s.bottom, s.left)
    }
}

/// The theme spacing the theme editor can change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThemeSnapshot {
    pub button_inset: InsetSnapshot,
    pub widget_inset: InsetSnapshot,
}

impl ThemeSnapshot {
    #[must_use]
    pub fn capture(theme: &Theme) -> Self {
        Self {
            button_inset: theme.button_inset.into(),
            widget_inset: theme.widget_inset.into(),
        }
    }

    pub fn apply(&self, theme: &mut Theme) {
        theme.button_inset = self.button_inset.into();
        theme.widget_inset = self.widget_inset.into();
    }
}

pub(crate) fn encode<T: Serialize>(key: &str, value: &T) -> Result<Vec<u8>, SessionError> {
    serde_json::to_vec(value).map_err(|source| SessionError::Snapshot {
        key: key.to_owned(),
        source,
    })
}

/// Decode `entry`, rejecting payloads written under another schema version.
pub(crate) fn decode<T: DeserializeOwned>(entry: &StoredEntry, version: u32) -> Result<T, SessionError> {
    if entry.version != version {
        return Err(SessionError::Version {
            key: entry.key.clone(),
            stored: entry.version,
            expected: version,
        });
    }
    serde_json::from_slice(&entry.data).map_err(|source| SessionError::Snapshot {
        key: entry.key.clone(),
        source,
    })
}
