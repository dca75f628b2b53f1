//! Windows by title.
//!
//! The title is a window's identity: the first `begin_panel` with a title
//! creates the window, every later one (including after a close and reopen)
//! resumes it with its geometry and widget cache intact.

use std::collections::HashMap;

use imkit_layout::{WindowChrome, WindowGeometry};
use imkit_widgets::{CacheRetention, UiContext};

/// One titled window and everything it keeps between frames.
#[derive(Debug)]
pub struct Window {
    title: String,
    pub geometry: WindowGeometry,
    pub chrome: WindowChrome,
    pub ui: UiContext,
    /// Session frame in which the window was last drawn.
    pub last_frame: u64,
}

impl Window {
    #[must_use]
    pub fn new(title: impl Into<String>, geometry: WindowGeometry, retention: CacheRetention) -> Self {
        let title = title.into();
        Self {
            ui: UiContext::new(title.clone()).with_retention(retention),
            title,
            geometry,
            chrome: WindowChrome::new(),
            last_frame: 0,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Every window the session has created, in creation order.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: HashMap<String, Window>,
    order: Vec<String>,
}

impl WindowRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The window titled `title`, created with `geometry()` if absent.
    pub fn get_or_create(
        &mut self,
        title: &str,
        retention: CacheRetention,
        geometry: impl FnOnce() -> WindowGeometry,
    ) -> &mut Window {
        let order = &mut self.order;
        self.windows.entry(title.to_owned()).or_insert_with(|| {
            let g = geometry();
            tracing::debug!(title, x = g.position.x, y = g.position.y, "window created");
            order.push(title.to_owned());
            Window::new(title, g, retention)
        })
    }

    #[must_use]
    pub fn get(&self, title: &str) -> Option<&Window> {
        self.windows.get(title)
    }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut Window> {
        self.windows.get_mut(title)
    }

    #[must_use]
    pub fn contains(&self, title: &str) -> bool {
        self.windows.contains_key(title)
    }

    /// Windows in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Window> {
        self.order.iter().filter_map(|t| self.windows.get(t))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imkit_core::geometry::{Point, Size};

    fn geom(x: f32) -> WindowGeometry {
        WindowGeometry::new(Point::new(x, 0.0), Size::new(10.0, 10.0))
    }

    #[test]
    fn title_is_identity() {
        let mut reg = WindowRegistry::new();
        reg.get_or_create("A", CacheRetention::KeepAll, || geom(1.0)).geometry.position.y = 9.0;
        let again = reg.get_or_create("A", CacheRetention::KeepAll, || geom(50.0));
        assert_eq!(again.geometry.position, Point::new(1.0, 9.0));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn iteration_follows_creation_order() {
        let mut reg = WindowRegistry::new();
        for t in ["b", "a", "c", "a"] {
            reg.get_or_create(t, CacheRetention::KeepAll, || geom(0.0));
        }
        let titles: Vec<_> = reg.iter().map(Window::title).collect();
        assert_eq!(titles, ["b", "a", "c"]);
    }

    #[test]
    fn window_scope_is_its_title() {
        let w = Window::new("Tools", geom(0.0), CacheRetention::KeepAll);
        assert_eq!(w.ui.scope(), "Tools");
    }
}
