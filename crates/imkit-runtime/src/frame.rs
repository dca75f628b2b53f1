//! One frame of UI construction.
//!
//! # Design Invariants
//!
//! 1. **Z-order follows call order**: hit regions are registered as panels
//!    finish, so a later panel sits above an earlier one. Draw the
//!    background first.
//! 2. **Chrome above content**: a panel registers its widgets before its
//!    title bar, close button and resize handle.
//! 3. **Closed panels cost nothing**: `begin_panel` with `open == false`
//!    neither runs the body nor touches the window.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Panel resized to zero | Dragging the handle past the origin | Size clamps at 0, content clipped away |
//! | Same title twice in a frame | Two `begin_panel` calls | Both bodies share one window and one cache |

use imkit_core::draw::DrawList;
use imkit_core::event::EventSource;
use imkit_core::geometry::{Rect, Size};
use imkit_layout::{ChromeLayout, ChromeResponse, WindowManagerState};
use imkit_widgets::{Theme, Ui};

use crate::session::UiSession;

/// Counters for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub frame_index: u64,
    /// Panels drawn (open ones only).
    pub panels: usize,
    /// Layout items appended across all scopes.
    pub widgets: usize,
    /// Identity collisions across all scopes.
    pub collisions: usize,
}

/// Result of [`Frame::finish`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub draw: DrawList,
    pub stats: FrameStats,
}

/// Exclusive borrow of a [`UiSession`] for a single frame.
pub struct Frame<'s> {
    pub(crate) session: &'s mut UiSession,
    pub(crate) events: &'s mut dyn EventSource,
    surface: Size,
    draw: DrawList,
    stats: FrameStats,
}

impl<'s> Frame<'s> {
    pub(crate) fn new(session: &'s mut UiSession, events: &'s mut dyn EventSource, surface: Size) -> Self {
        let stats = FrameStats {
            frame_index: session.frame_index,
            ..FrameStats::default()
        };
        Self {
            session,
            events,
            surface,
            draw: DrawList::new(),
            stats,
        }
    }

    #[must_use]
    pub fn surface(&self) -> Size {
        self.surface
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.session.theme
    }

    #[must_use]
    pub fn manager(&self) -> &WindowManagerState {
        &self.session.manager
    }

    #[must_use]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Draw widgets directly on the surface, beneath every panel.
    pub fn background(&mut self, body: impl FnOnce(&mut Ui<'_>)) {
        let UiSession {
            theme, background, ..
        } = &mut *self.session;
        background.begin_frame(theme);
        let items = {
            let mut ui = background.ui(&mut *self.events);
            body(&mut ui);
            ui.item_count()
        };
        let bounds = Rect::from_size(self.surface);
        let events = &mut *self.events;
        self.draw.clipped(bounds, |out| {
            background.finish(&mut *events, bounds, out);
        });
        self.stats.widgets += items;
        self.stats.collisions += background.cache().collisions().len();
    }

    /// A titled, movable, resizable, closable window.
    ///
    /// Does nothing while `*open` is false. Otherwise the window titled
    /// `title` is created on first use (at its saved geometry if the
    /// session knows one), `body` builds its widgets, and the chrome
    /// applies this frame's title-bar and resize-handle drags before the
    /// content is laid out. Clicking the close button sets `*open = false`.
    pub fn begin_panel(
        &mut self,
        title: &str,
        open: &mut bool,
        body: impl FnOnce(&mut Ui<'_>),
    ) -> Option<ChromeResponse> {
        if !*open {
            return None;
        }
        let UiSession {
            config,
            theme,
            windows,
            manager,
            saved,
            frame_index,
            ..
        } = &mut *self.session;

        let window = windows.get_or_create(title, config.retention, || {
            saved
                .get(title)
                .copied()
                .unwrap_or_else(|| config.default_geometry())
        });
        window.last_frame = *frame_index;
        window.chrome.begin_frame();
        window.ui.begin_frame(theme);

        let items = {
            let mut ui = window.ui.ui(&mut *self.events);
            body(&mut ui);
            ui.item_count()
        };

        let response = window.chrome.update(
            title,
            &mut window.geometry,
            manager,
            &mut *self.events,
            config.snap_to_integral,
        );

        let layout = ChromeLayout::new(&window.geometry, &config.chrome);
        let style = theme.chrome_style();
        let outline = config.chrome.outline_width;
        let events = &mut *self.events;
        self.draw.clipped(layout.frame, |out| {
            window.chrome.paint_back(title, &layout, &style, out);
            out.clipped(layout.content, |out| {
                window.ui.finish(&mut *events, layout.content, out);
            });
            window.chrome.paint_front(&layout, &style, outline, out);
        });
        window.chrome.register(title, &layout, events);

        if window.chrome.is_closed() {
            *open = false;
            tracing::debug!(title, "panel closed");
        }
        self.stats.panels += 1;
        self.stats.widgets += items;
        self.stats.collisions += window.ui.cache().collisions().len();
        Some(response)
    }

    /// End the frame: retire this frame's hit regions into the event
    /// source and hand back what was drawn.
    pub fn finish(self) -> FrameOutput {
        self.events.finish_frame();
        tracing::trace!(
            frame = self.stats.frame_index,
            panels = self.stats.panels,
            widgets = self.stats.widgets,
            commands = self.draw.len(),
            "frame finished"
        );
        FrameOutput {
            draw: self.draw,
            stats: self.stats,
        }
    }
}

impl std::fmt::Debug for Frame<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("surface", &self.surface)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
