//! Per-scope UI state and the per-frame widget handle.
//!
//! A [`UiContext`] belongs to one scope (a window, or the background) and
//! lives for the whole session: it owns the scope's [`WidgetStateCache`] and
//! its [`LayoutAccumulator`]. Each frame the owner calls
//! [`begin_frame`](UiContext::begin_frame), hands widget code a [`Ui`], and
//! closes with [`finish`](UiContext::finish), which lays everything out,
//! renders into the frame's draw list, and registers widget hit regions for
//! the next frame's routing.

use imkit_core::draw::DrawList;
use imkit_core::event::{
    EventFilter, EventKinds, EventSource, EventTarget, HitArea, InputEvent, drain_events,
};
use imkit_core::geometry::{Rect, Size};
use imkit_layout::{Arranged, Constraints, LayoutAccumulator, SizeMode};

use crate::cache::{CacheRetention, WidgetStateCache};
use crate::theme::Theme;

/// Long-lived state of one UI scope.
#[derive(Debug)]
pub struct UiContext {
    scope: String,
    cache: WidgetStateCache,
    layout: LayoutAccumulator<WidgetStateCache>,
    theme: Theme,
}

impl UiContext {
    #[must_use]
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            cache: WidgetStateCache::new(),
            layout: LayoutAccumulator::default(),
            theme: Theme::default(),
        }
    }

    #[must_use]
    pub fn with_retention(mut self, retention: CacheRetention) -> Self {
        self.cache.set_retention(retention);
        self
    }

    /// Scope name used in widget event targets.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    #[must_use]
    pub fn cache(&self) -> &WidgetStateCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut WidgetStateCache {
        &mut self.cache
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Drop last frame's layout and start a new cache generation with
    /// `theme` in effect.
    pub fn begin_frame(&mut self, theme: &Theme) {
        self.layout.reset();
        self.cache.begin_frame();
        self.theme = *theme;
    }

    /// Widget handle for this frame.
    pub fn ui<'a>(&'a mut self, events: &'a mut dyn EventSource) -> Ui<'a> {
        Ui { cx: self, events }
    }

    /// Lay out and render the frame's widgets inside `bounds`.
    ///
    /// The theme's content inset is applied inside `bounds`. Keyed widgets
    /// get their rectangle stored in the cache and registered as hit
    /// regions, clipped to `bounds`.
    pub fn finish(
        &mut self,
        events: &mut dyn EventSource,
        bounds: Rect,
        out: &mut DrawList,
    ) -> Arranged {
        let content = bounds.inner(self.theme.content_inset);
        let arranged = self.layout.finalize(
            &mut self.cache,
            content.origin(),
            Constraints::loose(content.size()),
            out,
        );
        for placement in &arranged.placements {
            self.cache.set_rect(&placement.key, placement.rect);
            let visible = placement.rect.intersection(&bounds);
            if !visible.size().is_empty() {
                events.register(
                    EventTarget::widget(self.scope.as_str(), placement.key.as_str()),
                    HitArea::Rect(visible),
                );
            }
        }
        arranged
    }
}

/// Widget-building handle for one scope and one frame.
pub struct Ui<'a> {
    cx: &'a mut UiContext,
    events: &'a mut dyn EventSource,
}

impl<'a> Ui<'a> {
    pub fn new(cx: &'a mut UiContext, events: &'a mut dyn EventSource) -> Self {
        Self { cx, events }
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.cx.theme
    }

    #[must_use]
    pub fn scope(&self) -> &str {
        &self.cx.scope
    }

    pub fn cache(&mut self) -> &mut WidgetStateCache {
        &mut self.cx.cache
    }

    /// Event target of the widget with identity `key` in this scope.
    #[must_use]
    pub fn target(&self, key: &str) -> EventTarget {
        EventTarget::widget(self.cx.scope.as_str(), key)
    }

    /// Drain this frame's events for widget `key`.
    pub fn drain(&mut self, key: &str, kinds: EventKinds) -> Vec<InputEvent> {
        let filter = EventFilter::new(self.target(key), kinds);
        drain_events(&mut *self.events, &filter)
    }

    /// Append a render op, wrapped in the theme's widget inset. With a key,
    /// the widget's rectangle becomes a hit region and is remembered in the
    /// cache entry of the same key.
    pub fn add_widget<F>(&mut self, key: Option<String>, render: F)
    where
        F: FnOnce(&mut WidgetStateCache, &mut DrawList, Constraints) -> Size + 'static,
    {
        let inset = self.cx.theme.widget_inset;
        let wrapped = move |cache: &mut WidgetStateCache, out: &mut DrawList, c: Constraints| {
            let mut inner = DrawList::new();
            let size = render(cache, &mut inner, c.deflate(inset));
            out.append_translated(inner, inset.top_left());
            Size::new(size.width + inset.horizontal(), size.height + inset.vertical())
        };
        match key {
            Some(key) => self.cx.layout.append_keyed(key, wrapped),
            None => self.cx.layout.append(wrapped),
        }
    }

    /// Put the next widget on the same row as the previous one.
    pub fn same_line(&mut self) {
        self.cx.layout.same_line();
    }

    /// Lay out everything `body` adds on one row.
    pub fn with_same_line<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        let scope = self.cx.layout.begin_same_line();
        let out = body(self);
        self.cx.layout.end_same_line(scope);
        out
    }

    /// Force `mode` for the widgets `body` adds.
    pub fn with_sizing_mode<R>(&mut self, mode: SizeMode, body: impl FnOnce(&mut Self) -> R) -> R {
        let scope = self.cx.layout.begin_sizing_mode(mode);
        let out = body(self);
        self.cx.layout.end_sizing_mode(scope);
        out
    }

    /// Items appended so far this frame.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.cx.layout.item_count()
    }
}

impl std::fmt::Debug for Ui<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ui")
            .field("scope", &self.cx.scope)
            .field("items", &self.cx.layout.item_count())
            .finish_non_exhaustive()
    }
}
