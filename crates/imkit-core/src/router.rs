#![forbid(unsafe_code)]

//! In-process pointer router.
//!
//! [`PointerRouter`] is the reference [`EventSource`]. Hosts feed it raw
//! pointer positions and edit keys; it turns them into targeted events using
//! the hit areas registered during the last completed frame.
//!
//! # Routing rules
//!
//! | Input | Delivered to |
//! |-------|--------------|
//! | press | the surface capture (if registered) and the topmost region under the pointer |
//! | drag | every target grabbed by the last press |
//! | release | grabbed targets whose area still contains the pointer, plus the surface |
//! | edit key | the focused widget (the last widget pressed) |
//!
//! Registration order is z-order: a region registered later sits above the
//! ones registered before it.
//!
//! # Failure Modes
//!
//! | Situation | Behavior |
//! |-----------|----------|
//! | Press outside every region | Only the surface sees it; focus is cleared |
//! | Drag with nothing grabbed | Dropped |
//! | Events nobody drains | Discarded at [`finish_frame`](EventSource::finish_frame) |

use std::collections::VecDeque;

use crate::event::{
    EditKey, EventFilter, EventSource, EventTarget, HitArea, InputEvent, PointerEvent, PointerKind,
};
use crate::geometry::Point;

/// Hit-testing event router with pointer grab and keyboard focus.
#[derive(Debug, Default)]
pub struct PointerRouter {
    queue: VecDeque<(EventTarget, InputEvent)>,
    /// Regions registered by the frame in progress.
    pending: Vec<(EventTarget, HitArea)>,
    /// Regions of the last completed frame; used for hit testing.
    regions: Vec<(EventTarget, HitArea)>,
    grabbed: Vec<EventTarget>,
    focus: Option<EventTarget>,
}

impl PointerRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer went down at `position`.
    pub fn press(&mut self, position: Point) {
        let event = PointerEvent::new(PointerKind::Press, position);
        self.grabbed.clear();
        if self.has_region(&EventTarget::Surface) {
            self.grabbed.push(EventTarget::Surface);
        }
        let hit = self.hit_test(position).cloned();
        match hit {
            Some(target) => {
                self.focus = target.is_widget().then(|| target.clone());
                self.grabbed.push(target);
            }
            None => self.focus = None,
        }
        for target in self.grabbed.clone() {
            self.queue.push_back((target, InputEvent::Pointer(event)));
        }
    }

    /// Pointer moved while held.
    pub fn drag(&mut self, position: Point) {
        let event = InputEvent::Pointer(PointerEvent::new(PointerKind::Drag, position));
        for target in &self.grabbed {
            self.queue.push_back((target.clone(), event.clone()));
        }
    }

    /// Pointer came up at `position`. Ends the grab.
    pub fn release(&mut self, position: Point) {
        let event = InputEvent::Pointer(PointerEvent::new(PointerKind::Release, position));
        for target in std::mem::take(&mut self.grabbed) {
            let inside = target == EventTarget::Surface
                || self
                    .regions
                    .iter()
                    .any(|(t, area)| *t == target && area.contains(position));
            if inside {
                self.queue.push_back((target, event.clone()));
            }
        }
    }

    /// A text-editing key. Dropped when no widget has focus.
    pub fn key(&mut self, key: EditKey) {
        if let Some(target) = &self.focus {
            self.queue.push_back((target.clone(), InputEvent::Edit(key)));
        }
    }

    /// Deliver `event` straight to `target`, bypassing hit testing.
    pub fn push(&mut self, target: EventTarget, event: InputEvent) {
        self.queue.push_back((target, event));
    }

    /// Give keyboard focus to `target` (or clear it).
    pub fn set_focus(&mut self, target: Option<EventTarget>) {
        self.focus = target;
    }

    #[must_use]
    pub fn focus(&self) -> Option<&EventTarget> {
        self.focus.as_ref()
    }

    /// Number of undelivered events.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Topmost non-surface region containing `position`.
    #[must_use]
    pub fn hit_test(&self, position: Point) -> Option<&EventTarget> {
        self.regions
            .iter()
            .rev()
            .filter(|(t, _)| *t != EventTarget::Surface)
            .find(|(_, area)| area.contains(position))
            .map(|(t, _)| t)
    }

    fn has_region(&self, target: &EventTarget) -> bool {
        self.regions.iter().any(|(t, _)| t == target)
    }
}

impl EventSource for PointerRouter {
    fn next_event(&mut self, filter: &EventFilter) -> Option<InputEvent> {
        let idx = self
            .queue
            .iter()
            .position(|(target, event)| filter.matches(target, event))?;
        self.queue.remove(idx).map(|(_, event)| event)
    }

    fn register(&mut self, target: EventTarget, area: HitArea) {
        self.pending.push((target, area));
    }

    fn finish_frame(&mut self) {
        if !self.queue.is_empty() {
            crate::trace!(dropped = self.queue.len(), "discarding undrained events");
            self.queue.clear();
        }
        self.regions = std::mem::take(&mut self.pending);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKinds, drain_events};
    use crate::geometry::Rect;

    fn router_with(regions: &[(EventTarget, HitArea)]) -> PointerRouter {
        let mut r = PointerRouter::new();
        for (t, a) in regions {
            r.register(t.clone(), *a);
        }
        r.finish_frame();
        r
    }

    fn all(target: EventTarget) -> EventFilter {
        EventFilter::new(target, EventKinds::all())
    }

    #[test]
    fn press_reaches_surface_and_topmost_region() {
        let lower = EventTarget::TitleBar("a".into());
        let upper = EventTarget::TitleBar("b".into());
        let mut r = router_with(&[
            (EventTarget::Surface, HitArea::Everywhere),
            (lower.clone(), HitArea::Rect(Rect::new(0.0, 0.0, 100.0, 100.0))),
            (upper.clone(), HitArea::Rect(Rect::new(50.0, 50.0, 100.0, 100.0))),
        ]);
        r.press(Point::new(60.0, 60.0));
        assert_eq!(drain_events(&mut r, &all(EventTarget::Surface)).len(), 1);
        assert_eq!(drain_events(&mut r, &all(upper)).len(), 1);
        assert!(drain_events(&mut r, &all(lower)).is_empty());
    }

    #[test]
    fn drag_follows_grab_outside_region() {
        let bar = EventTarget::TitleBar("w".into());
        let mut r = router_with(&[(bar.clone(), HitArea::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)))]);
        r.press(Point::new(5.0, 5.0));
        r.drag(Point::new(500.0, 500.0));
        let events = drain_events(&mut r, &all(bar));
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1].as_pointer().map(|p| p.position),
            Some(Point::new(500.0, 500.0))
        );
    }

    #[test]
    fn release_outside_is_not_a_click() {
        let close = EventTarget::CloseButton("w".into());
        let mut r = router_with(&[(close.clone(), HitArea::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)))]);
        r.press(Point::new(5.0, 5.0));
        r.release(Point::new(50.0, 5.0));
        let filter = EventFilter::new(close, EventKinds::RELEASE);
        assert!(r.next_event(&filter).is_none());
    }

    #[test]
    fn keys_go_to_focused_widget() {
        let field = EventTarget::widget("w", "nameinputtext");
        let mut r = router_with(&[(field.clone(), HitArea::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)))]);
        r.key(EditKey::Insert("lost".into()));
        assert_eq!(r.pending_events(), 0);

        r.press(Point::new(1.0, 1.0));
        r.key(EditKey::Insert("x".into()));
        let edits = drain_events(&mut r, &EventFilter::new(field, EventKinds::EDIT));
        assert_eq!(edits, vec![InputEvent::Edit(EditKey::Insert("x".into()))]);
    }

    #[test]
    fn finish_frame_swaps_regions_and_drops_leftovers() {
        let mut r = PointerRouter::new();
        r.push(EventTarget::Surface, InputEvent::Edit(EditKey::Home));
        r.register(EventTarget::Surface, HitArea::Everywhere);
        assert!(r.hit_test(Point::ZERO).is_none());
        r.finish_frame();
        assert_eq!(r.pending_events(), 0);
        r.press(Point::ZERO);
        assert_eq!(r.pending_events(), 1);
    }
}
