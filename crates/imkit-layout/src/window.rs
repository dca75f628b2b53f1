#![forbid(unsafe_code)]

//! Window geometry and the drag/resize coordinator.
//!
//! Every drag in the system is measured against one canonical pointer
//! trajectory, the [`WindowManagerState`]: the position of the last press
//! anywhere on the surface and the current pointer position. A window's
//! title bar and resize handle each keep a [`DragSession`] snapshot taken at
//! their own press; each drag then sets
//!
//! ```text
//! position = session.reference_position + (current - last_press)
//! size     = session.reference_extent   + (current - last_press)   clamped >= 0
//! ```
//!
//! so repeated drag events within a frame are idempotent and the result does
//! not depend on how many intermediate moves the host reported.
//!
//! # State Machine
//!
//! ```text
//! Idle --press(target)--> session snapshot --drag*--> geometry updates
//!   ^                                                  |
//!   +------------------------ release -----------------+
//! ```
//!
//! A drag that arrives with no prior press uses the default (zero) session;
//! geometry jumps to the raw delta. That input sequence is already invalid
//! and the jump is harmless.
//!
//! # Failure Modes
//!
//! | Situation | Behavior |
//! |-----------|----------|
//! | Resize below zero | Each axis clamped at 0 |
//! | Drag without press | Zero-session result, no error |

use imkit_core::draw::{DrawList, Rgba};
use imkit_core::event::{
    EventFilter, EventKinds, EventSource, EventTarget, HitArea, InputEvent, PointerKind,
};
use imkit_core::geometry::{Point, Rect, Size};

/// Position and extent of a window on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowGeometry {
    pub position: Point,
    pub size: Size,
}

impl WindowGeometry {
    #[must_use]
    pub const fn new(position: Point, size: Size) -> Self {
        Self { position, size }
    }

    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }
}

/// Chrome dimensions shared by every window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromeMetrics {
    pub title_bar_height: f32,
    /// Leg length of the bottom-right resize triangle.
    pub resize_handle: f32,
    pub close_button_width: f32,
    pub outline_width: f32,
}

impl Default for ChromeMetrics {
    fn default() -> Self {
        Self {
            title_bar_height: 35.0,
            resize_handle: 40.0,
            close_button_width: 35.0,
            outline_width: 1.0,
        }
    }
}

/// Colours and text metrics for painting chrome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromeStyle {
    pub background: Rgba,
    pub title_bar: Rgba,
    pub title_text: Rgba,
    pub outline: Rgba,
    pub resize_handle: Rgba,
    pub text_size: f32,
    pub line_height: f32,
    pub char_width: f32,
}

/// Chrome rectangles derived from a geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromeLayout {
    pub frame: Rect,
    pub title_bar: Rect,
    pub close_button: Rect,
    pub resize_handle: [Point; 3],
    /// Area left for the window's widgets.
    pub content: Rect,
}

impl ChromeLayout {
    #[must_use]
    pub fn new(geometry: &WindowGeometry, metrics: &ChromeMetrics) -> Self {
        let frame = geometry.rect();
        let bar_h = metrics.title_bar_height.min(frame.height);
        let title_bar = Rect::new(frame.x, frame.y, frame.width, bar_h);
        let close_w = metrics.close_button_width.min(frame.width);
        let close_button = Rect::new(frame.right() - close_w, frame.y, close_w, bar_h);
        let (r, b, h) = (frame.right(), frame.bottom(), metrics.resize_handle);
        let resize_handle = [Point::new(r, b), Point::new(r, b - h), Point::new(r - h, b)];
        let content = Rect::new(
            frame.x,
            frame.y + bar_h,
            frame.width,
            (frame.height - bar_h).max(0.0),
        );
        Self {
            frame,
            title_bar,
            close_button,
            resize_handle,
            content,
        }
    }
}

/// Canonical pointer trajectory shared by every window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowManagerState {
    last_press: Point,
    current: Point,
}

impl WindowManagerState {
    /// Drain all surface-capture press/drag events, in order.
    pub fn update(&mut self, events: &mut dyn EventSource) {
        let filter = EventFilter::new(EventTarget::Surface, EventKinds::PRESS | EventKinds::DRAG);
        while let Some(event) = events.next_event(&filter) {
            let Some(p) = event.as_pointer() else { continue };
            match p.kind {
                PointerKind::Press => {
                    self.last_press = p.position;
                    self.current = p.position;
                }
                PointerKind::Drag => self.current = p.position,
                PointerKind::Release => {}
            }
        }
    }

    #[must_use]
    pub const fn last_press(&self) -> Point {
        self.last_press
    }

    #[must_use]
    pub const fn current(&self) -> Point {
        self.current
    }

    /// Displacement since the last press.
    #[must_use]
    pub fn delta(&self) -> Point {
        self.current - self.last_press
    }
}

/// Geometry snapshot taken when a drag target is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragSession {
    pub reference_position: Point,
    pub reference_extent: Size,
}

/// What [`WindowChrome::update`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChromeResponse {
    pub moved: bool,
    pub resized: bool,
    pub close_clicked: bool,
}

/// Per-window drag/resize/close coordinator.
#[derive(Debug, Clone, Default)]
pub struct WindowChrome {
    title_session: DragSession,
    resize_session: DragSession,
    closed: bool,
}

impl WindowChrome {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget last frame's close click.
    pub fn begin_frame(&mut self) {
        self.closed = false;
    }

    /// True once the close button was clicked this frame.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    #[must_use]
    pub const fn title_session(&self) -> DragSession {
        self.title_session
    }

    #[must_use]
    pub const fn resize_session(&self) -> DragSession {
        self.resize_session
    }

    /// Drain the close button, resize handle and title bar of window `title`
    /// and apply them to `geometry`.
    pub fn update(
        &mut self,
        title: &str,
        geometry: &mut WindowGeometry,
        manager: &WindowManagerState,
        events: &mut dyn EventSource,
        snap_to_integral: bool,
    ) -> ChromeResponse {
        let mut response = ChromeResponse::default();
        let drag_kinds = EventKinds::PRESS | EventKinds::DRAG;

        let close = EventFilter::new(EventTarget::CloseButton(title.to_owned()), EventKinds::RELEASE);
        while events.next_event(&close).is_some() {
            self.closed = true;
            response.close_clicked = true;
        }

        let resize = EventFilter::new(EventTarget::ResizeHandle(title.to_owned()), drag_kinds);
        while let Some(event) = events.next_event(&resize) {
            match pointer_kind(&event) {
                Some(PointerKind::Press) => self.resize_session = snapshot(geometry),
                Some(PointerKind::Drag) => {
                    let mut size = self
                        .resize_session
                        .reference_extent
                        .offset_by(manager.delta())
                        .clamp_non_negative();
                    if snap_to_integral {
                        size = size.trunc();
                    }
                    geometry.size = size;
                    response.resized = true;
                }
                _ => {}
            }
        }

        let bar = EventFilter::new(EventTarget::TitleBar(title.to_owned()), drag_kinds);
        while let Some(event) = events.next_event(&bar) {
            match pointer_kind(&event) {
                Some(PointerKind::Press) => self.title_session = snapshot(geometry),
                Some(PointerKind::Drag) => {
                    geometry.position = self.title_session.reference_position + manager.delta();
                    response.moved = true;
                }
                _ => {}
            }
        }

        response
    }

    /// Register this window's chrome regions. Call after the window's
    /// content so the close button and resize handle sit on top.
    pub fn register(&self, title: &str, layout: &ChromeLayout, events: &mut dyn EventSource) {
        events.register(EventTarget::TitleBar(title.to_owned()), HitArea::Rect(layout.title_bar));
        events.register(
            EventTarget::CloseButton(title.to_owned()),
            HitArea::Rect(layout.close_button),
        );
        events.register(
            EventTarget::ResizeHandle(title.to_owned()),
            HitArea::Triangle(layout.resize_handle),
        );
    }

    /// Paint the window background and title bar.
    pub fn paint_back(&self, title: &str, layout: &ChromeLayout, style: &ChromeStyle, out: &mut DrawList) {
        out.fill(layout.frame, style.background);
        out.fill(layout.title_bar, style.title_bar);
        let pad_y = ((layout.title_bar.height - style.line_height) / 2.0).max(0.0);
        out.text(
            Point::new(layout.title_bar.x + style.char_width, layout.title_bar.y + pad_y),
            title,
            style.title_text,
            style.text_size,
        );
        let close = layout.close_button;
        out.text(
            Point::new(
                close.x + ((close.width - style.char_width) / 2.0).max(0.0),
                close.y + pad_y,
            ),
            "X",
            style.title_text,
            style.text_size,
        );
    }

    /// Paint the resize handle and outline over the content.
    pub fn paint_front(&self, layout: &ChromeLayout, style: &ChromeStyle, width: f32, out: &mut DrawList) {
        out.triangle(layout.resize_handle, style.resize_handle);
        out.outline(layout.frame, style.outline, width);
    }
}

fn pointer_kind(event: &InputEvent) -> Option<PointerKind> {
    event.as_pointer().map(|p| p.kind)
}

fn snapshot(geometry: &WindowGeometry) -> DragSession {
    DragSession {
        reference_position: geometry.position,
        reference_extent: geometry.size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imkit_core::event::PointerEvent;
    use imkit_core::router::PointerRouter;

    fn ptr(kind: PointerKind, x: f32, y: f32) -> InputEvent {
        InputEvent::Pointer(PointerEvent::new(kind, Point::new(x, y)))
    }

    /// Feed the same pointer event to the surface and to `target`, the way
    /// the router does for a grabbed target.
    fn both(router: &mut PointerRouter, target: &EventTarget, event: InputEvent) {
        router.push(EventTarget::Surface, event.clone());
        router.push(target.clone(), event);
    }

    #[test]
    fn title_drag_moves_by_trajectory_delta() {
        let bar = EventTarget::TitleBar("w".into());
        let mut events = PointerRouter::new();
        both(&mut events, &bar, ptr(PointerKind::Press, 10.0, 10.0));
        both(&mut events, &bar, ptr(PointerKind::Drag, 15.0, 10.0));
        both(&mut events, &bar, ptr(PointerKind::Drag, 15.0, 14.0));

        let mut manager = WindowManagerState::default();
        manager.update(&mut events);
        let mut geometry = WindowGeometry::new(Point::ZERO, Size::new(500.0, 400.0));
        let mut chrome = WindowChrome::new();
        let response = chrome.update("w", &mut geometry, &manager, &mut events, true);

        assert!(response.moved);
        assert_eq!(geometry.position, Point::new(5.0, 4.0));
        assert_eq!(geometry.size, Size::new(500.0, 400.0));
    }

    #[test]
    fn resize_clamps_at_zero() {
        let handle = EventTarget::ResizeHandle("w".into());
        let mut events = PointerRouter::new();
        both(&mut events, &handle, ptr(PointerKind::Press, 100.0, 100.0));
        both(&mut events, &handle, ptr(PointerKind::Drag, -500.0, 90.0));

        let mut manager = WindowManagerState::default();
        manager.update(&mut events);
        let mut geometry = WindowGeometry::new(Point::ZERO, Size::new(100.0, 50.0));
        let mut chrome = WindowChrome::new();
        chrome.update("w", &mut geometry, &manager, &mut events, true);
        assert_eq!(geometry.size, Size::new(0.0, 40.0));
    }

    #[test]
    fn resize_snaps_to_integral_units() {
        let handle = EventTarget::ResizeHandle("w".into());
        let mut events = PointerRouter::new();
        both(&mut events, &handle, ptr(PointerKind::Press, 0.0, 0.0));
        both(&mut events, &handle, ptr(PointerKind::Drag, 10.7, 3.2));

        let mut manager = WindowManagerState::default();
        manager.update(&mut events);
        let mut geometry = WindowGeometry::new(Point::ZERO, Size::new(100.0, 100.0));
        WindowChrome::new().update("w", &mut geometry, &manager, &mut events, true);
        assert_eq!(geometry.size, Size::new(110.0, 103.0));
    }

    #[test]
    fn drag_without_press_uses_zero_session() {
        let bar = EventTarget::TitleBar("w".into());
        let mut events = PointerRouter::new();
        both(&mut events, &bar, ptr(PointerKind::Drag, 7.0, 3.0));
        let mut manager = WindowManagerState::default();
        manager.update(&mut events);
        let mut geometry = WindowGeometry::new(Point::new(50.0, 50.0), Size::new(10.0, 10.0));
        WindowChrome::new().update("w", &mut geometry, &manager, &mut events, false);
        assert_eq!(geometry.position, Point::new(7.0, 3.0));
    }

    #[test]
    fn close_release_sets_closed_until_next_frame() {
        let mut events = PointerRouter::new();
        events.push(
            EventTarget::CloseButton("w".into()),
            ptr(PointerKind::Release, 1.0, 1.0),
        );
        let manager = WindowManagerState::default();
        let mut geometry = WindowGeometry::default();
        let mut chrome = WindowChrome::new();
        let response = chrome.update("w", &mut geometry, &manager, &mut events, true);
        assert!(response.close_clicked);
        assert!(chrome.is_closed());
        chrome.begin_frame();
        assert!(!chrome.is_closed());
    }

    #[test]
    fn chrome_layout_places_regions() {
        let g = WindowGeometry::new(Point::new(10.0, 20.0), Size::new(500.0, 400.0));
        let layout = ChromeLayout::new(&g, &ChromeMetrics::default());
        assert_eq!(layout.title_bar, Rect::new(10.0, 20.0, 500.0, 35.0));
        assert_eq!(layout.close_button, Rect::new(475.0, 20.0, 35.0, 35.0));
        assert_eq!(layout.content, Rect::new(10.0, 55.0, 500.0, 365.0));
        assert_eq!(layout.resize_handle[0], Point::new(510.0, 420.0));
    }
}
