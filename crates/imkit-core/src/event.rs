#![forbid(unsafe_code)]

//! Input events and the event-source boundary.
//!
//! Events are addressed to an [`EventTarget`]. Each consumer asks its
//! [`EventSource`] for events matching an [`EventFilter`] (target plus a set
//! of [`EventKinds`]) and drains them in delivery order. The source decides
//! which targets an event reaches, using the hit areas consumers
//! [`register`](EventSource::register) while building the frame.
//!
//! # Design Notes
//!
//! - Targets are plain values, not handles: a window's title bar is
//!   `TitleBar(title)` every frame, so nothing has to be kept alive between
//!   frames for routing to keep working.
//! - `EventKinds` uses bitflags so filters combine with `|`.

use bitflags::bitflags;

use crate::geometry::{Point, Rect};

/// Addressable interaction region.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// Whole-surface capture. Sees every press, wherever it lands.
    Surface,
    /// Title bar of the window with this title.
    TitleBar(String),
    /// Bottom-right resize handle of the window with this title.
    ResizeHandle(String),
    /// Close button of the window with this title.
    CloseButton(String),
    /// A widget, addressed by the scope it lives in and its identity key.
    Widget { scope: String, key: String },
}

impl EventTarget {
    #[must_use]
    pub fn widget(scope: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Widget {
            scope: scope.into(),
            key: key.into(),
        }
    }

    /// True for widget targets (the ones that can take keyboard focus).
    #[must_use]
    pub const fn is_widget(&self) -> bool {
        matches!(self, Self::Widget { .. })
    }
}

/// Phase of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Press,
    Drag,
    Release,
}

/// A pointer event at a surface position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(kind: PointerKind, position: Point) -> Self {
        Self { kind, position }
    }
}

/// Text-editing key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKey {
    /// Insert text at the cursor.
    Insert(String),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Edit(EditKey),
}

impl InputEvent {
    /// The kind bit this event matches in an [`EventFilter`].
    #[must_use]
    pub const fn kind(&self) -> EventKinds {
        match self {
            Self::Pointer(p) => match p.kind {
                PointerKind::Press => EventKinds::PRESS,
                PointerKind::Drag => EventKinds::DRAG,
                PointerKind::Release => EventKinds::RELEASE,
            },
            Self::Edit(_) => EventKinds::EDIT,
        }
    }

    /// The pointer payload, if this is a pointer event.
    #[must_use]
    pub const fn as_pointer(&self) -> Option<&PointerEvent> {
        match self {
            Self::Pointer(p) => Some(p),
            Self::Edit(_) => None,
        }
    }
}

bitflags! {
    /// Event kinds a consumer is interested in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventKinds: u8 {
        const PRESS   = 0b0001;
        const DRAG    = 0b0010;
        const RELEASE = 0b0100;
        const EDIT    = 0b1000;
        const POINTER = Self::PRESS.bits() | Self::DRAG.bits() | Self::RELEASE.bits();
    }
}

/// Which events a consumer wants: one target, some kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    pub target: EventTarget,
    pub kinds: EventKinds,
}

impl EventFilter {
    #[must_use]
    pub const fn new(target: EventTarget, kinds: EventKinds) -> Self {
        Self { target, kinds }
    }

    /// True if `event` delivered to `target` passes this filter.
    #[must_use]
    pub fn matches(&self, target: &EventTarget, event: &InputEvent) -> bool {
        self.target == *target && self.kinds.contains(event.kind())
    }
}

/// Shape of a registered interaction region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitArea {
    Rect(Rect),
    Triangle([Point; 3]),
    /// The whole surface.
    Everywhere,
}

impl HitArea {
    /// Point-in-area test. Triangle edges count as inside.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Self::Rect(r) => r.contains(p),
            Self::Triangle([a, b, c]) => {
                let cross = |o: Point, u: Point, v: Point| {
                    (u.x - o.x) * (v.y - o.y) - (u.y - o.y) * (v.x - o.x)
                };
                let d1 = cross(*a, *b, p);
                let d2 = cross(*b, *c, p);
                let d3 = cross(*c, *a, p);
                let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
                let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
                !(has_neg && has_pos)
            }
            Self::Everywhere => true,
        }
    }
}

/// Per-frame supplier of input events.
///
/// Consumers drain their own target exhaustively each frame:
///
/// ```
/// # use imkit_core::event::*;
/// fn drain(events: &mut dyn EventSource, filter: &EventFilter) -> usize {
///     let mut n = 0;
///     while events.next_event(filter).is_some() {
///         n += 1;
///     }
///     n
/// }
/// ```
pub trait EventSource {
    /// Next pending event for `filter`, in delivery order.
    fn next_event(&mut self, filter: &EventFilter) -> Option<InputEvent>;

    /// Declare an interaction region for this frame.
    fn register(&mut self, target: EventTarget, area: HitArea);

    /// Called once when the frame that consumed events is complete.
    fn finish_frame(&mut self) {}
}

/// Drain every event matching `filter`, in delivery order.
pub fn drain_events(source: &mut dyn EventSource, filter: &EventFilter) -> Vec<InputEvent> {
    std::iter::from_fn(|| source.next_event(filter)).collect()
}
