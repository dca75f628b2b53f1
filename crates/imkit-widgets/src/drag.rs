//! Drag-to-change numeric boxes.
//!
//! Horizontal pointer movement while the box is held changes the value by
//! `delta_x * speed`, clamped to the range. The box is followed by its label
//! on the same line.

use imkit_core::event::{EventKinds, InputEvent, PointerKind};
use imkit_core::geometry::{Point, Rect, Size};

use crate::context::Ui;
use crate::identity::{kind, resolve};

/// Cached drag state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragValueState {
    /// Unrounded value; integer boxes keep the fractional part here.
    pub value: f64,
    /// Pointer x at the previous press or drag.
    pub last_x: f32,
}

fn clamp_range(v: f64, min: f64, max: f64) -> f64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    if v.is_nan() { lo } else { v.clamp(lo, hi) }
}

impl Ui<'_> {
    /// Drag box for a float. Returns true if the user changed it.
    pub fn drag_float(&mut self, label: &str, value: &mut f64, speed: f64, min: f64, max: f64) -> bool {
        let id = resolve(label, kind::DRAG_FLOAT);
        let Some(next) = self.drag_value(&id.key, *value, speed, min, max, |a, b| a == b) else {
            self.drag_box(id.key, format!("{value:.3}"), &id.label);
            return false;
        };
        *value = next;
        self.drag_box(id.key, format!("{value:.3}"), &id.label);
        true
    }

    /// Drag box for an integer. Returns true if the user changed it.
    pub fn drag_int(&mut self, label: &str, value: &mut i64, speed: f64, min: i64, max: i64) -> bool {
        let id = resolve(label, kind::DRAG_INT);
        let current = *value as f64;
        let changed = match self.drag_value(&id.key, current, speed, min as f64, max as f64, |a, b| {
            a.round() == b.round()
        }) {
            Some(next) if next.round() as i64 != *value => {
                *value = next.round() as i64;
                true
            }
            _ => false,
        };
        self.drag_box(id.key, value.to_string(), &id.label);
        changed
    }

    /// Apply drag events for `key`. Returns the new value if the user moved
    /// it, otherwise adopts `external` when it differs per `same`.
    fn drag_value(
        &mut self,
        key: &str,
        external: f64,
        speed: f64,
        min: f64,
        max: f64,
        same: fn(f64, f64) -> bool,
    ) -> Option<f64> {
        let events = self.drain(key, EventKinds::PRESS | EventKinds::DRAG);
        let state = self.cache().get_or_create(key, || DragValueState {
            value: external,
            last_x: 0.0,
        });
        let mut moved = false;
        for p in events.iter().filter_map(InputEvent::as_pointer) {
            match p.kind {
                PointerKind::Press => state.last_x = p.position.x,
                PointerKind::Drag => {
                    let dx = f64::from(p.position.x - state.last_x);
                    state.last_x = p.position.x;
                    state.value = clamp_range(state.value + dx * speed, min, max);
                    moved = true;
                }
                PointerKind::Release => {}
            }
        }
        if moved {
            return Some(state.value);
        }
        if !same(state.value, external) {
            state.value = external;
        }
        None
    }

    fn drag_box(&mut self, key: String, shown: String, label: &str) {
        let theme = *self.theme();
        self.add_widget(Some(key), move |_, out, c| {
            let width = c.min.width.max(theme.default_control_width * 0.5);
            let size = c.constrain(Size::new(width, theme.line_height));
            out.fill(Rect::from_size(size), theme.palette.track);
            let text_w = theme.measure_text(&shown).width;
            out.text(
                Point::new(((size.width - text_w) / 2.0).max(0.0), 0.0),
                shown,
                theme.palette.foreground,
                theme.text_size,
            );
            size
        });
        self.same_line();
        self.text(label);
    }
}
