//! Horizontal float slider.
//!
//! Press or drag anywhere on the track to set the value. Positions map onto
//! the rectangle the track occupied in the previous frame, which is what the
//! user was looking at when they pressed. The pointer places the thumb's
//! centre, so the ends of the range sit half a thumb inside the track.

use imkit_core::event::{EventKinds, InputEvent};
use imkit_core::geometry::{Rect, Size};
use imkit_layout::SizeMode;

use crate::context::Ui;
use crate::identity::{kind, resolve};

/// Width of the slider thumb.
const THUMB_WIDTH: f32 = 10.0;

/// Cached slider position as a fraction of the range.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SliderState {
    pub fraction: f64,
}

impl SliderState {
    #[must_use]
    pub fn at(value: f64, min: f64, max: f64) -> Self {
        Self {
            fraction: fraction_of(value, min, max),
        }
    }

    #[must_use]
    pub fn value(&self, min: f64, max: f64) -> f64 {
        min + self.fraction * (max - min)
    }
}

fn fraction_of(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span == 0.0 || !span.is_finite() {
        return 0.0;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

/// Fraction that puts the thumb centre under `x` on a track drawn in `track`.
fn fraction_at(track: Rect, x: f32) -> f64 {
    let travel = track.width - THUMB_WIDTH;
    if travel <= 0.0 {
        return 0.0;
    }
    f64::from((x - track.x - THUMB_WIDTH / 2.0) / travel).clamp(0.0, 1.0)
}

impl Ui<'_> {
    /// A slider over `min..=max` followed by its label and value.
    /// Returns true if the user moved it this frame.
    pub fn slider_float(&mut self, label: &str, value: &mut f64, min: f64, max: f64) -> bool {
        let id = resolve(label, kind::SLIDER_FLOAT);
        let events = self.drain(&id.key, EventKinds::PRESS | EventKinds::DRAG);
        let inset = self.theme().widget_inset;
        let track = self.cache().rect(&id.key).map(|r| r.inner(inset));
        let state = self
            .cache()
            .get_or_create(&id.key, || SliderState::at(*value, min, max));

        let mut changed = false;
        if let Some(track) = track.filter(|t| t.width > THUMB_WIDTH) {
            for p in events.iter().filter_map(InputEvent::as_pointer) {
                state.fraction = fraction_at(track, p.position.x);
                changed = true;
            }
        }
        if changed {
            *value = state.value(min, max);
        } else if (state.value(min, max) - *value).abs() > f64::EPSILON {
            *state = SliderState::at(*value, min, max);
        }

        let theme = *self.theme();
        let caption = format!("{} {:7.3}", id.label, *value);
        let key = id.key;
        self.with_same_line(|ui| {
            let state_key = key.clone();
            ui.add_widget(Some(key), move |cache, out, c| {
                let fraction = cache
                    .get::<SliderState>(&state_key)
                    .map_or(0.0, |s| s.fraction) as f32;
                let width = c.bounded_width_or(theme.default_control_width);
                let size = c.constrain(Size::new(width, theme.line_height));
                out.fill(Rect::from_size(size), theme.palette.track);
                let travel = (size.width - THUMB_WIDTH).max(0.0);
                out.fill(
                    Rect::new(fraction * travel, 0.0, THUMB_WIDTH.min(size.width), size.height),
                    theme.palette.contrast_background,
                );
                size
            });
            ui.with_sizing_mode(SizeMode::Rigid, |ui| ui.text(&caption));
        });
        changed
    }
}
