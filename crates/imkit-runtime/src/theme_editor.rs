//! Built-in panel for live-editing theme spacing.

use imkit_core::geometry::Sides;

use crate::frame::Frame;

/// Title of the theme editor panel.
pub const THEME_EDITOR_TITLE: &str = "Theme";

const EDGES: [&str; 4] = ["Top", "Right", "Bottom", "Left"];
const MAX_INSET: f64 = 40.0;
const DRAG_SPEED: f64 = 0.25;

fn edges(s: Sides) -> [f64; 4] {
    [s.top, s.right, s.bottom, s.left].map(f64::from)
}

fn sides(e: [f64; 4]) -> Sides {
    let [top, right, bottom, left] = e.map(|v| v as f32);
    Sides::new(top, right, bottom, left)
}

impl Frame<'_> {
    /// Panel editing the button inset with sliders and the widget inset
    /// with drag boxes. Edits land in the session theme once the panel is
    /// done, so they show from the next panel onward.
    ///
    /// Returns true if any inset changed.
    pub fn theme_editor(&mut self, open: &mut bool) -> bool {
        let mut button = edges(self.session.theme.button_inset);
        let mut widget = edges(self.session.theme.widget_inset);
        let mut changed = false;

        self.begin_panel(THEME_EDITOR_TITLE, open, |ui| {
            ui.text("Button inset");
            for (edge, value) in EDGES.iter().zip(button.iter_mut()) {
                changed |= ui.slider_float(&format!("{edge}##button"), value, 0.0, MAX_INSET);
            }
            ui.text("Widget inset");
            for (edge, value) in EDGES.iter().zip(widget.iter_mut()) {
                changed |= ui.drag_float(&format!("{edge}##widget"), value, DRAG_SPEED, 0.0, MAX_INSET);
            }
        });

        if changed {
            let theme = &mut self.session.theme;
            theme.button_inset = sides(button);
            theme.widget_inset = sides(widget);
            tracing::debug!(button = ?theme.button_inset, widget = ?theme.widget_inset, "theme spacing edited");
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_order_is_top_right_bottom_left() {
        let s = Sides::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(edges(s), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(sides(edges(s)), s);
    }
}
