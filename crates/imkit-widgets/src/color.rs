//! RGB colour editor: three channel sliders, a label, and a swatch.

use imkit_core::draw::Rgba;
use imkit_core::geometry::{Rect, Size};

use crate::context::Ui;
use crate::identity::{kind, resolve};

const CHANNELS: [&str; 3] = ["R", "G", "B"];

impl Ui<'_> {
    /// Edit a unit-range RGB colour. Returns true if any channel changed.
    pub fn color_edit3(&mut self, label: &str, color: &mut [f64; 3]) -> bool {
        let id = resolve(label, kind::COLOR_EDIT);
        let mut changed = false;
        for (channel, value) in CHANNELS.iter().zip(color.iter_mut()) {
            changed |= self.slider_float(&format!("{channel}##{}", id.key), value, 0.0, 1.0);
        }

        self.text(&id.label);
        self.same_line();
        let swatch = Rgba::from_unit(color[0], color[1], color[2]);
        let side = self.theme().swatch_size;
        let outline = self.theme().palette.outline;
        self.add_widget(None, move |_, out, c| {
            let size = c.constrain(Size::new(side, side));
            out.fill(Rect::from_size(size), swatch);
            out.outline(Rect::from_size(size), outline, 1.0);
            size
        });
        changed
    }
}
