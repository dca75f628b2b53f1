//! Static text labels.

use imkit_core::geometry::Point;

use crate::context::Ui;
use crate::identity::{kind, resolve};

impl Ui<'_> {
    /// A rigid single-line label. `##` suffixes are hidden, and nothing is
    /// cached for it.
    pub fn text(&mut self, text: &str) {
        let label = resolve(text, kind::TEXT).label;
        let theme = *self.theme();
        self.add_widget(None, move |_, out, c| {
            out.text(Point::ZERO, label.as_str(), theme.palette.foreground, theme.text_size);
            c.constrain(theme.measure_text(&label))
        });
    }
}
