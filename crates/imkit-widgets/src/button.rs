//! Push buttons.
//!
//! A click is a press and release on the same button; the router only
//! delivers the release when the pointer is still over the button, so a
//! press dragged off and let go elsewhere does nothing.

use imkit_core::event::{EventKinds, InputEvent, PointerKind};
use imkit_core::geometry::{Point, Rect, Size};

use crate::context::Ui;
use crate::identity::{kind, resolve};

/// Cached button state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// Clicks seen over the button's lifetime.
    pub clicks: u64,
}

impl Ui<'_> {
    /// A button showing `label`. Returns true on the frame it is clicked.
    pub fn button(&mut self, label: &str) -> bool {
        let id = resolve(label, kind::BUTTON);
        let events = self.drain(&id.key, EventKinds::RELEASE);
        let state = self.cache().get_or_create(&id.key, ButtonState::default);
        let clicks = events
            .iter()
            .filter(|e| matches!(e, InputEvent::Pointer(p) if p.kind == PointerKind::Release))
            .count() as u64;
        state.clicks += clicks;

        let theme = *self.theme();
        let text = id.label;
        self.add_widget(Some(id.key), move |_, out, c| {
            let pad = theme.button_inset;
            let natural = theme.measure_text(&text);
            let size = c.constrain(Size::new(
                natural.width + pad.horizontal(),
                natural.height + pad.vertical(),
            ));
            out.fill(Rect::from_size(size), theme.palette.contrast_background);
            let dx = ((size.width - natural.width) / 2.0).max(0.0);
            let dy = ((size.height - natural.height) / 2.0).max(0.0);
            out.text(
                Point::new(dx, dy),
                text,
                theme.palette.contrast_foreground,
                theme.text_size,
            );
            size
        });
        clicks > 0
    }
}
