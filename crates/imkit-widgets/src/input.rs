//! Single-line text input.
//!
//! The field keeps its own buffer and cursor in the widget cache. The bound
//! `String` is written when the user edits and read back when the caller
//! changes it, so either side can own the text. When the caller replaces the
//! text the cursor keeps its column, clamped to the new length.

use imkit_core::event::{EditKey, EventKinds, InputEvent, PointerKind};
use imkit_core::geometry::{Point, Rect, Size};
use imkit_layout::SizeMode;

use crate::context::Ui;
use crate::identity::{kind, resolve};

/// Padding between the field outline and its text.
const FIELD_PAD: f32 = 4.0;

/// Cached state of a text field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFieldState {
    pub buffer: String,
    /// Cursor position in characters, `0..=char_len`.
    pub cursor: usize,
}

impl TextFieldState {
    /// State holding `text` with the cursor at the end.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let buffer = text.into();
        let cursor = buffer.chars().count();
        Self { buffer, cursor }
    }

    #[must_use]
    pub fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(chars)
            .map_or(self.buffer.len(), |(i, _)| i)
    }

    /// Apply an edit key. Returns true if the buffer changed.
    pub fn apply(&mut self, key: &EditKey) -> bool {
        let len = self.char_len();
        self.cursor = self.cursor.min(len);
        match key {
            EditKey::Insert(s) => {
                if s.is_empty() {
                    return false;
                }
                let at = self.byte_index(self.cursor);
                self.buffer.insert_str(at, s);
                self.cursor += s.chars().count();
                true
            }
            EditKey::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                let at = self.byte_index(self.cursor - 1);
                self.buffer.remove(at);
                self.cursor -= 1;
                true
            }
            EditKey::Delete => {
                if self.cursor >= len {
                    return false;
                }
                let at = self.byte_index(self.cursor);
                self.buffer.remove(at);
                true
            }
            EditKey::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            EditKey::Right => {
                self.cursor = (self.cursor + 1).min(len);
                false
            }
            EditKey::Home => {
                self.cursor = 0;
                false
            }
            EditKey::End => {
                self.cursor = len;
                false
            }
        }
    }

    /// Replace the buffer, keeping the cursor column where possible.
    pub fn replace_keep_cursor(&mut self, text: &str) {
        self.buffer.clear();
        self.buffer.push_str(text);
        self.cursor = self.cursor.min(self.char_len());
    }
}

impl Ui<'_> {
    /// A labelled text field bound to `text`. Returns true if the user
    /// edited it this frame.
    pub fn input_text(&mut self, label: &str, text: &mut String) -> bool {
        let id = resolve(label, kind::INPUT_TEXT);
        let events = self.drain(&id.key, EventKinds::PRESS | EventKinds::EDIT);
        let char_width = self.theme().char_width;
        let inset = self.theme().widget_inset;
        let field = self.cache().rect(&id.key).map(|r| r.inner(inset));
        let state = self
            .cache()
            .get_or_create(&id.key, || TextFieldState::new(text.as_str()));

        let mut changed = false;
        for event in &events {
            match event {
                InputEvent::Edit(key) => changed |= state.apply(key),
                InputEvent::Pointer(p) if p.kind == PointerKind::Press => {
                    if let Some(field) = field {
                        let col = ((p.position.x - field.x - FIELD_PAD) / char_width).round();
                        state.cursor = (col.max(0.0) as usize).min(state.char_len());
                    }
                }
                InputEvent::Pointer(_) => {}
            }
        }
        if changed {
            text.clone_from(&state.buffer);
        } else if *text != state.buffer {
            state.replace_keep_cursor(text);
        }

        let theme = *self.theme();
        let key = id.key;
        self.with_same_line(|ui| {
            ui.with_sizing_mode(SizeMode::Rigid, |ui| ui.text(&id.label));
            let state_key = key.clone();
            ui.add_widget(Some(key), move |cache, out, c| {
                let (buffer, cursor) = cache
                    .get::<TextFieldState>(&state_key)
                    .map(|s| (s.buffer.clone(), s.cursor))
                    .unwrap_or_default();
                let height = theme.line_height + 2.0 * FIELD_PAD;
                let width = c.bounded_width_or(theme.default_control_width);
                let size = c.constrain(Size::new(width, height));
                let frame = Rect::from_size(size);
                out.fill(frame, theme.palette.track);
                out.outline(frame, theme.palette.outline, 1.0);
                out.clipped(frame, |out| {
                    out.text(
                        Point::new(FIELD_PAD, FIELD_PAD),
                        buffer,
                        theme.palette.foreground,
                        theme.text_size,
                    );
                    let caret_x = FIELD_PAD + cursor as f32 * theme.char_width;
                    out.fill(
                        Rect::new(caret_x, FIELD_PAD, 1.0, theme.line_height),
                        theme.palette.foreground,
                    );
                });
                size
            });
        });
        changed
    }
}
