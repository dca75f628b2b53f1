//! Spacing, colours, and text metrics shared by the widget set.
//!
//! Text is measured with fixed per-character advance and line height; actual
//! shaping is the renderer's business. The defaults follow a common
//! monospace UI face at 14px.

use imkit_core::draw::Rgba;
use imkit_core::geometry::{Sides, Size};
use imkit_layout::ChromeStyle;

/// Widget colours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Rgba,
    pub foreground: Rgba,
    /// Fill of buttons, slider thumbs, title bars.
    pub contrast_background: Rgba,
    pub contrast_foreground: Rgba,
    /// Track and box fills behind values.
    pub track: Rgba,
    pub outline: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba::rgb(0xf5, 0xf5, 0xf5),
            foreground: Rgba::rgb(0x20, 0x20, 0x20),
            contrast_background: Rgba::rgb(0x3f, 0x51, 0xb5),
            contrast_foreground: Rgba::WHITE,
            track: Rgba::rgb(0xd0, 0xd0, 0xd8),
            outline: Rgba::rgb(0x80, 0x80, 0x80),
        }
    }
}

/// Look and spacing of everything the widget layer draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub palette: Palette,
    /// Padding inside a button around its label.
    pub button_inset: Sides,
    /// Spacing wrapped around every widget.
    pub widget_inset: Sides,
    /// Spacing between a window's edge and its widgets.
    pub content_inset: Sides,
    pub text_size: f32,
    /// Advance of one character.
    pub char_width: f32,
    pub line_height: f32,
    /// Width given to sliders and drag boxes outside a flexed row.
    pub default_control_width: f32,
    /// Side of the colour swatch in `color_edit3`.
    pub swatch_size: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            button_inset: Sides::new(10.0, 12.0, 10.0, 12.0),
            widget_inset: Sides::vertical_only(2.0),
            content_inset: Sides::horizontal_only(5.0),
            text_size: 14.0,
            char_width: 8.4,
            line_height: 18.0,
            default_control_width: 200.0,
            swatch_size: 40.0,
        }
    }
}

impl Theme {
    /// Natural size of a single line of `text`.
    #[must_use]
    pub fn measure_text(&self, text: &str) -> Size {
        Size::new(text.chars().count() as f32 * self.char_width, self.line_height)
    }

    /// Chrome colours and metrics for window painting.
    #[must_use]
    pub fn chrome_style(&self) -> ChromeStyle {
        ChromeStyle {
            background: self.palette.background,
            title_bar: self.palette.contrast_background,
            title_text: self.palette.contrast_foreground,
            outline: self.palette.outline,
            resize_handle: self.palette.contrast_background,
            text_size: self.text_size,
            line_height: self.line_height,
            char_width: self.char_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_counts_chars_not_bytes() {
        let theme = Theme {
            char_width: 10.0,
            line_height: 20.0,
            ..Theme::default()
        };
        assert_eq!(theme.measure_text("héllo"), Size::new(50.0, 20.0));
        assert_eq!(theme.measure_text(""), Size::new(0.0, 20.0));
    }
}
