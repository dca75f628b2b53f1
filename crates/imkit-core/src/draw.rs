#![forbid(unsafe_code)]

//! Backend-agnostic draw lists.
//!
//! A frame produces one [`DrawList`]: a flat sequence of [`DrawCommand`]s in
//! painter's order (later commands cover earlier ones). Clip regions nest via
//! [`DrawCommand::PushClip`] / [`DrawCommand::PopClip`] and are always
//! balanced by the code that emits them.
//!
//! Widgets record into a list whose origin is their own top-left corner; the
//! layout pass then [`append_translated`](DrawList::append_translated)s it
//! into the parent at the final position. Nothing in this module rasterises.

use crate::geometry::{Point, Rect};

/// 8-bit straight-alpha colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour.
    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xff)
    }

    /// Opaque colour from unit-range channels; out-of-range input saturates.
    #[must_use]
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(q(r), q(g), q(b))
    }
}

/// One paint operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Solid rectangle.
    Fill { rect: Rect, color: Rgba },
    /// Rectangle outline of the given stroke width, drawn inside `rect`.
    Outline { rect: Rect, color: Rgba, width: f32 },
    /// Solid triangle.
    Triangle { points: [Point; 3], color: Rgba },
    /// A run of text. `origin` is the top-left of the line box.
    Text {
        origin: Point,
        text: String,
        color: Rgba,
        size: f32,
    },
    /// Intersect the clip region with `rect` until the matching `PopClip`.
    PushClip(Rect),
    PopClip,
}

impl DrawCommand {
    fn translate(&mut self, delta: Point) {
        match self {
            Self::Fill { rect, .. } | Self::Outline { rect, .. } | Self::PushClip(rect) => {
                *rect = rect.translate(delta);
            }
            Self::Triangle { points, .. } => {
                for p in points {
                    *p += delta;
                }
            }
            Self::Text { origin, .. } => *origin += delta,
            Self::PopClip => {}
        }
    }
}

/// Ordered list of paint operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn fill(&mut self, rect: Rect, color: Rgba) {
        self.push(DrawCommand::Fill { rect, color });
    }

    pub fn outline(&mut self, rect: Rect, color: Rgba, width: f32) {
        self.push(DrawCommand::Outline { rect, color, width });
    }

    pub fn triangle(&mut self, points: [Point; 3], color: Rgba) {
        self.push(DrawCommand::Triangle { points, color });
    }

    pub fn text(&mut self, origin: Point, text: impl Into<String>, color: Rgba, size: f32) {
        self.push(DrawCommand::Text {
            origin,
            text: text.into(),
            color,
            size,
        });
    }

    /// Run `body` with `rect` pushed as a clip, popping it afterwards.
    pub fn clipped<R>(&mut self, rect: Rect, body: impl FnOnce(&mut Self) -> R) -> R {
        self.push(DrawCommand::PushClip(rect));
        let out = body(self);
        self.push(DrawCommand::PopClip);
        out
    }

    /// Move every command in `other` by `delta` and append it.
    pub fn append_translated(&mut self, other: DrawList, delta: Point) {
        self.commands.reserve(other.commands.len());
        for mut cmd in other.commands {
            cmd.translate(delta);
            self.commands.push(cmd);
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }

    /// Text runs in paint order. Handy for asserting what a frame shows.
    pub fn texts(&self) -> impl Iterator<Item = (&str, Point)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, origin, .. } => Some((text.as_str(), *origin)),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    #[must_use]
    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }
}

impl<'a> IntoIterator for &'a DrawList {
    type Item = &'a DrawCommand;
    type IntoIter = std::slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
