#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All coordinates are `f32` device-independent units with the origin at the
//! top-left of the surface and `y` growing downwards. Extents are never
//! negative once they pass through [`Size::clamp_non_negative`]; widgets and
//! the window coordinator rely on that.

use std::ops::{Add, AddAssign, Neg, Sub};

/// A point (or a displacement) on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Drop the fractional part of both coordinates.
    #[inline]
    #[must_use]
    pub fn trunc(self) -> Self {
        Self::new(self.x.trunc(), self.y.trunc())
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Zero extent.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Unbounded extent, used as a loose maximum.
    pub const INFINITE: Self = Self::new(f32::INFINITY, f32::INFINITY);

    #[inline]
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Grow (or shrink, for negative components) by a displacement.
    #[inline]
    #[must_use]
    pub fn offset_by(self, delta: Point) -> Self {
        Self::new(self.width + delta.x, self.height + delta.y)
    }

    /// Clamp each axis at zero.
    #[inline]
    #[must_use]
    pub fn clamp_non_negative(self) -> Self {
        Self::new(self.width.max(0.0), self.height.max(0.0))
    }

    /// Drop the fractional part of both extents.
    #[inline]
    #[must_use]
    pub fn trunc(self) -> Self {
        Self::new(self.width.trunc(), self.height.trunc())
    }

    /// Component-wise maximum.
    #[inline]
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Component-wise minimum.
    #[inline]
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.width.min(other.width), self.height.min(other.height))
    }

    /// The extent as a displacement from the origin.
    #[inline]
    #[must_use]
    pub const fn to_point(self) -> Point {
        Point::new(self.width, self.height)
    }

    /// True if either axis has no extent.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle: origin plus extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin.
    #[inline]
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    #[inline]
    #[must_use]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Half-open containment test: left/top edges inside, right/bottom outside.
    #[inline]
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Move the rectangle by a displacement.
    #[inline]
    #[must_use]
    pub fn translate(self, delta: Point) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Shrink by the given sides. Extents never go negative.
    #[must_use]
    pub fn inner(&self, sides: Sides) -> Self {
        Self::new(
            self.x + sides.left,
            self.y + sides.top,
            (self.width - sides.horizontal()).max(0.0),
            (self.height - sides.vertical()).max(0.0),
        )
    }

    /// Overlap of two rectangles, empty (zero-sized) when they are disjoint.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Self::new(x, y, (right - x).max(0.0), (bottom - y).max(0.0))
    }
}

/// Per-edge spacing (insets, margins).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sides {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Sides {
    #[inline]
    #[must_use]
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Same spacing on every edge.
    #[inline]
    #[must_use]
    pub const fn all(v: f32) -> Self {
        Self::new(v, v, v, v)
    }

    /// Spacing on the top and bottom edges only.
    #[inline]
    #[must_use]
    pub const fn vertical_only(v: f32) -> Self {
        Self::new(v, 0.0, v, 0.0)
    }

    /// Spacing on the left and right edges only.
    #[inline]
    #[must_use]
    pub const fn horizontal_only(v: f32) -> Self {
        Self::new(0.0, v, 0.0, v)
    }

    #[inline]
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    #[inline]
    #[must_use]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Offset of the content origin inside the padded box.
    #[inline]
    #[must_use]
    pub const fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }
}
