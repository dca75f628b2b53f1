#![forbid(unsafe_code)]

//! Layout primitives and solvers.
//!
//! - [`SizeMode`] - how an item claims main-axis space (`Rigid` or `Flexed`)
//! - [`Constraints`] - min/max box handed to a render op
//! - [`solve_line`] - 1D rigid-then-flex distribution along one axis
//! - [`accumulator`] - per-frame item collection with same-line grouping
//! - [`window`] - window geometry and the drag/resize coordinator
//!
//! # Sizing rule
//!
//! Along a line, rigid items are measured first, in order, each against the
//! space still left. Whatever remains is split between flexed items in
//! proportion to their weights. When nothing remains, flexed items get zero
//! and nobody reports an error: over-full lines simply overflow.

pub mod accumulator;
pub mod window;

pub use accumulator::{
    Arranged, LayoutAccumulator, LayoutItem, Line, LineScope, ModeScope, Placement, RenderOp,
};
pub use imkit_core::geometry::{Point, Rect, Sides, Size};
pub use window::{
    ChromeLayout, ChromeMetrics, ChromeResponse, ChromeStyle, DragSession, WindowChrome,
    WindowGeometry, WindowManagerState,
};

/// How an item claims space along its line's main axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeMode {
    /// Takes its natural extent.
    Rigid,
    /// Takes `weight / total_weight` of the space left after rigid items.
    Flexed(f32),
}

impl SizeMode {
    /// Weight for flex distribution; zero for rigid or degenerate weights.
    #[inline]
    #[must_use]
    pub fn weight(self) -> f32 {
        match self {
            Self::Rigid => 0.0,
            Self::Flexed(w) if w.is_finite() && w > 0.0 => w,
            Self::Flexed(_) => 0.0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_rigid(self) -> bool {
        matches!(self, Self::Rigid)
    }
}

/// Layout direction of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Vertical,
    Horizontal,
}

impl Direction {
    /// The perpendicular direction.
    #[inline]
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
        }
    }

    /// Extent of `size` along this direction.
    #[inline]
    #[must_use]
    pub const fn main_of(self, size: Size) -> f32 {
        match self {
            Self::Vertical => size.height,
            Self::Horizontal => size.width,
        }
    }

    /// Extent of `size` across this direction.
    #[inline]
    #[must_use]
    pub const fn cross_of(self, size: Size) -> f32 {
        self.cross().main_of(size)
    }

    /// Build a size from main/cross extents.
    #[inline]
    #[must_use]
    pub const fn pack(self, main: f32, cross: f32) -> Size {
        match self {
            Self::Vertical => Size::new(cross, main),
            Self::Horizontal => Size::new(main, cross),
        }
    }

    /// Displacement of `main` along this direction.
    #[inline]
    #[must_use]
    pub const fn offset(self, main: f32) -> Point {
        match self {
            Self::Vertical => Point::new(0.0, main),
            Self::Horizontal => Point::new(main, 0.0),
        }
    }
}

/// Size bounds handed to a render op.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    pub min: Size,
    pub max: Size,
}

impl Constraints {
    #[inline]
    #[must_use]
    pub const fn new(min: Size, max: Size) -> Self {
        Self { min, max }
    }

    /// Exactly `size`.
    #[inline]
    #[must_use]
    pub const fn tight(size: Size) -> Self {
        Self::new(size, size)
    }

    /// Anything from zero up to `max`.
    #[inline]
    #[must_use]
    pub const fn loose(max: Size) -> Self {
        Self::new(Size::ZERO, max)
    }

    /// No bounds at all.
    #[inline]
    #[must_use]
    pub const fn unbounded() -> Self {
        Self::loose(Size::INFINITE)
    }

    /// Clamp `size` into `[min, max]` per axis.
    #[must_use]
    pub fn constrain(&self, size: Size) -> Size {
        Size::new(
            size.width.max(self.min.width).min(self.max.width.max(self.min.width)),
            size.height.max(self.min.height).min(self.max.height.max(self.min.height)),
        )
    }

    /// Shrink both bounds by the given insets, never below zero.
    #[must_use]
    pub fn deflate(&self, sides: Sides) -> Self {
        let shrink = |s: Size| {
            Size::new(
                (s.width - sides.horizontal()).max(0.0),
                (s.height - sides.vertical()).max(0.0),
            )
        };
        Self::new(shrink(self.min), shrink(self.max))
    }

    /// Maximum width when finite, otherwise `fallback`.
    #[inline]
    #[must_use]
    pub fn bounded_width_or(&self, fallback: f32) -> f32 {
        if self.max.width.is_finite() {
            self.max.width
        } else {
            fallback.max(self.min.width)
        }
    }
}

/// Distribute `available` main-axis space along a line.
///
/// `measure(i, remaining)` is called once per rigid item, in order, and must
/// return that item's natural extent given the space still free. The result
/// holds one allocation per item: the measured extent for rigid items and
/// the proportional share for flexed ones. The last positively weighted flex
/// item absorbs rounding so shares sum exactly to the remaining space.
/// Unbounded `available` leaves nothing for flex items.
pub fn solve_line<F>(modes: &[SizeMode], available: f32, mut measure: F) -> Vec<f32>
where
    F: FnMut(usize, f32) -> f32,
{
    let mut sizes = vec![0.0f32; modes.len()];
    let mut remaining = available;

    for (i, mode) in modes.iter().enumerate() {
        if mode.is_rigid() {
            let size = measure(i, remaining.max(0.0)).max(0.0);
            sizes[i] = size;
            remaining -= size;
        }
    }

    if !remaining.is_finite() || remaining <= 0.0 {
        return sizes;
    }

    let total_weight: f32 = modes.iter().map(|m| m.weight()).sum();
    if total_weight <= 0.0 {
        return sizes;
    }
    let last_grow = modes.iter().rposition(|m| m.weight() > 0.0);
    let mut allocated = 0.0f32;
    for (i, mode) in modes.iter().enumerate() {
        let w = mode.weight();
        if w <= 0.0 {
            continue;
        }
        let share = if Some(i) == last_grow {
            (remaining - allocated).max(0.0)
        } else {
            (remaining * w / total_weight).min(remaining - allocated)
        };
        sizes[i] = share;
        allocated += share;
    }
    sizes
}
