#![forbid(unsafe_code)]

//! Per-frame layout accumulator with same-line grouping.
//!
//! Widget calls append render ops in call order. The accumulator groups them
//! into a vertical sequence of [`Line`]s: a line is either a single item or a
//! horizontal row. Rows come from two places:
//!
//! - [`begin_same_line`](LayoutAccumulator::begin_same_line) /
//!   [`with_same_line`](LayoutAccumulator::with_same_line): everything
//!   appended inside the scope shares one row, flexed with weight 1 unless a
//!   sizing mode override is active.
//! - [`same_line`](LayoutAccumulator::same_line): retroactive. Pulls the most
//!   recently appended line back out of the column and makes the *next*
//!   append join it. A finished row comes back whole, as one rigid element
//!   of the new row, so its own split is left as it was.
//!
//! # Design Invariants
//!
//! 1. **Visual order is call order** along both axes.
//! 2. **One pending row at most**: the row buffer is flushed into the column
//!    before any unrelated single item is appended.
//! 3. **O(1) retroactive join**: `same_line` pops one line and never rescans.
//! 4. **Grouping state is per frame**: [`reset`](LayoutAccumulator::reset)
//!    clears everything, and [`finalize`](LayoutAccumulator::finalize)
//!    consumes the appended items.
//!
//! # Failure Modes
//!
//! | Misuse | Behavior |
//! |--------|----------|
//! | `same_line` before any append | No-op, logged at `debug` |
//! | Scope with no items | Leaves an empty row that lays out as zero size |
//! | Line too full for its flexed items | Flexed items get zero extent |

use imkit_core::draw::DrawList;
use imkit_core::geometry::{Point, Rect, Size};

use crate::{Constraints, Direction, SizeMode, solve_line};

/// Deferred render operation.
///
/// Called exactly once during [`LayoutAccumulator::finalize`] with the
/// context `C`, a draw list whose origin is the item's top-left corner, and
/// the constraints the line solver assigned. Returns the size it used.
pub type RenderOp<C> = Box<dyn FnOnce(&mut C, &mut DrawList, Constraints) -> Size>;

/// One appended render op with its sizing mode.
pub struct LayoutItem<C> {
    mode: SizeMode,
    key: Option<String>,
    render: RenderOp<C>,
}

impl<C> LayoutItem<C> {
    #[must_use]
    pub fn mode(&self) -> SizeMode {
        self.mode
    }

    /// Placement key, if the item asked for its final rectangle.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    fn render(self, cx: &mut C, constraints: Constraints) -> Measured {
        let mut draw = DrawList::new();
        let size = constraints.constrain((self.render)(cx, &mut draw, constraints));
        let placements = self
            .key
            .map(|key| Placement {
                key,
                rect: Rect::from_size(size),
            })
            .into_iter()
            .collect();
        Measured {
            size,
            draw,
            placements,
        }
    }
}

impl<C> std::fmt::Debug for LayoutItem<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutItem")
            .field("mode", &self.mode)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// One entry of the vertical sequence.
#[derive(Debug)]
pub enum Line<C> {
    Single(LayoutItem<C>),
    /// Horizontal row; rigid within the column. An element is itself a row
    /// when [`LayoutAccumulator::same_line`] followed a finished row.
    Row(Vec<Line<C>>),
}

impl<C> Line<C> {
    /// Number of elements in the line. A nested row counts once.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Row(elements) => elements.len(),
        }
    }

    /// Number of appended items, counting into nested rows.
    #[must_use]
    pub fn item_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Row(elements) => elements.iter().map(Line::item_count).sum(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_row(&self) -> bool {
        matches!(self, Self::Row(_))
    }

    fn mode(&self) -> SizeMode {
        match self {
            Self::Single(item) => item.mode,
            Self::Row(_) => SizeMode::Rigid,
        }
    }
}

/// Final rectangle of a keyed item, relative to the finalize origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub key: String,
    pub rect: Rect,
}

/// Result of [`LayoutAccumulator::finalize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arranged {
    /// Space used by the whole sequence.
    pub size: Size,
    /// Rectangles of keyed items, in call order.
    pub placements: Vec<Placement>,
}

/// Token returned by [`LayoutAccumulator::begin_same_line`].
#[derive(Debug)]
#[must_use = "pass the scope back to end_same_line"]
pub struct LineScope {
    was_open: bool,
}

/// Token returned by [`LayoutAccumulator::begin_sizing_mode`].
#[derive(Debug)]
#[must_use = "pass the scope back to end_sizing_mode"]
pub struct ModeScope {
    previous: Option<SizeMode>,
}

#[derive(Debug, Default, Clone, Copy)]
struct LineGrouping {
    /// A same-line scope is open; appends go into the row buffer.
    scope_open: bool,
    /// One-shot: the next append joins the row buffer.
    join_next: bool,
    mode_override: Option<SizeMode>,
}

#[derive(Default)]
struct Measured {
    size: Size,
    draw: DrawList,
    placements: Vec<Placement>,
}

/// Collects render ops for one frame and lays them out.
pub struct LayoutAccumulator<C> {
    direction: Direction,
    lines: Vec<Line<C>>,
    row: Option<Vec<Line<C>>>,
    grouping: LineGrouping,
}

impl<C> Default for LayoutAccumulator<C> {
    fn default() -> Self {
        Self::new(Direction::Vertical)
    }
}

impl<C> std::fmt::Debug for LayoutAccumulator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutAccumulator")
            .field("direction", &self.direction)
            .field("lines", &self.lines.len())
            .field("row_open", &self.row.is_some())
            .field("grouping", &self.grouping)
            .finish()
    }
}

impl<C> LayoutAccumulator<C> {
    /// Accumulator whose line sequence runs along `direction`; rows run
    /// across it.
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            lines: Vec::new(),
            row: None,
            grouping: LineGrouping::default(),
        }
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Drop all items and grouping state.
    pub fn reset(&mut self) {
        self.lines.clear();
        self.row = None;
        self.grouping = LineGrouping::default();
    }

    /// Append a render op.
    pub fn append<F>(&mut self, render: F)
    where
        F: FnOnce(&mut C, &mut DrawList, Constraints) -> Size + 'static,
    {
        self.push_item(None, Box::new(render));
    }

    /// Append a render op whose final rectangle is reported under `key`.
    pub fn append_keyed<F>(&mut self, key: impl Into<String>, render: F)
    where
        F: FnOnce(&mut C, &mut DrawList, Constraints) -> Size + 'static,
    {
        self.push_item(Some(key.into()), Box::new(render));
    }

    fn push_item(&mut self, key: Option<String>, render: RenderOp<C>) {
        let g = &mut self.grouping;
        let mode = g.mode_override.unwrap_or(if g.scope_open {
            SizeMode::Flexed(1.0)
        } else {
            SizeMode::Rigid
        });
        let item = LayoutItem { mode, key, render };
        if g.scope_open || g.join_next {
            g.join_next = false;
            self.row.get_or_insert_with(Vec::new).push(Line::Single(item));
        } else {
            self.flush_pending_line();
            self.lines.push(Line::Single(item));
        }
    }

    /// Move the pending row, if any, into the line sequence.
    pub fn flush_pending_line(&mut self) {
        if let Some(items) = self.row.take() {
            self.lines.push(Line::Row(items));
        }
    }

    /// Open a same-line scope. Pair with [`end_same_line`](Self::end_same_line).
    ///
    /// A row left over from an earlier, already-consumed grouping is flushed
    /// first so the scope starts a fresh row; a row armed by
    /// [`same_line`](Self::same_line) is joined instead.
    pub fn begin_same_line(&mut self) -> LineScope {
        let g = self.grouping;
        if self.row.is_some() && !g.join_next && !g.scope_open {
            self.flush_pending_line();
        }
        let was_open = g.scope_open;
        self.grouping.scope_open = true;
        LineScope { was_open }
    }

    pub fn end_same_line(&mut self, scope: LineScope) {
        self.grouping.scope_open = scope.was_open;
    }

    /// Run `body` inside a same-line scope.
    pub fn with_same_line<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        let scope = self.begin_same_line();
        let out = body(self);
        self.end_same_line(scope);
        out
    }

    /// Make the next append share a row with the previous line.
    ///
    /// The previous line becomes the first element of a new row whatever its
    /// shape; a finished row is nested rather than reopened.
    pub fn same_line(&mut self) {
        if self.row.is_none() {
            match self.lines.pop() {
                Some(line) => self.row = Some(vec![line]),
                None => {
                    imkit_core::debug!("same_line with nothing to join; ignored");
                    return;
                }
            }
        }
        self.grouping.join_next = true;
    }

    /// Force a sizing mode for appends until the matching
    /// [`end_sizing_mode`](Self::end_sizing_mode).
    pub fn begin_sizing_mode(&mut self, mode: SizeMode) -> ModeScope {
        let previous = self.grouping.mode_override.replace(mode);
        ModeScope { previous }
    }

    pub fn end_sizing_mode(&mut self, scope: ModeScope) {
        self.grouping.mode_override = scope.previous;
    }

    /// Run `body` with `mode` forced for its appends.
    pub fn with_sizing_mode<R>(&mut self, mode: SizeMode, body: impl FnOnce(&mut Self) -> R) -> R {
        let scope = self.begin_sizing_mode(mode);
        let out = body(self);
        self.end_sizing_mode(scope);
        out
    }

    /// Lines appended so far, not counting an unflushed row.
    #[must_use]
    pub fn lines(&self) -> &[Line<C>] {
        &self.lines
    }

    /// Number of appended items, including the pending row.
    #[must_use]
    pub fn item_count(&self) -> usize {
        let pending = self.row.iter().flatten().map(Line::item_count).sum::<usize>();
        self.lines.iter().map(Line::item_count).sum::<usize>() + pending
    }

    /// Shape of the line sequence as element counts per line, flushing the
    /// pending row first. Rows report their length; singles report 1.
    pub fn line_shape(&mut self) -> Vec<(bool, usize)> {
        self.flush_pending_line();
        self.lines.iter().map(|l| (l.is_row(), l.len())).collect()
    }

    /// Lay out everything appended this frame and render it into `out` at
    /// `origin`. Consumes the appended items and clears grouping state.
    pub fn finalize(
        &mut self,
        cx: &mut C,
        origin: Point,
        constraints: Constraints,
        out: &mut DrawList,
    ) -> Arranged {
        self.flush_pending_line();
        let lines = std::mem::take(&mut self.lines);
        self.grouping = LineGrouping::default();

        let across = self.direction.cross();
        let measured = layout_line(lines, self.direction, constraints, cx, Line::mode, |line, cx, c| {
            render_line(line, across, cx, c)
        });

        let size = constraints.constrain(measured.size);
        out.append_translated(measured.draw, origin);
        let placements = measured
            .placements
            .into_iter()
            .map(|p| Placement {
                key: p.key,
                rect: p.rect.translate(origin),
            })
            .collect();
        Arranged { size, placements }
    }
}

/// Render one line; rows, nested ones included, run along `across`.
fn render_line<C>(line: Line<C>, across: Direction, cx: &mut C, constraints: Constraints) -> Measured {
    match line {
        Line::Single(item) => item.render(cx, constraints),
        Line::Row(elements) => layout_line(elements, across, constraints, cx, Line::mode, |l, cx, c| {
            render_line(l, across, cx, c)
        }),
    }
}

/// Solve and render one line of children along `direction`.
fn layout_line<C, T>(
    children: Vec<T>,
    direction: Direction,
    constraints: Constraints,
    cx: &mut C,
    mode_of: impl Fn(&T) -> SizeMode,
    mut render: impl FnMut(T, &mut C, Constraints) -> Measured,
) -> Measured {
    let modes: Vec<SizeMode> = children.iter().map(&mode_of).collect();
    let mut slots: Vec<Option<T>> = children.into_iter().map(Some).collect();
    let mut measured: Vec<Option<Measured>> = std::iter::repeat_with(|| None).take(modes.len()).collect();
    let cross_max = direction.cross_of(constraints.max);
    let child_constraints = |min_main: f32, max_main: f32| {
        Constraints::new(
            direction.pack(min_main, 0.0),
            direction.pack(max_main, cross_max),
        )
    };

    let alloc = solve_line(&modes, direction.main_of(constraints.max), |i, remaining| {
        let Some(child) = slots[i].take() else {
            return 0.0;
        };
        let m = render(child, &mut *cx, child_constraints(0.0, remaining));
        let main = direction.main_of(m.size);
        measured[i] = Some(m);
        main
    });

    for (i, slot) in slots.iter_mut().enumerate() {
        if let Some(child) = slot.take() {
            measured[i] = Some(render(child, &mut *cx, child_constraints(alloc[i], alloc[i])));
        }
    }

    let mut out = Measured::default();
    let mut cursor = 0.0f32;
    let mut cross = 0.0f32;
    for (i, m) in measured.into_iter().enumerate() {
        let Some(m) = m else { continue };
        let offset = direction.offset(cursor);
        out.draw.append_translated(m.draw, offset);
        out.placements.extend(m.placements.into_iter().map(|p| Placement {
            key: p.key,
            rect: p.rect.translate(offset),
        }));
        cursor += alloc[i];
        cross = cross.max(direction.cross_of(m.size));
    }
    out.size = direction.pack(cursor, cross);
    out
}
