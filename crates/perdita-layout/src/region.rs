//! Regions, padding, and fractional sub-division details.
//!
//! A region's two corners are [`Endpoint`]s: either a fixed point or a
//! closure over the terminal size, evaluated on every read. The end corner
//! is exclusive on both axes, so `width = end.x - start.x` and the last
//! drawable column is `end.x - 1`.

use std::fmt;
use std::rc::Rc;

use perdita_term::{Point, Size};

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// One corner of a region.
#[derive(Clone)]
pub enum Endpoint {
    Fixed(Point),
    /// Recomputed from the terminal size on every access.
    Computed(Rc<dyn Fn(Size) -> Point>),
}

impl Endpoint {
    /// A corner computed from the terminal size.
    pub fn computed(f: impl Fn(Size) -> Point + 'static) -> Self {
        Self::Computed(Rc::new(f))
    }

    /// The corner's position at terminal size `size`.
    #[must_use]
    pub fn resolve(&self, size: Size) -> Point {
        match self {
            Self::Fixed(p) => *p,
            Self::Computed(f) => f(size),
        }
    }
}

impl From<Point> for Endpoint {
    fn from(p: Point) -> Self {
        Self::Fixed(p)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(p) => f.debug_tuple("Fixed").field(p).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// A rectangle with an inclusive start and exclusive end.
#[derive(Debug, Clone)]
pub struct Region {
    pub start: Endpoint,
    pub end: Endpoint,
}

impl Region {
    pub fn new(start: impl Into<Endpoint>, end: impl Into<Endpoint>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// The whole terminal, whatever its size at the time of asking.
    #[must_use]
    pub fn full_screen() -> Self {
        Self::new(Point::ORIGIN, Endpoint::computed(Size::as_point))
    }

    #[must_use]
    pub fn start(&self, size: Size) -> Point {
        self.start.resolve(size)
    }

    #[must_use]
    pub fn end(&self, size: Size) -> Point {
        self.end.resolve(size)
    }

    #[must_use]
    pub fn width(&self, size: Size) -> i32 {
        self.end(size).x - self.start(size).x
    }

    #[must_use]
    pub fn height(&self, size: Size) -> i32 {
        self.end(size).y - self.start(size).y
    }
}

// ---------------------------------------------------------------------------
// Padding
// ---------------------------------------------------------------------------

/// Insets from each edge of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Padding {
    #[must_use]
    pub const fn new(top: u16, right: u16, bottom: u16, left: u16) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The same inset on all four sides.
    #[must_use]
    pub const fn uniform(n: u16) -> Self {
        Self::new(n, n, n, n)
    }

    /// Add `n` to every side.
    #[must_use]
    pub const fn grow(self, n: u16) -> Self {
        Self::new(
            self.top.saturating_add(n),
            self.right.saturating_add(n),
            self.bottom.saturating_add(n),
            self.left.saturating_add(n),
        )
    }

    /// Subtract `n` from every side, stopping at zero.
    #[must_use]
    pub const fn shrink(self, n: u16) -> Self {
        Self::new(
            self.top.saturating_sub(n),
            self.right.saturating_sub(n),
            self.bottom.saturating_sub(n),
            self.left.saturating_sub(n),
        )
    }
}

// ---------------------------------------------------------------------------
// Inset / sub-division details
// ---------------------------------------------------------------------------

/// Which rectangle a corner move refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Inset {
    /// Inside the padding (and border).
    #[default]
    Padded,
    /// The raw region, border included.
    Unpadded,
}

/// Position of a sub-pane, as fractions of the parent's padded size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

/// Size of a sub-pane, as fractions of the parent's padded size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
        }
    }
}

/// One sub-pane request for [`Pane::split`](crate::Pane::split).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaneDetails {
    pub offset: Offset,
    pub dimensions: Dimensions,
}

impl PaneDetails {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            offset: Offset { x, y },
            dimensions: Dimensions { width, height },
        }
    }

    /// Left half of the parent.
    pub const LEFT_HALF: Self = Self::new(0.0, 0.0, 0.5, 1.0);
    /// Right half of the parent.
    pub const RIGHT_HALF: Self = Self::new(0.5, 0.0, 0.5, 1.0);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
