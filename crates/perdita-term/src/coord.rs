// SPDX-License-Identifier: MIT
//
// Cell coordinates and terminal dimensions.
//
// Points are logical and 0-indexed. The translation to the terminal's
// 1-indexed addressing happens exactly once, when the cursor history
// commits a position. Nothing in this module knows about that.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

// ─── Direction ──────────────────────────────────────────────────────────────

/// A compass direction on the cell grid. North is up (decreasing `y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

// ─── Point ──────────────────────────────────────────────────────────────────

/// An integer cell coordinate.
///
/// Signed on purpose: layout arithmetic (padding subtracted from a region
/// end, relative moves) can step outside the screen, and the caller is the
/// one who decides whether that is an error.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// The top-left cell.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise sum.
    #[inline]
    #[must_use]
    pub const fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Shift by `dx` columns and `dy` rows.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// The neighbouring cell in `direction`.
    #[must_use]
    pub const fn displaced(self, direction: Direction) -> Self {
        match direction {
            Direction::North => self.offset(0, -1),
            Direction::East => self.offset(1, 0),
            Direction::South => self.offset(0, 1),
            Direction::West => self.offset(-1, 0),
        }
    }

    #[inline]
    #[must_use]
    pub const fn north(self) -> Self {
        self.displaced(Direction::North)
    }

    #[inline]
    #[must_use]
    pub const fn east(self) -> Self {
        self.displaced(Direction::East)
    }

    #[inline]
    #[must_use]
    pub const fn south(self) -> Self {
        self.displaced(Direction::South)
    }

    #[inline]
    #[must_use]
    pub const fn west(self) -> Self {
        self.displaced(Direction::West)
    }

    /// The four orthogonal neighbours: east, west, south, north.
    #[must_use]
    pub const fn adjacent(self) -> [Self; 4] {
        [self.east(), self.west(), self.south(), self.north()]
    }

    /// Directions to travel from `self` towards `other`, shortest leg first.
    ///
    /// Returns at most one horizontal and one vertical direction. Equal
    /// points yield an empty list.
    #[must_use]
    pub fn direction_to(self, other: Self) -> Vec<Direction> {
        let mut legs = Vec::with_capacity(2);

        if other.x > self.x {
            legs.push((Direction::East, other.x - self.x));
        } else if other.x < self.x {
            legs.push((Direction::West, self.x - other.x));
        }

        if other.y > self.y {
            legs.push((Direction::South, other.y - self.y));
        } else if other.y < self.y {
            legs.push((Direction::North, self.y - other.y));
        }

        legs.sort_by_key(|&(_, by)| by);
        legs.into_iter().map(|(d, _)| d).collect()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::add(self, rhs)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pt({}, {})", self.x, self.y)
    }
}

// `x|y` is the compact key form used when points are stored as map keys
// or written to disk.
impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.x, self.y)
    }
}

/// Error returned when a string is not in `x|y` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePointError(String);

impl fmt::Display for ParsePointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid point '{}', expected x|y", self.0)
    }
}

impl std::error::Error for ParsePointError {}

impl FromStr for Point {
    type Err = ParsePointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePointError(s.to_owned());
        let (x, y) = s.split_once('|').ok_or_else(err)?;
        let x = x.trim().parse().map_err(|_| err())?;
        let y = y.trim().parse().map_err(|_| err())?;
        Ok(Self::new(x, y))
    }
}

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
///
/// Zero in either axis means the size is unknown (stdout is not a TTY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

impl Size {
    #[inline]
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Total number of cells (`cols × rows`).
    #[inline]
    #[must_use]
    pub const fn area(self) -> u32 {
        self.cols as u32 * self.rows as u32
    }

    /// Whether both dimensions were actually reported.
    #[inline]
    #[must_use]
    pub const fn is_known(self) -> bool {
        self.cols > 0 && self.rows > 0
    }

    /// The bottom-right corner as an exclusive end point.
    #[inline]
    #[must_use]
    pub const fn as_point(self) -> Point {
        Point::new(self.cols as i32, self.rows as i32)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_offset_produce_new_points() {
        let p = Point::new(3, 4);
        assert_eq!(p.add(Point::new(1, -1)), Point::new(4, 3));
        assert_eq!(p.offset(-3, 2), Point::new(0, 6));
        assert_eq!(p + Point::new(2, 2), Point::new(5, 6));
        assert_eq!(p - Point::new(3, 4), Point::ORIGIN);
        // Original untouched.
        assert_eq!(p, Point::new(3, 4));
    }

    #[test]
    fn compass_helpers() {
        let p = Point::new(5, 5);
        assert_eq!(p.north(), Point::new(5, 4));
        assert_eq!(p.east(), Point::new(6, 5));
        assert_eq!(p.south(), Point::new(5, 6));
        assert_eq!(p.west(), Point::new(4, 5));
    }

    #[test]
    fn adjacent_lists_four_neighbours() {
        let around = Point::ORIGIN.adjacent();
        assert_eq!(
            around,
            [
                Point::new(1, 0),
                Point::new(-1, 0),
                Point::new(0, 1),
                Point::new(0, -1)
            ]
        );
    }

    #[test]
    fn direction_to_orders_shortest_leg_first() {
        let from = Point::new(0, 0);
        assert_eq!(
            from.direction_to(Point::new(5, 1)),
            vec![Direction::South, Direction::East]
        );
        assert_eq!(
            from.direction_to(Point::new(-1, -7)),
            vec![Direction::West, Direction::North]
        );
        assert_eq!(from.direction_to(Point::new(0, 3)), vec![Direction::South]);
        assert!(from.direction_to(from).is_empty());
    }

    #[test]
    fn display_and_parse_round_trip() {
        let p = Point::new(-2, 17);
        assert_eq!(p.to_string(), "-2|17");
        assert_eq!("-2|17".parse::<Point>().unwrap(), p);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("12".parse::<Point>().is_err());
        assert!("a|b".parse::<Point>().is_err());
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Point::new(1, 2)), "Pt(1, 2)");
    }

    #[test]
    fn size_area_and_known() {
        assert_eq!(Size::new(80, 24).area(), 1920);
        assert!(Size::new(80, 24).is_known());
        assert!(!Size::new(0, 24).is_known());
        assert!(!Size::default().is_known());
    }

    #[test]
    fn size_as_point() {
        assert_eq!(Size::new(80, 24).as_point(), Point::new(80, 24));
    }
}
