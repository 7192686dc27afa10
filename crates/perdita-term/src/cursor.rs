// SPDX-License-Identifier: MIT
//
// Cursor history: where recent writes landed.
//
// Every absolute cursor move pushes a position to the front of a bounded
// deque. The front entry is "current" until the caller steps back through
// history, at which point the current index points further in. Stepping
// never creates entries; only a new absolute move does, and that move
// snaps the index back to the front.
//
// Positions are stored 1-indexed, as the terminal addresses them.

use std::collections::VecDeque;

use crate::coord::Point;
use crate::error::{Error, Result};

/// Default number of positions remembered.
pub const DEFAULT_HISTORY_LIMIT: usize = 25;

/// Bounded, most-recent-first history of absolute cursor positions.
#[derive(Debug, Clone)]
pub struct CursorHistory {
    entries: VecDeque<Point>,
    /// Index into `entries`; 0 is the most recent push.
    current: usize,
    limit: usize,
}

impl CursorHistory {
    /// Create a history holding at most `limit` positions (minimum 1),
    /// seeded with the terminal origin `(1, 1)`.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        let mut entries = VecDeque::with_capacity(limit);
        entries.push_front(Point::new(1, 1));
        Self {
            entries,
            current: 0,
            limit,
        }
    }

    /// Maximum number of entries kept.
    #[inline]
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Number of entries held.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are held. Only possible after [`clear`](Self::clear).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the current entry (0 = most recent).
    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.current
    }

    /// The position the cursor is considered to be at.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCursorHistory`] if the history is empty.
    pub fn current(&self) -> Result<Point> {
        self.entries
            .get(self.current)
            .copied()
            .ok_or(Error::MissingCursorHistory)
    }

    /// Push a new 1-indexed position to the front and make it current.
    ///
    /// The oldest entries fall off once the limit is reached.
    pub fn push(&mut self, at: Point) {
        self.entries.push_front(at);
        if self.entries.len() > self.limit {
            self.entries.truncate(self.limit);
            tracing::trace!(limit = self.limit, "cursor history truncated");
        }
        self.current = 0;
    }

    /// Step to an older entry. Returns it, or `None` at the oldest.
    pub fn back(&mut self) -> Option<Point> {
        if self.current + 1 >= self.entries.len() {
            return None;
        }
        self.current += 1;
        self.entries.get(self.current).copied()
    }

    /// Step to a newer entry. Returns it, or `None` at the newest.
    pub fn forward(&mut self) -> Option<Point> {
        if self.current == 0 {
            return None;
        }
        self.current -= 1;
        self.entries.get(self.current).copied()
    }

    /// Move the current entry `cols` columns to the right.
    ///
    /// Used after visible text is written: the terminal's own cursor has
    /// advanced, so the record must follow it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCursorHistory`] if the history is empty.
    pub fn advance(&mut self, cols: i32) -> Result<()> {
        let entry = self
            .entries
            .get_mut(self.current)
            .ok_or(Error::MissingCursorHistory)?;
        entry.x += cols;
        Ok(())
    }

    /// Entries from most to least recent.
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.entries.iter().copied()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current = 0;
    }
}

impl Default for CursorHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_with_origin() {
        let h = CursorHistory::default();
        assert_eq!(h.len(), 1);
        assert_eq!(h.current().unwrap(), Point::new(1, 1));
        assert_eq!(h.limit(), DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn push_makes_front_current() {
        let mut h = CursorHistory::default();
        h.push(Point::new(5, 6));
        h.push(Point::new(7, 8));
        assert_eq!(h.current().unwrap(), Point::new(7, 8));
        assert_eq!(h.index(), 0);
        assert_eq!(
            h.iter().collect::<Vec<_>>(),
            vec![Point::new(7, 8), Point::new(5, 6), Point::new(1, 1)]
        );
    }

    #[test]
    fn length_never_exceeds_limit() {
        let mut h = CursorHistory::new(3);
        for i in 0..10 {
            h.push(Point::new(i, i));
            assert!(h.len() <= 3);
        }
        assert_eq!(
            h.iter().collect::<Vec<_>>(),
            vec![Point::new(9, 9), Point::new(8, 8), Point::new(7, 7)]
        );
    }

    #[test]
    fn zero_limit_keeps_one_entry() {
        let mut h = CursorHistory::new(0);
        h.push(Point::new(2, 2));
        assert_eq!(h.len(), 1);
        assert_eq!(h.current().unwrap(), Point::new(2, 2));
    }

    #[test]
    fn back_and_forward_are_clamped() {
        let mut h = CursorHistory::default();
        h.push(Point::new(2, 2));
        h.push(Point::new(3, 3));

        assert_eq!(h.forward(), None);
        assert_eq!(h.back(), Some(Point::new(2, 2)));
        assert_eq!(h.back(), Some(Point::new(1, 1)));
        assert_eq!(h.back(), None);
        assert_eq!(h.current().unwrap(), Point::new(1, 1));
        assert_eq!(h.forward(), Some(Point::new(2, 2)));
        assert_eq!(h.forward(), Some(Point::new(3, 3)));
        assert_eq!(h.forward(), None);
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn push_after_back_resets_index() {
        let mut h = CursorHistory::default();
        h.push(Point::new(2, 2));
        h.back();
        h.push(Point::new(9, 9));
        assert_eq!(h.index(), 0);
        assert_eq!(h.current().unwrap(), Point::new(9, 9));
    }

    #[test]
    fn advance_moves_current_entry_only() {
        let mut h = CursorHistory::default();
        h.push(Point::new(4, 4));
        h.advance(3).unwrap();
        assert_eq!(h.current().unwrap(), Point::new(7, 4));
        h.back();
        assert_eq!(h.current().unwrap(), Point::new(1, 1));
    }

    #[test]
    fn empty_history_errors() {
        let mut h = CursorHistory::default();
        h.clear();
        assert!(h.is_empty());
        assert!(matches!(h.current(), Err(Error::MissingCursorHistory)));
        assert!(matches!(h.advance(1), Err(Error::MissingCursorHistory)));
        assert_eq!(h.back(), None);
    }
}
