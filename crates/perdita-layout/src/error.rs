//! Layout errors.

use std::fmt;
use std::io;

use perdita_term::Point;

/// Errors raised by pane operations.
#[derive(Debug)]
pub enum LayoutError {
    /// A move would put the cursor outside the pane's padded region.
    OutOfBounds { point: Point, start: Point, end: Point },
    /// A newline would land on or below the padded bottom edge.
    ReturnExceedsHeight { row: i32, bottom: i32 },
    /// The terminal failed underneath us.
    Term(perdita_term::Error),
}

impl LayoutError {
    /// True for both bounds variants. A newline past the bottom is an
    /// out-of-bounds move too.
    #[must_use]
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            Self::OutOfBounds { .. } | Self::ReturnExceedsHeight { .. }
        )
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { point, start, end } => write!(
                f,
                "{point:?} is outside the pane ({start:?} to {end:?})"
            ),
            Self::ReturnExceedsHeight { row, bottom } => write!(
                f,
                "newline to row {row} exceeds the pane's bottom edge at row {bottom}"
            ),
            Self::Term(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Term(e) => Some(e),
            _ => None,
        }
    }
}

impl From<perdita_term::Error> for LayoutError {
    fn from(e: perdita_term::Error) -> Self {
        Self::Term(e)
    }
}

impl From<io::Error> for LayoutError {
    fn from(e: io::Error) -> Self {
        Self::Term(perdita_term::Error::Io(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_bounds_variants_are_out_of_bounds() {
        let oob = LayoutError::OutOfBounds {
            point: Point::new(9, 9),
            start: Point::ORIGIN,
            end: Point::new(5, 5),
        };
        let ret = LayoutError::ReturnExceedsHeight { row: 5, bottom: 5 };
        assert!(oob.is_out_of_bounds());
        assert!(ret.is_out_of_bounds());
        assert!(!LayoutError::from(perdita_term::Error::MissingCursorHistory).is_out_of_bounds());
    }

    #[test]
    fn display_names_the_rows() {
        let ret = LayoutError::ReturnExceedsHeight { row: 7, bottom: 6 };
        assert_eq!(
            ret.to_string(),
            "newline to row 7 exceeds the pane's bottom edge at row 6"
        );
    }

    #[test]
    fn io_errors_wrap_as_term() {
        let err = LayoutError::from(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        assert!(matches!(err, LayoutError::Term(perdita_term::Error::Io(_))));
    }
}
