// SPDX-License-Identifier: MIT
//
// Crate-level error type.
//
// Markup errors are input errors and come back to whoever handed us the
// text. I/O errors come from the output sink. Neither is retried here.

use std::fmt;
use std::io;

use crate::markup::MarkupError;

/// Errors produced while rendering to a [`Terminal`](crate::Terminal).
#[derive(Debug)]
pub enum Error {
    /// The markup passed to a write could not be parsed.
    Markup(MarkupError),
    /// The cursor history was read while empty.
    ///
    /// The history is seeded with the origin on construction, so seeing
    /// this means the history was tampered with.
    MissingCursorHistory,
    /// The output sink (or stdin, for key reads) failed.
    Io(io::Error),
}

/// Shorthand for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markup(e) => write!(f, "markup error: {e}"),
            Self::MissingCursorHistory => f.write_str("no current cursor location exists"),
            Self::Io(e) => write!(f, "terminal i/o error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Markup(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::MissingCursorHistory => None,
        }
    }
}

impl From<MarkupError> for Error {
    fn from(e: MarkupError) -> Self {
        Self::Markup(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
