// SPDX-License-Identifier: MIT
//
// perdita-term: Terminal rendering engine for perdita.
//
// Turns a small inline markup language into styled terminal output. The
// pipeline is short: `markup` parses text into sections of
// instructions plus literal content, `Terminal` executes each section
// against a style/color state machine that only emits an escape sequence
// when something actually changes, and the cursor history remembers where
// recent writes landed so callers can jump back without recomputing.
//
// Every write is immediate. There is no frame buffer and no diffing: the
// state machine itself is what keeps redundant bytes off the wire.
//
// The terminal is driven directly through ANSI sequences and raw termios.

pub mod ansi;
pub mod color;
pub mod coord;
pub mod cursor;
pub mod error;
pub mod input;
pub mod markup;
pub mod style;
pub mod terminal;
pub mod tty;

pub use color::Rgb;
pub use coord::{Direction, Point, Size};
pub use error::{Error, Result};
pub use markup::{Instruction, MarkupError, Section};
pub use style::Attr;
pub use terminal::{Terminal, TerminalConfig, Wrap};
