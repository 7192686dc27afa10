// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit; that's the `Terminal`'s job. This module
// just knows the byte-level encoding of every terminal command we need.
//
// Cursor positions passed here are already 1-indexed: the cursor history
// stores them that way, so the translation is not repeated.
use std::io::{self, Write};

use crate::color::Rgb;
use crate::coord::Point;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor with CUP (Cursor Position). `at` is 1-indexed.
#[inline]
pub fn cursor_to(w: &mut impl Write, at: Point) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", at.y, at.x)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Erase ───────────────────────────────────────────────────────────────────

/// Erase-in-display and erase-in-line variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Erase {
    /// ED 0: cursor to end of screen.
    ToScreenEnd,
    /// ED 1: start of screen to cursor.
    ToScreenStart,
    /// ED 2: whole screen.
    Screen,
    /// EL 0: cursor to end of line.
    ToLineEnd,
    /// EL 1: start of line to cursor.
    ToLineStart,
    /// EL 2: whole line.
    Line,
}

/// Emit an erase sequence. The cursor does not move.
pub fn erase(w: &mut impl Write, what: Erase) -> io::Result<()> {
    w.write_all(match what {
        Erase::ToScreenEnd => b"\x1b[0J",
        Erase::ToScreenStart => b"\x1b[1J",
        Erase::Screen => b"\x1b[2J",
        Erase::ToLineEnd => b"\x1b[0K",
        Erase::ToLineStart => b"\x1b[1K",
        Erase::Line => b"\x1b[2K",
    })
}

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    erase(w, Erase::Screen)
}

// ─── Screen save / restore ───────────────────────────────────────────────────

/// Save the screen contents (DEC private mode 47).
#[inline]
pub fn save_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?47h")
}

/// Restore the screen saved by [`save_screen`].
#[inline]
pub fn restore_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?47l")
}

// ─── SGR ─────────────────────────────────────────────────────────────────────

/// Reset all SGR attributes to terminal defaults (SGR 0).
///
/// This clears **everything**: bold, italic, colors, underline, all of it.
/// The style state must be cleared alongside.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// Emit a single SGR parameter: `ESC[{code}m`.
#[inline]
pub fn sgr(w: &mut impl Write, code: u8) -> io::Result<()> {
    write!(w, "\x1b[{code}m")
}

/// Set a 24-bit foreground color.
#[inline]
pub fn fg(w: &mut impl Write, c: Rgb) -> io::Result<()> {
    write!(w, "\x1b[38;2;{};{};{}m", c.r, c.g, c.b)
}

/// Set a 24-bit background color.
#[inline]
pub fn bg(w: &mut impl Write, c: Rgb) -> io::Result<()> {
    write!(w, "\x1b[48;2;{};{};{}m", c.r, c.g, c.b)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn cursor_to_is_row_then_column() {
        assert_eq!(emit(|w| cursor_to(w, Point::new(1, 1))), "\x1b[1;1H");
        assert_eq!(emit(|w| cursor_to(w, Point::new(11, 21))), "\x1b[21;11H");
    }

    #[test]
    fn cursor_visibility() {
        assert_eq!(emit(|w| cursor_hide(w)), "\x1b[?25l");
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }

    // ── Erase ───────────────────────────────────────────────────────────

    #[test]
    fn clear_screen_sequence() {
        assert_eq!(emit(|w| clear_screen(w)), "\x1b[2J");
    }

    #[test]
    fn erase_variants() {
        assert_eq!(emit(|w| erase(w, Erase::ToScreenEnd)), "\x1b[0J");
        assert_eq!(emit(|w| erase(w, Erase::ToScreenStart)), "\x1b[1J");
        assert_eq!(emit(|w| erase(w, Erase::ToLineEnd)), "\x1b[0K");
        assert_eq!(emit(|w| erase(w, Erase::ToLineStart)), "\x1b[1K");
        assert_eq!(emit(|w| erase(w, Erase::Line)), "\x1b[2K");
    }

    #[test]
    fn screen_save_restore() {
        assert_eq!(emit(|w| save_screen(w)), "\x1b[?47h");
        assert_eq!(emit(|w| restore_screen(w)), "\x1b[?47l");
    }

    // ── SGR ─────────────────────────────────────────────────────────────

    #[test]
    fn reset_sequence() {
        assert_eq!(emit(|w| reset(w)), "\x1b[0m");
    }

    #[test]
    fn sgr_wraps_code() {
        assert_eq!(emit(|w| sgr(w, 1)), "\x1b[1m");
        assert_eq!(emit(|w| sgr(w, 29)), "\x1b[29m");
    }

    #[test]
    fn true_color_sequences() {
        assert_eq!(emit(|w| fg(w, Rgb::new(255, 0, 0))), "\x1b[38;2;255;0;0m");
        assert_eq!(emit(|w| bg(w, Rgb::new(0, 0, 255))), "\x1b[48;2;0;0;255m");
    }

    #[test]
    fn out_of_range_colors_pass_through() {
        assert_eq!(emit(|w| fg(w, Rgb::new(300, -1, 0))), "\x1b[38;2;300;-1;0m");
    }
}
