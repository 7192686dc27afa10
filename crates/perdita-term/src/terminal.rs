// SPDX-License-Identifier: MIT
//
// Terminal: the style/color state machine and its output sink.
//
// One `Terminal` exists per output stream. It owns:
//
//   - the sink every byte goes through (stdout in the binary, a Vec in tests)
//   - the last-emitted style (attributes, foreground, background)
//   - the cursor history, whose current entry is the logical cursor
//   - the terminal size used for clipping and full-screen layout
//
// Style transitions are idempotent: turning on an attribute that is already
// on, or setting the color that is already set, writes nothing. The one
// exception is `reset_all`, which always emits SGR 0. Markup execution calls
// it after every section so that no instruction outlives its own content.
//
// Writes are immediate: each public call writes and flushes before it
// returns. Nothing is batched across calls.

use std::io::{self, Write};

use unicode_width::UnicodeWidthStr;

use crate::ansi::{self, Erase};
use crate::color::Rgb;
use crate::coord::{Point, Size};
use crate::cursor::{CursorHistory, DEFAULT_HISTORY_LIMIT};
use crate::error::Result;
use crate::markup::{self, clip_to_columns, Instruction, Section};
use crate::style::{Attr, StyleState};
use crate::tty;

// ─── Configuration ──────────────────────────────────────────────────────────

/// What to do with text that runs past the right edge of the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Wrap {
    /// Let the terminal wrap it onto the next row.
    #[default]
    Allow,
    /// Cut it at the last column of the current row.
    Clip,
}

/// Construction-time settings for a [`Terminal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalConfig {
    /// Positions kept by the cursor history.
    pub history_limit: usize,
    /// Foreground restored after every markup section.
    pub default_foreground: Rgb,
    /// Background restored after every markup section.
    pub default_background: Rgb,
    /// Wrapping used for markup content.
    pub wrap: Wrap,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            default_foreground: Rgb::WHITE,
            default_background: Rgb::BLACK,
            wrap: Wrap::Allow,
        }
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Style/color state machine over an output sink.
///
/// ```
/// use perdita_term::{Size, Terminal};
///
/// let mut term = Terminal::new(Vec::new(), Size::new(80, 24))?;
/// term.set_cursor(0, 0)?;
/// term.write_markup("|b>Hello| world")?;
/// assert_eq!(term.cursor_position()?.x, 11);
/// # Ok::<(), perdita_term::Error>(())
/// ```
pub struct Terminal<W: Write> {
    out: W,
    style: StyleState,
    cursor: CursorHistory,
    size: Size,
    config: TerminalConfig,
}

impl Terminal<io::Stdout> {
    /// A terminal on stdout, sized from the tty (0×0 if not a tty).
    ///
    /// # Errors
    ///
    /// Returns an error if the initial style reset cannot be written.
    pub fn stdout(config: TerminalConfig) -> Result<Self> {
        let size = tty::get_size().unwrap_or_default();
        Self::with_config(io::stdout(), size, config)
    }

    /// Re-query the tty size. Call after SIGWINCH.
    ///
    /// Keeps the previous size if the query fails.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(s) = tty::get_size() {
            if s != self.size {
                tracing::debug!(cols = s.cols, rows = s.rows, "terminal resized");
            }
            self.size = s;
        }
        self.size
    }
}

impl<W: Write> Terminal<W> {
    /// Create a terminal with default settings.
    ///
    /// Emits a full style reset followed by the default colors, so the
    /// recorded state matches the stream from the first byte on.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the reset.
    pub fn new(out: W, size: Size) -> Result<Self> {
        Self::with_config(out, size, TerminalConfig::default())
    }

    /// Create a terminal with explicit settings. See [`new`](Self::new).
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the reset.
    pub fn with_config(out: W, size: Size, config: TerminalConfig) -> Result<Self> {
        let mut term = Self {
            out,
            style: StyleState::new(),
            cursor: CursorHistory::new(config.history_limit),
            size,
            config,
        };
        term.reset_all()?;
        term.reset_color()?;
        Ok(term)
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &TerminalConfig {
        &self.config
    }

    /// The last-emitted style.
    #[inline]
    #[must_use]
    pub const fn style(&self) -> &StyleState {
        &self.style
    }

    #[inline]
    #[must_use]
    pub const fn history(&self) -> &CursorHistory {
        &self.cursor
    }

    /// The output sink.
    #[inline]
    pub const fn output(&self) -> &W {
        &self.out
    }

    /// Mutable access to the sink, e.g. to drain a test buffer.
    #[inline]
    pub const fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Consume the terminal and return the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    // ── Size ────────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Columns, 0 if unknown.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.size.cols
    }

    /// Rows, 0 if unknown.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.size.rows
    }

    /// Record a new size (from a resize event or a test).
    pub const fn resize(&mut self, size: Size) {
        self.size = size;
    }

    // ── Output ──────────────────────────────────────────────────────

    fn emit(&mut self, f: impl FnOnce(&mut W) -> io::Result<()>) -> Result<()> {
        f(&mut self.out)?;
        self.out.flush()?;
        Ok(())
    }

    /// Write visible text at the cursor and advance the logical column by
    /// its display width.
    ///
    /// With [`Wrap::Clip`] the text is cut, at a grapheme boundary, to the
    /// columns left on the current row. An unknown width never clips.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails or the cursor history is empty.
    pub fn write(&mut self, content: &str, wrap: Wrap) -> Result<()> {
        let visible = match (wrap, self.remaining_columns()?) {
            (Wrap::Clip, Some(cols)) => clip_to_columns(content, cols),
            _ => content,
        };
        self.emit(|w| w.write_all(visible.as_bytes()))?;
        let cols = i32::try_from(visible.width()).unwrap_or(i32::MAX);
        self.cursor.advance(cols)
    }

    /// Write a control sequence. The logical column does not move.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn write_escaped(&mut self, sequence: &str) -> Result<()> {
        self.emit(|w| w.write_all(sequence.as_bytes()))
    }

    /// Columns from the cursor to the right edge, inclusive of the cursor's
    /// own cell. `None` when the width is unknown.
    fn remaining_columns(&self) -> Result<Option<usize>> {
        if self.size.cols == 0 {
            return Ok(None);
        }
        let col = self.cursor.current()?.x;
        let left = (i32::from(self.size.cols) - col + 1).max(0);
        Ok(Some(usize::try_from(left).unwrap_or(0)))
    }

    // ── Markup ──────────────────────────────────────────────────────

    /// Parse `markup` and render each section. See [`write_sections`](Self::write_sections).
    ///
    /// # Errors
    ///
    /// Returns a markup error before anything is written, or an I/O error.
    pub fn write_markup(&mut self, markup: &str) -> Result<()> {
        let sections = markup::parse(markup)?;
        self.write_sections(&sections)
    }

    /// Render parsed sections: apply instructions, write content, then
    /// reset style and color unconditionally.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn write_sections(&mut self, sections: &[Section]) -> Result<()> {
        self.write_sections_with(sections, self.config.wrap)
    }

    /// [`write_sections`](Self::write_sections) with an explicit wrap mode
    /// in place of the configured one.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn write_sections_with(&mut self, sections: &[Section], wrap: Wrap) -> Result<()> {
        for section in sections {
            for instruction in &section.instructions {
                self.apply(instruction)?;
            }
            self.write(&section.content, wrap)?;
            self.reset_all()?;
            self.reset_color()?;
        }
        Ok(())
    }

    /// Execute one instruction against the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn apply(&mut self, instruction: &Instruction) -> Result<()> {
        match *instruction {
            Instruction::BoldOn => self.style_on(Attr::BOLD),
            Instruction::DimOn => self.style_on(Attr::DIM),
            Instruction::ItalicOn => self.style_on(Attr::ITALIC),
            Instruction::UnderlineOn => self.style_on(Attr::UNDERLINE),
            Instruction::StrikethroughOn => self.style_on(Attr::STRIKETHROUGH),
            Instruction::Inverse => self.style_on(Attr::INVERSE),
            Instruction::Foreground(c) => self.set_foreground(c),
            Instruction::Background(c) => self.set_background(c),
        }
    }

    // ── Style ───────────────────────────────────────────────────────

    /// Turn attributes on. Flags already on emit nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn style_on(&mut self, attr: Attr) -> Result<()> {
        let newly = self.style.enable(attr);
        for code in newly.iter().filter_map(Attr::sgr_on) {
            self.emit(|w| ansi::sgr(w, code))?;
        }
        Ok(())
    }

    /// Turn attributes off. Flags already off emit nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn style_off(&mut self, attr: Attr) -> Result<()> {
        let was = self.style.disable(attr);
        for code in was.iter().filter_map(Attr::sgr_off) {
            self.emit(|w| ansi::sgr(w, code))?;
        }
        Ok(())
    }

    /// Emit SGR 0 regardless of state and forget every attribute and color.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn reset_all(&mut self) -> Result<()> {
        self.emit(|w| ansi::reset(w))?;
        self.style.clear();
        Ok(())
    }

    /// Set the foreground unless it is already `color`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn set_foreground(&mut self, color: Rgb) -> Result<()> {
        if self.style.swap_foreground(color) {
            self.emit(|w| ansi::fg(w, color))?;
        }
        Ok(())
    }

    /// Set the background unless it is already `color`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn set_background(&mut self, color: Rgb) -> Result<()> {
        if self.style.swap_background(color) {
            self.emit(|w| ansi::bg(w, color))?;
        }
        Ok(())
    }

    /// Restore the configured default background and foreground.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn reset_color(&mut self) -> Result<()> {
        self.set_background(self.config.default_background)?;
        self.set_foreground(self.config.default_foreground)
    }

    // ── Cursor ──────────────────────────────────────────────────────

    /// Move the cursor to logical `(x, y)` and record it in history.
    /// Negative coordinates stop at the screen edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn set_cursor(&mut self, x: i32, y: i32) -> Result<()> {
        let at = Point::new(x.max(0).saturating_add(1), y.max(0).saturating_add(1));
        self.cursor.push(at);
        self.emit(|w| ansi::cursor_to(w, at))
    }

    /// Logical (0-indexed) cursor position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCursorHistory`](crate::Error::MissingCursorHistory)
    /// if the history is empty.
    pub fn cursor_position(&self) -> Result<Point> {
        Ok(self.cursor.current()? - Point::new(1, 1))
    }

    /// Return to the previous position in history. `false` at the oldest.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn cursor_back(&mut self) -> Result<bool> {
        match self.cursor.back() {
            Some(at) => self.emit(|w| ansi::cursor_to(w, at)).map(|()| true),
            None => Ok(false),
        }
    }

    /// Redo a [`cursor_back`](Self::cursor_back). `false` at the newest.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn cursor_forward(&mut self) -> Result<bool> {
        match self.cursor.forward() {
            Some(at) => self.emit(|w| ansi::cursor_to(w, at)).map(|()| true),
            None => Ok(false),
        }
    }

    /// Move relative to the current logical position.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails or the history is empty.
    pub fn move_cursor_by(&mut self, dx: i32, dy: i32) -> Result<()> {
        let p = self.cursor_position()?;
        self.set_cursor(p.x + dx, p.y + dy)
    }

    /// # Errors
    ///
    /// See [`move_cursor_by`](Self::move_cursor_by).
    pub fn move_up(&mut self, times: i32) -> Result<()> {
        self.move_cursor_by(0, -times)
    }

    /// # Errors
    ///
    /// See [`move_cursor_by`](Self::move_cursor_by).
    pub fn move_down(&mut self, times: i32) -> Result<()> {
        self.move_cursor_by(0, times)
    }

    /// # Errors
    ///
    /// See [`move_cursor_by`](Self::move_cursor_by).
    pub fn move_left(&mut self, times: i32) -> Result<()> {
        self.move_cursor_by(-times, 0)
    }

    /// # Errors
    ///
    /// See [`move_cursor_by`](Self::move_cursor_by).
    pub fn move_right(&mut self, times: i32) -> Result<()> {
        self.move_cursor_by(times, 0)
    }

    // ── Screen ──────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn hide_cursor(&mut self) -> Result<()> {
        self.emit(|w| ansi::cursor_hide(w))
    }

    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn show_cursor(&mut self) -> Result<()> {
        self.emit(|w| ansi::cursor_show(w))
    }

    /// Erase the whole screen and home the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn clear_screen(&mut self) -> Result<()> {
        self.emit(|w| ansi::clear_screen(w))?;
        self.set_cursor(0, 0)
    }

    /// Erase part of the screen or line without moving the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn erase(&mut self, what: Erase) -> Result<()> {
        self.emit(|w| ansi::erase(w, what))
    }

    /// Exit housekeeping: plain style, visible cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn restore(&mut self) -> Result<()> {
        self.reset_all()?;
        self.show_cursor()
    }
}

/// The longest prefix of `content`, cut at a grapheme boundary, that fits
/// in `columns` cells.
// ─── Tests ───────────────────────────────────────────────────────────────────
