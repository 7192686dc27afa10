//! Pane: a padded, optionally bordered view over a terminal region.
//!
//! A pane owns no terminal state. It holds its geometry (region, padding,
//! border width) and the last cursor position it wrote to, so it can take
//! the cursor back with [`Pane::focus`] after another pane has moved it.
//!
//! # Geometry
//!
//! ```text
//! start ─► ┌──────────┤title├──────────┐
//!          │ padded_start              │
//!          │   ┌───────────────────┐   │
//!          │   │  drawable area    │   │
//!          │   └───────────────────┘   │
//!          │               padded_end  │
//!          └───────────────────────────┘ ◄─ end (exclusive)
//! ```
//!
//! Nothing is cached. Every derived value is recomputed from the terminal
//! size passed in, so a pane built on computed endpoints follows resizes.
//!
//! # Sub-panes
//!
//! [`Pane::split`] returns children whose corners are closures over the
//! parent's geometry. The geometry lives behind an `Rc`, so children keep
//! working after the parent is dropped, and they follow later changes to
//! the parent's padding or border.

use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;

use perdita_term::{markup, Point, Size, Terminal, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::border::BorderGlyphs;
use crate::error::LayoutError;
use crate::region::{Endpoint, Inset, Padding, PaneDetails, Region};

type Result<T> = std::result::Result<T, LayoutError>;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// The shared part of a pane: what sub-pane closures read.
#[derive(Debug)]
struct Geometry {
    region: Region,
    /// Total inset from each edge, border included.
    padding: Cell<Padding>,
    border_width: Cell<u16>,
}

impl Geometry {
    fn padded_start(&self, size: Size) -> Point {
        let p = self.padding.get();
        self.region
            .start(size)
            .offset(i32::from(p.left), i32::from(p.top))
    }

    fn padded_end(&self, size: Size) -> Point {
        let p = self.padding.get();
        self.region
            .end(size)
            .offset(-i32::from(p.right), -i32::from(p.bottom))
    }

    /// The padded region scaled by `fraction` of its size, offset from its
    /// start, floored to whole cells.
    fn scaled(&self, size: Size, offset_x: f64, offset_y: f64) -> Point {
        let start = self.padded_start(size);
        let end = self.padded_end(size);
        let width = f64::from(end.x - start.x);
        let height = f64::from(end.y - start.y);
        Point::new(
            floor_cell(width.mul_add(offset_x, f64::from(start.x))),
            floor_cell(height.mul_add(offset_y, f64::from(start.y))),
        )
    }
}

#[allow(clippy::cast_possible_truncation)]
fn floor_cell(v: f64) -> i32 {
    v.floor() as i32
}

fn blank(width: i32) -> String {
    " ".repeat(usize::try_from(width).unwrap_or(0))
}

// ---------------------------------------------------------------------------
// Pane
// ---------------------------------------------------------------------------

/// A rectangular view with padding, a border, and a focus cache.
#[derive(Debug)]
pub struct Pane {
    geometry: Rc<Geometry>,
    title: Option<String>,
    glyphs: BorderGlyphs,
    last_known: Option<Point>,
}

impl Pane {
    /// A pane between `start` (inclusive) and `end` (exclusive).
    pub fn new(start: impl Into<Endpoint>, end: impl Into<Endpoint>) -> Self {
        Self::from_region(Region::new(start, end))
    }

    #[must_use]
    pub fn from_region(region: Region) -> Self {
        Self {
            geometry: Rc::new(Geometry {
                region,
                padding: Cell::new(Padding::default()),
                border_width: Cell::new(0),
            }),
            title: None,
            glyphs: BorderGlyphs::LIGHT,
            last_known: None,
        }
    }

    /// A pane covering the whole terminal at its current size.
    #[must_use]
    pub fn full_screen() -> Self {
        Self::from_region(Region::full_screen())
    }

    // -- Geometry --------------------------------------------------------------

    #[must_use]
    pub fn region(&self) -> &Region {
        &self.geometry.region
    }

    #[must_use]
    pub fn start(&self, size: Size) -> Point {
        self.geometry.region.start(size)
    }

    /// Exclusive end corner.
    #[must_use]
    pub fn end(&self, size: Size) -> Point {
        self.geometry.region.end(size)
    }

    #[must_use]
    pub fn width(&self, size: Size) -> i32 {
        self.geometry.region.width(size)
    }

    #[must_use]
    pub fn height(&self, size: Size) -> i32 {
        self.geometry.region.height(size)
    }

    #[must_use]
    pub fn padded_start(&self, size: Size) -> Point {
        self.geometry.padded_start(size)
    }

    /// Exclusive end of the drawable area.
    #[must_use]
    pub fn padded_end(&self, size: Size) -> Point {
        self.geometry.padded_end(size)
    }

    #[must_use]
    pub fn padded_width(&self, size: Size) -> i32 {
        self.padded_end(size).x - self.padded_start(size).x
    }

    #[must_use]
    pub fn padded_height(&self, size: Size) -> i32 {
        self.padded_end(size).y - self.padded_start(size).y
    }

    /// Half the padded width, rounded down. Relative to `padded_start`.
    #[must_use]
    pub fn padded_horizontal_center(&self, size: Size) -> i32 {
        self.padded_width(size).div_euclid(2)
    }

    /// Half the padded height, rounded down. Relative to `padded_start`.
    #[must_use]
    pub fn padded_vertical_center(&self, size: Size) -> i32 {
        self.padded_height(size).div_euclid(2)
    }

    /// Start and exclusive end of the rectangle `inset` names.
    fn corners(&self, size: Size, inset: Inset) -> (Point, Point) {
        match inset {
            Inset::Padded => (self.padded_start(size), self.padded_end(size)),
            Inset::Unpadded => (self.start(size), self.end(size)),
        }
    }

    // -- Padding, border, title ------------------------------------------------

    /// Total inset on each side, border included.
    #[must_use]
    pub fn padding(&self) -> Padding {
        self.geometry.padding.get()
    }

    /// Set the padding inside the border. The border's own width is kept.
    pub fn set_padding(&mut self, padding: Padding) -> &mut Self {
        let g = &self.geometry;
        g.padding.set(padding.grow(g.border_width.get()));
        tracing::debug!(?padding, "pane padding set");
        self
    }

    #[must_use]
    pub fn border_width(&self) -> u16 {
        self.geometry.border_width.get()
    }

    /// Swap the border's contribution to the padding: the old width comes
    /// off every side before the new one goes on.
    pub fn set_border_width(&mut self, width: u16) -> &mut Self {
        let g = &self.geometry;
        let old = g.border_width.replace(width);
        g.padding.set(g.padding.get().shrink(old).grow(width));
        tracing::debug!(old, new = width, "pane border width set");
        self
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Title shown on the top border. May contain markup.
    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    pub fn clear_title(&mut self) -> &mut Self {
        self.title = None;
        self
    }

    #[must_use]
    pub const fn glyphs(&self) -> &BorderGlyphs {
        &self.glyphs
    }

    pub const fn set_glyphs(&mut self, glyphs: BorderGlyphs) -> &mut Self {
        self.glyphs = glyphs;
        self
    }

    /// Where this pane last left the cursor, if it has moved it at all.
    #[must_use]
    pub const fn last_known(&self) -> Option<Point> {
        self.last_known
    }

    // -- Sub-division ----------------------------------------------------------

    /// One child per detail, sized as fractions of this pane's padded area.
    ///
    /// Child corners are recomputed from the parent on every access:
    /// `floor(padded_start + padded_size * offset)` for the start and
    /// `floor(padded_start + padded_size * (offset + dimensions))` for the
    /// end.
    #[must_use]
    pub fn split(&self, details: &[PaneDetails]) -> Vec<Self> {
        details
            .iter()
            .map(|&d| {
                let parent = Rc::clone(&self.geometry);
                let start = Endpoint::computed(move |size| {
                    parent.scaled(size, d.offset.x, d.offset.y)
                });

                let parent = Rc::clone(&self.geometry);
                let end = Endpoint::computed(move |size| {
                    parent.scaled(
                        size,
                        d.offset.x + d.dimensions.width,
                        d.offset.y + d.dimensions.height,
                    )
                });

                Self::new(start, end)
            })
            .collect()
    }

    // -- Cursor movement -------------------------------------------------------

    /// Move to an absolute logical position and remember it.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Term`] if the terminal write fails.
    pub fn move_to<W: Write>(&mut self, term: &mut Terminal<W>, at: Point) -> Result<&mut Self> {
        term.set_cursor(at.x, at.y)?;
        self.last_known = Some(term.cursor_position()?);
        Ok(self)
    }

    /// Move to `at`, measured from the unpadded start. Not bounds-checked.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Term`] if the terminal write fails.
    pub fn move_to_relative<W: Write>(
        &mut self,
        term: &mut Terminal<W>,
        at: Point,
    ) -> Result<&mut Self> {
        let target = self.start(term.size()) + at;
        self.move_to(term, target)
    }

    /// Move to `at`, measured from the padded start.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::OutOfBounds`] if the target falls outside the
    /// padded area, or [`LayoutError::Term`] if the write fails.
    pub fn move_to_padded<W: Write>(
        &mut self,
        term: &mut Terminal<W>,
        at: Point,
    ) -> Result<&mut Self> {
        let size = term.size();
        let (start, end) = self.corners(size, Inset::Padded);
        let target = start + at;
        if target.x < start.x || target.y < start.y || target.x >= end.x || target.y >= end.y {
            return Err(LayoutError::OutOfBounds {
                point: target,
                start,
                end,
            });
        }
        self.move_to(term, target)
    }

    /// # Errors
    ///
    /// Returns [`LayoutError::Term`] if the terminal write fails.
    pub fn move_to_start<W: Write>(
        &mut self,
        term: &mut Terminal<W>,
        inset: Inset,
    ) -> Result<&mut Self> {
        let (start, _) = self.corners(term.size(), inset);
        self.move_to(term, start)
    }

    /// Last cell of the last row.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Term`] if the terminal write fails.
    pub fn move_to_end<W: Write>(
        &mut self,
        term: &mut Terminal<W>,
        inset: Inset,
    ) -> Result<&mut Self> {
        let (_, end) = self.corners(term.size(), inset);
        self.move_to(term, end.offset(-1, -1))
    }

    /// # Errors
    ///
    /// Returns [`LayoutError::Term`] if the terminal write fails.
    pub fn move_to_bottom_left<W: Write>(
        &mut self,
        term: &mut Terminal<W>,
        inset: Inset,
    ) -> Result<&mut Self> {
        let (start, end) = self.corners(term.size(), inset);
        self.move_to(term, Point::new(start.x, end.y - 1))
    }

    /// # Errors
    ///
    /// Returns [`LayoutError::Term`] if the terminal write fails.
    pub fn move_to_top_right<W: Write>(
        &mut self,
        term: &mut Terminal<W>,
        inset: Inset,
    ) -> Result<&mut Self> {
        let (start, end) = self.corners(term.size(), inset);
        self.move_to(term, Point::new(end.x - 1, start.y))
    }

    // -- Writing ---------------------------------------------------------------

    /// Render markup at the cursor and remember where it ended.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Term`] for a markup or write error.
    pub fn write<W: Write>(&mut self, term: &mut Terminal<W>, markup: &str) -> Result<&mut Self> {
        term.write_markup(markup)?;
        self.last_known = Some(term.cursor_position()?);
        Ok(self)
    }

    /// Send a control sequence through the terminal.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Term`] if the write fails.
    pub fn write_escaped<W: Write>(
        &mut self,
        term: &mut Terminal<W>,
        sequence: &str,
    ) -> Result<&mut Self> {
        term.write_escaped(sequence)?;
        self.last_known = Some(term.cursor_position()?);
        Ok(self)
    }

    /// [`newline`](Self::newline), then [`write`](Self::write).
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ReturnExceedsHeight`] at the bottom edge.
    pub fn write_on_newline<W: Write>(
        &mut self,
        term: &mut Terminal<W>,
        markup: &str,
    ) -> Result<&mut Self> {
        self.newline(term)?;
        self.write(term, markup)
    }

    /// Put the cursor back where this pane last left it.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Term`] if the terminal write fails.
    pub fn focus<W: Write>(&mut self, term: &mut Terminal<W>) -> Result<&mut Self> {
        if let Some(at) = self.last_known {
            term.set_cursor(at.x, at.y)?;
        }
        Ok(self)
    }

    /// Blank every padded row, then move to the padded start.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Term`] if the terminal write fails.
    pub fn clear<W: Write>(&mut self, term: &mut Terminal<W>) -> Result<&mut Self> {
        let (start, end) = self.corners(term.size(), Inset::Padded);
        let spaces = blank(end.x - start.x);
        for y in start.y..end.y {
            self.move_to(term, Point::new(start.x, y))?;
            term.write(&spaces, Wrap::Clip)?;
        }
        self.move_to(term, start)
    }

    /// Move to the padded left margin one row down.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ReturnExceedsHeight`] if that row is at or
    /// below the padded bottom edge. The cursor is not moved.
    pub fn newline<W: Write>(&mut self, term: &mut Terminal<W>) -> Result<&mut Self> {
        let (start, end) = self.corners(term.size(), Inset::Padded);
        let row = term.cursor_position()?.y + 1;
        if row >= end.y {
            return Err(LayoutError::ReturnExceedsHeight { row, bottom: end.y });
        }
        self.move_to(term, Point::new(start.x, row))
    }

    /// Blank the current row across the padded width and return to its
    /// left margin.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Term`] if the terminal write fails.
    pub fn clear_line<W: Write>(&mut self, term: &mut Terminal<W>) -> Result<&mut Self> {
        let size = term.size();
        let left = Point::new(self.padded_start(size).x, term.cursor_position()?.y);
        self.move_to(term, left)?;
        term.write(&blank(self.padded_width(size)), Wrap::Clip)?;
        self.move_to(term, left)
    }

    // -- Border ----------------------------------------------------------------

    /// Draw the border around the unpadded region, with the title centred
    /// on the top edge.
    ///
    /// A region smaller than 2×2 has no room for corners and is skipped.
    /// The title is cut to fit between the corners and its brackets, and
    /// left out when not even one cell is free.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Term`] for a bad title or a write error.
    pub fn draw_border<W: Write>(&mut self, term: &mut Terminal<W>) -> Result<&mut Self> {
        let size = term.size();
        let (start, end) = self.corners(size, Inset::Unpadded);
        let width = end.x - start.x;
        if width < 2 || end.y - start.y < 2 {
            tracing::debug!(?start, ?end, "region too small for a border");
            return Ok(self);
        }

        let g = self.glyphs;
        let cells = usize::try_from(width).unwrap_or(0);
        let vertical = g.vertical.to_string();

        self.move_to(term, start)?;
        term.write(&g.edge(g.top_left, g.top_right, cells), Wrap::Clip)?;
        for y in start.y + 1..end.y - 1 {
            self.move_to(term, Point::new(start.x, y))?;
            term.write(&vertical, Wrap::Clip)?;
            self.move_to(term, Point::new(end.x - 1, y))?;
            term.write(&vertical, Wrap::Clip)?;
        }
        self.move_to(term, Point::new(start.x, end.y - 1))?;
        term.write(&g.edge(g.bottom_left, g.bottom_right, cells), Wrap::Clip)?;

        if let Some(title) = self.title.clone() {
            let sections = markup::parse(&title).map_err(perdita_term::Error::from)?;
            let room = usize::try_from(width - 4).unwrap_or(0);
            if room == 0 {
                tracing::debug!(width, "no room for the title");
                return Ok(self);
            }

            let sections = markup::truncate(sections, room);
            let text: usize = sections.iter().map(|s| s.content.width()).sum();
            let text_width = i32::try_from(text).unwrap_or(i32::MAX - 2) + 2;
            // Never on the top-left corner.
            let x = (start.x + width / 2 - (text_width + 1) / 2).max(start.x + 1);

            self.move_to(term, Point::new(x, start.y))?;
            term.write(&g.title_left.to_string(), Wrap::Clip)?;
            term.write_sections_with(&sections, Wrap::Clip)?;
            term.write(&g.title_right.to_string(), Wrap::Clip)?;
            self.last_known = Some(term.cursor_position()?);
        }

        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
