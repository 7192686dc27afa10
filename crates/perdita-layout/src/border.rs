//! Box-drawing glyph sets for pane borders.

/// The characters a border is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderGlyphs {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
    /// Left bracket around a title on the top edge.
    pub title_left: char,
    /// Right bracket around a title on the top edge.
    pub title_right: char,
}

impl BorderGlyphs {
    /// Single light lines: `┌─┐ │ └─┘`, title as `┤title├`.
    pub const LIGHT: Self = Self {
        top_left: '┌',
        top_right: '┐',
        bottom_left: '└',
        bottom_right: '┘',
        horizontal: '─',
        vertical: '│',
        title_left: '┤',
        title_right: '├',
    };

    /// Double lines: `╔═╗ ║ ╚═╝`, title as `╡title╞`.
    pub const DOUBLE: Self = Self {
        top_left: '╔',
        top_right: '╗',
        bottom_left: '╚',
        bottom_right: '╝',
        horizontal: '═',
        vertical: '║',
        title_left: '╡',
        title_right: '╞',
    };

    /// A horizontal edge `width` cells wide between two corners.
    #[must_use]
    pub fn edge(&self, left: char, right: char, width: usize) -> String {
        let mut s = String::with_capacity(width * 3);
        s.push(left);
        s.extend(std::iter::repeat_n(self.horizontal, width.saturating_sub(2)));
        s.push(right);
        s
    }
}

impl Default for BorderGlyphs {
    fn default() -> Self {
        Self::LIGHT
    }
}
