// SPDX-License-Identifier: MIT
//
// Terminal markup: inline styling for plain strings.
//
//     "|b;fg[green]>Saved| 3 notes"
//
// reads as: turn bold on, set the foreground to green, write "Saved",
// reset; then write " 3 notes" unstyled.
//
// Grammar:
//
//   markup      := section ( '|' section )*
//   section     := [ instructions '>' ] content
//   instructions:= expression ( ';' expression )*
//   expression  := keyword [ '[' config ']' ]
//
// The indicators are single characters (see the constants below). A `~`
// right before the first `>` of a section means "that was not an
// instruction list": everything read so far, plus the `>`, becomes content.
// Only the `~` itself is dropped.
//
// The parser is pure. Sections are plain values; executing them against a
// terminal is `Terminal::write_markup`'s job.

use std::fmt;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::color::Rgb;

/// Separates sections.
pub const SECTION_INDICATOR: char = '|';
/// Ends a section's instruction list.
pub const INSTRUCTION_INDICATOR: char = '>';
/// Separates expressions inside an instruction list.
pub const EXPRESSION_SEPARATOR: char = ';';
/// Opens an expression's config value.
pub const CONFIG_START: char = '[';
/// Closes an expression's config value.
pub const CONFIG_END: char = ']';
/// Placed before the instruction indicator to make it literal.
pub const ESCAPE_INDICATOR: char = '~';

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Errors that can occur while parsing markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// The keyword does not name any instruction.
    UnknownKeyword { keyword: String },
    /// A color instruction's config is neither a known name nor `r,g,b`.
    InvalidColor { value: String },
    /// A color instruction was given without a config value.
    MissingColor { keyword: String },
    /// A config was opened with `[` but never closed.
    UnterminatedConfig { expression: String },
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKeyword { keyword } => {
                write!(f, "'{keyword}' is not a valid expression")
            }
            Self::InvalidColor { value } => write!(f, "cannot parse color '{value}'"),
            Self::MissingColor { keyword } => {
                write!(f, "'{keyword}' needs a color, e.g. {keyword}[red]")
            }
            Self::UnterminatedConfig { expression } => {
                write!(f, "'{expression}' is missing a closing '{CONFIG_END}'")
            }
        }
    }
}

impl std::error::Error for MarkupError {}

// ─── Instructions ────────────────────────────────────────────────────────────

/// A single style or color directive.
///
/// The set is closed: every variant is handled by `Terminal::apply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    BoldOn,
    DimOn,
    ItalicOn,
    UnderlineOn,
    StrikethroughOn,
    Inverse,
    Foreground(Rgb),
    Background(Rgb),
}

/// Instruction shape selected by a keyword, before any config is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Plain(Instruction),
    Foreground,
    Background,
}

/// Map a keyword (long or short form) to its instruction kind.
fn keyword_kind(keyword: &str) -> Option<Kind> {
    let kind = match keyword {
        "b" | "bold" => Kind::Plain(Instruction::BoldOn),
        "dim" => Kind::Plain(Instruction::DimOn),
        "i" | "italic" => Kind::Plain(Instruction::ItalicOn),
        "u" | "underline" => Kind::Plain(Instruction::UnderlineOn),
        "s" | "strikethrough" => Kind::Plain(Instruction::StrikethroughOn),
        "inverse" => Kind::Plain(Instruction::Inverse),
        "fg" | "foreground" => Kind::Foreground,
        "bg" | "background" => Kind::Background,
        _ => return None,
    };
    Some(kind)
}

impl Instruction {
    /// Interpret one expression: `keyword` or `keyword[config]`.
    ///
    /// Config on a non-color keyword is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError`] for an unknown keyword, a bad color, or a
    /// config with no closing `]`.
    pub fn from_expression(expression: &str) -> Result<Self, MarkupError> {
        let (keyword, config) = match expression.split_once(CONFIG_START) {
            Some((kw, rest)) => {
                let config = rest.strip_suffix(CONFIG_END).ok_or_else(|| {
                    tracing::debug!(expression, "unterminated markup config");
                    MarkupError::UnterminatedConfig {
                        expression: expression.to_owned(),
                    }
                })?;
                (kw, Some(config))
            }
            None => (expression, None),
        };

        let kind = keyword_kind(keyword).ok_or_else(|| {
            tracing::debug!(keyword, "unknown markup keyword");
            MarkupError::UnknownKeyword {
                keyword: keyword.to_owned(),
            }
        })?;

        match kind {
            Kind::Plain(instruction) => Ok(instruction),
            Kind::Foreground => color_config(keyword, config).map(Self::Foreground),
            Kind::Background => color_config(keyword, config).map(Self::Background),
        }
    }
}

fn color_config(keyword: &str, config: Option<&str>) -> Result<Rgb, MarkupError> {
    let value = config.ok_or_else(|| MarkupError::MissingColor {
        keyword: keyword.to_owned(),
    })?;
    Rgb::parse(value).ok_or_else(|| {
        tracing::debug!(value, "unparseable markup color");
        MarkupError::InvalidColor {
            value: value.to_owned(),
        }
    })
}

// ─── Sections ────────────────────────────────────────────────────────────────

/// Literal content plus the instructions that style it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section {
    pub content: String,
    pub instructions: Vec<Instruction>,
}

impl Section {
    /// Build a section from the text between two section indicators.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError`] if any expression is invalid.
    pub fn parse(chunk: &str) -> Result<Self, MarkupError> {
        let mut head = String::new();
        let mut content = String::new();
        let mut in_instructions = true;
        let mut previous = None;

        for ch in chunk.chars() {
            if ch == INSTRUCTION_INDICATOR && in_instructions {
                if previous == Some(ESCAPE_INDICATOR) {
                    // Not an instruction list after all.
                    head.pop();
                    content = std::mem::take(&mut head);
                    content.push(ch);
                }
                in_instructions = false;
            } else if in_instructions {
                head.push(ch);
            } else {
                content.push(ch);
            }
            previous = Some(ch);
        }

        if in_instructions {
            // No instruction indicator: the whole chunk is content.
            content = std::mem::take(&mut head);
        }

        let instructions = head
            .split(EXPRESSION_SEPARATOR)
            .filter(|e| !e.is_empty())
            .map(Instruction::from_expression)
            .collect::<Result<_, _>>()?;

        Ok(Self {
            content,
            instructions,
        })
    }
}

/// Parse markup into sections, left to right.
///
/// Empty chunks between section indicators produce nothing, so `""`,
/// `"||||"` and a dangling trailing `|` add no sections.
///
/// # Errors
///
/// Returns the first [`MarkupError`] encountered.
///
/// # Example
///
/// ```
/// use perdita_term::markup::{parse, Instruction};
///
/// let sections = parse("|b>Bold| and plain").unwrap();
/// assert_eq!(sections.len(), 2);
/// assert_eq!(sections[0].instructions, vec![Instruction::BoldOn]);
/// assert_eq!(sections[1].content, " and plain");
/// ```
pub fn parse(markup: &str) -> Result<Vec<Section>, MarkupError> {
    markup
        .split(SECTION_INDICATOR)
        .filter(|chunk| !chunk.is_empty())
        .map(Section::parse)
        .collect()
}

/// Cut `content` at a grapheme boundary so it spans at most `columns`
/// display cells.
#[must_use]
pub fn clip_to_columns(content: &str, columns: usize) -> &str {
    let mut used = 0;
    for (idx, grapheme) in content.grapheme_indices(true) {
        used += grapheme.width();
        if used > columns {
            return &content[..idx];
        }
    }
    content
}

/// Keep sections until their combined content spans `columns` cells,
/// clipping the one that crosses the limit. Instructions are kept on every
/// section that survives.
#[must_use]
pub fn truncate(sections: Vec<Section>, columns: usize) -> Vec<Section> {
    let mut left = columns;
    let mut kept = Vec::with_capacity(sections.len());
    for mut section in sections {
        if left == 0 {
            break;
        }
        let (len, cols) = {
            let clipped = clip_to_columns(&section.content, left);
            (clipped.len(), clipped.width())
        };
        section.content.truncate(len);
        left -= cols;
        kept.push(section);
    }
    kept
}

/// The text `markup` renders, with every indicator and instruction removed.
///
/// # Errors
///
/// Returns [`MarkupError`] if the markup does not parse.
pub fn plain_text(markup: &str) -> Result<String, MarkupError> {
    Ok(parse(markup)?
        .into_iter()
        .map(|s| s.content)
        .collect())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
