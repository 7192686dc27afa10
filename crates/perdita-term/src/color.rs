// SPDX-License-Identifier: MIT
//
// True-color values for the markup `fg[...]` / `bg[...]` instructions.
//
// Channels are plain `i32` and are never range-checked here. Whatever the
// caller passes is what ends up in the `38;2;r;g;b` sequence; validating
// against 0–255 is the caller's job. Parsing from markup is the only place
// values enter from user text, and that path reads integers as written.

use std::fmt;

/// A 24-bit color as three unvalidated channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl Rgb {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const GREEN: Self = Self::new(0, 255, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);
    pub const YELLOW: Self = Self::new(255, 255, 0);
    pub const CYAN: Self = Self::new(0, 255, 255);
    pub const MAGENTA: Self = Self::new(255, 0, 255);
    pub const GRAY: Self = Self::new(128, 128, 128);

    #[inline]
    #[must_use]
    pub const fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    /// Whether every channel lies in 0–255.
    ///
    /// Nothing in the renderer calls this. It exists for callers that want
    /// to validate before handing a color over.
    #[must_use]
    pub const fn in_range(self) -> bool {
        matches!(self.r, 0..=255) && matches!(self.g, 0..=255) && matches!(self.b, 0..=255)
    }

    /// Look up a color by name. Names are lowercase and case-sensitive.
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        NAMED.iter().find(|(n, _)| *n == name).map(|&(_, c)| c)
    }

    /// Parse a markup color spec: a name, `r,g,b`, or `#rrggbb` / `#rgb`.
    ///
    /// The `r,g,b` form must have exactly three integer parts. Surrounding
    /// whitespace in each part is ignored.
    #[must_use]
    pub fn parse(spec: &str) -> Option<Self> {
        if spec.contains(',') {
            let mut parts = spec.split(',').map(|p| p.trim().parse::<i32>());
            let r = parts.next()?.ok()?;
            let g = parts.next()?.ok()?;
            let b = parts.next()?.ok()?;
            if parts.next().is_some() {
                return None;
            }
            return Some(Self::new(r, g, b));
        }
        if spec.starts_with('#') {
            return parse_hex(spec);
        }
        Self::named(spec)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// Names accepted by [`Rgb::named`].
pub const NAMED: &[(&str, Rgb)] = &[
    ("white", Rgb::WHITE),
    ("black", Rgb::BLACK),
    ("red", Rgb::RED),
    ("green", Rgb::GREEN),
    ("blue", Rgb::BLUE),
    ("yellow", Rgb::YELLOW),
    ("cyan", Rgb::CYAN),
    ("magenta", Rgb::MAGENTA),
    ("gray", Rgb::GRAY),
];

fn parse_hex(s: &str) -> Option<Rgb> {
    let s = s.strip_prefix('#')?;
    let b = s.as_bytes();

    match b.len() {
        // #RGB
        3 => {
            let r = parse_hex_digit(b[0])?;
            let g = parse_hex_digit(b[1])?;
            let bl = parse_hex_digit(b[2])?;
            Some(Rgb::new(
                i32::from(r << 4 | r),
                i32::from(g << 4 | g),
                i32::from(bl << 4 | bl),
            ))
        }
        // #RRGGBB
        6 => Some(Rgb::new(
            i32::from(parse_hex_byte(&b[0..2])?),
            i32::from(parse_hex_byte(&b[2..4])?),
            i32::from(parse_hex_byte(&b[4..6])?),
        )),
        _ => None,
    }
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors() {
        assert_eq!(Rgb::named("green"), Some(Rgb::new(0, 255, 0)));
        assert_eq!(Rgb::named("white"), Some(Rgb::WHITE));
        assert_eq!(Rgb::named("Green"), None);
        assert_eq!(Rgb::named("teal"), None);
    }

    #[test]
    fn parse_triple() {
        assert_eq!(Rgb::parse("10,20,30"), Some(Rgb::new(10, 20, 30)));
        assert_eq!(Rgb::parse(" 1, 2 ,3 "), Some(Rgb::new(1, 2, 3)));
    }

    #[test]
    fn parse_triple_keeps_out_of_range_values() {
        assert_eq!(Rgb::parse("300,-4,0"), Some(Rgb::new(300, -4, 0)));
        assert!(!Rgb::new(300, -4, 0).in_range());
    }

    #[test]
    fn parse_triple_needs_exactly_three_parts() {
        assert_eq!(Rgb::parse("1,2"), None);
        assert_eq!(Rgb::parse("1,2,3,4"), None);
        assert_eq!(Rgb::parse("1,x,3"), None);
    }

    #[test]
    fn parse_hex_forms() {
        assert_eq!(Rgb::parse("#ff8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::parse("#0f0"), Some(Rgb::GREEN));
        assert_eq!(Rgb::parse("#12345"), None);
        assert_eq!(Rgb::parse("#gg0000"), None);
    }

    #[test]
    fn parse_name() {
        assert_eq!(Rgb::parse("red"), Some(Rgb::RED));
        assert_eq!(Rgb::parse(""), None);
    }

    #[test]
    fn display_is_triple() {
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "1,2,3");
    }
}
