// SPDX-License-Identifier: MIT
//
// Style state: what the terminal was last told.
//
// `StyleState` records the attributes and colors that have actually been
// emitted, not the ones a caller wishes were active. Every transition
// method reports what changed so the terminal can write exactly those
// escape codes and nothing else. Re-asserting an active attribute, or
// re-setting the same color, produces an empty change and therefore no
// bytes.

use crate::color::Rgb;

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes as a compact bitfield.
    ///
    /// Each flag maps to an SGR parameter pair (on / off):
    ///
    /// ```
    /// use perdita_term::style::Attr;
    ///
    /// assert_eq!(Attr::BOLD.sgr_on(), Some(1));
    /// assert_eq!(Attr::BOLD.sgr_off(), Some(22));
    /// assert_eq!((Attr::BOLD | Attr::ITALIC).sgr_on(), None);
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1 / 22.
        const BOLD          = 1 << 0;
        /// SGR 2 / 22.
        const DIM           = 1 << 1;
        /// SGR 3 / 23.
        const ITALIC        = 1 << 2;
        /// SGR 4 / 24.
        const UNDERLINE     = 1 << 3;
        /// SGR 5 / 25. Ignored by several terminals (iTerm2 among them).
        const BLINK         = 1 << 4;
        /// SGR 7 / 27: swap foreground and background.
        const INVERSE       = 1 << 5;
        /// SGR 8 / 28.
        const HIDDEN        = 1 << 6;
        /// SGR 9 / 29.
        const STRIKETHROUGH = 1 << 7;
    }
}

impl Attr {
    /// SGR parameter that turns this single attribute on.
    ///
    /// `None` for an empty set or a combination of several flags.
    #[must_use]
    pub const fn sgr_on(self) -> Option<u8> {
        match self.bits() {
            0b0000_0001 => Some(1),
            0b0000_0010 => Some(2),
            0b0000_0100 => Some(3),
            0b0000_1000 => Some(4),
            0b0001_0000 => Some(5),
            0b0010_0000 => Some(7),
            0b0100_0000 => Some(8),
            0b1000_0000 => Some(9),
            _ => None,
        }
    }

    /// SGR parameter that turns this single attribute off.
    ///
    /// Bold and dim share 22 (normal intensity).
    #[must_use]
    pub const fn sgr_off(self) -> Option<u8> {
        match self.bits() {
            0b0000_0001 | 0b0000_0010 => Some(22),
            0b0000_0100 => Some(23),
            0b0000_1000 => Some(24),
            0b0001_0000 => Some(25),
            0b0010_0000 => Some(27),
            0b0100_0000 => Some(28),
            0b1000_0000 => Some(29),
            _ => None,
        }
    }
}

// ─── StyleState ──────────────────────────────────────────────────────────────

/// The last-emitted style: attribute flags plus foreground and background.
///
/// Colors are `None` until first set and again after a full reset, which
/// clears colors on the terminal as well as attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleState {
    attrs: Attr,
    foreground: Option<Rgb>,
    background: Option<Rgb>,
}

impl StyleState {
    /// Plain state: no attributes, colors unknown.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            attrs: Attr::empty(),
            foreground: None,
            background: None,
        }
    }

    /// Currently active attributes.
    #[inline]
    #[must_use]
    pub const fn attrs(&self) -> Attr {
        self.attrs
    }

    /// Whether every flag in `attr` is active.
    #[inline]
    #[must_use]
    pub const fn is_on(&self, attr: Attr) -> bool {
        self.attrs.contains(attr)
    }

    /// Last foreground color emitted.
    #[inline]
    #[must_use]
    pub const fn foreground(&self) -> Option<Rgb> {
        self.foreground
    }

    /// Last background color emitted.
    #[inline]
    #[must_use]
    pub const fn background(&self) -> Option<Rgb> {
        self.background
    }

    /// Mark `attr` active. Returns the flags that were previously off.
    pub fn enable(&mut self, attr: Attr) -> Attr {
        let newly = attr.difference(self.attrs);
        self.attrs |= attr;
        newly
    }

    /// Mark `attr` inactive. Returns the flags that were previously on.
    pub fn disable(&mut self, attr: Attr) -> Attr {
        let was = attr.intersection(self.attrs);
        self.attrs.remove(attr);
        was
    }

    /// Record a foreground change. Returns `false` if `color` is already set.
    pub fn swap_foreground(&mut self, color: Rgb) -> bool {
        if self.foreground == Some(color) {
            return false;
        }
        self.foreground = Some(color);
        true
    }

    /// Record a background change. Returns `false` if `color` is already set.
    pub fn swap_background(&mut self, color: Rgb) -> bool {
        if self.background == Some(color) {
            return false;
        }
        self.background = Some(color);
        true
    }

    /// Forget everything, as SGR 0 does on the terminal.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_flag_has_codes() {
        for flag in Attr::all().iter() {
            assert!(flag.sgr_on().is_some(), "{flag:?} has no on code");
            assert!(flag.sgr_off().is_some(), "{flag:?} has no off code");
        }
    }

    #[test]
    fn sgr_codes_match_standard() {
        let table = [
            (Attr::BOLD, 1, 22),
            (Attr::DIM, 2, 22),
            (Attr::ITALIC, 3, 23),
            (Attr::UNDERLINE, 4, 24),
            (Attr::BLINK, 5, 25),
            (Attr::INVERSE, 7, 27),
            (Attr::HIDDEN, 8, 28),
            (Attr::STRIKETHROUGH, 9, 29),
        ];
        for (flag, on, off) in table {
            assert_eq!(flag.sgr_on(), Some(on));
            assert_eq!(flag.sgr_off(), Some(off));
        }
    }

    #[test]
    fn combined_flags_have_no_single_code() {
        assert_eq!(Attr::empty().sgr_on(), None);
        assert_eq!((Attr::BOLD | Attr::DIM).sgr_off(), None);
    }

    #[test]
    fn enable_reports_only_new_flags() {
        let mut s = StyleState::new();
        assert_eq!(s.enable(Attr::BOLD), Attr::BOLD);
        assert_eq!(s.enable(Attr::BOLD), Attr::empty());
        assert_eq!(s.enable(Attr::BOLD | Attr::ITALIC), Attr::ITALIC);
        assert!(s.is_on(Attr::BOLD | Attr::ITALIC));
    }

    #[test]
    fn disable_reports_only_active_flags() {
        let mut s = StyleState::new();
        assert_eq!(s.disable(Attr::UNDERLINE), Attr::empty());
        s.enable(Attr::UNDERLINE);
        assert_eq!(s.disable(Attr::UNDERLINE | Attr::BLINK), Attr::UNDERLINE);
        assert_eq!(s.attrs(), Attr::empty());
    }

    #[test]
    fn color_swaps_are_suppressed_when_equal() {
        let mut s = StyleState::new();
        assert!(s.swap_foreground(Rgb::RED));
        assert!(!s.swap_foreground(Rgb::RED));
        assert!(s.swap_foreground(Rgb::BLUE));
        assert!(s.swap_background(Rgb::BLACK));
        assert!(!s.swap_background(Rgb::BLACK));
    }

    #[test]
    fn clear_forgets_colors_and_flags() {
        let mut s = StyleState::new();
        s.enable(Attr::all());
        s.swap_foreground(Rgb::RED);
        s.clear();
        assert_eq!(s, StyleState::new());
        assert!(s.swap_foreground(Rgb::RED));
    }
}
