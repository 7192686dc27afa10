// SPDX-License-Identifier: MIT
//
// Key input: raw stdin bytes to key events.
//
// Prompts only need to know which key was pressed, so this parser covers
// the keyboard and nothing else: control bytes, printable ASCII, UTF-8,
// legacy CSI and SS3 cursor/editing keys, and Alt+key (ESC prefix).
//
// Sequences can arrive split across reads, so `Parser` keeps unconsumed
// bytes between calls to `advance`. A lone ESC stays pending until more
// bytes arrive or the caller gives up waiting and calls `flush`.

use std::io::{self, Read};

use bitflags::bitflags;

// ─── Key Types ──────────────────────────────────────────────────────────────

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// F1 through F12.
    F(u8),
}

bitflags! {
    /// Modifier keys. Bit layout matches the xterm `1 + mask` parameter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

// ─── Key Sources ────────────────────────────────────────────────────────────

/// Anything that can block until the next key press.
pub trait KeySource {
    /// Wait for one key.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails or input ends.
    fn read_key(&mut self) -> io::Result<KeyEvent>;
}

/// Blocking key reader over stdin (or any `Read`).
pub struct StdinKeys<R: Read = io::Stdin> {
    input: R,
    parser: Parser,
    queued: std::collections::VecDeque<KeyEvent>,
}

impl StdinKeys<io::Stdin> {
    #[must_use]
    pub fn new() -> Self {
        Self::from_reader(io::stdin())
    }
}

impl Default for StdinKeys<io::Stdin> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Read> StdinKeys<R> {
    pub fn from_reader(input: R) -> Self {
        Self {
            input,
            parser: Parser::new(),
            queued: std::collections::VecDeque::new(),
        }
    }
}

impl<R: Read> KeySource for StdinKeys<R> {
    fn read_key(&mut self) -> io::Result<KeyEvent> {
        let mut buf = [0u8; 64];
        loop {
            if let Some(key) = self.queued.pop_front() {
                return Ok(key);
            }

            let n = self.input.read(&mut buf)?;
            if n == 0 {
                // Whatever was pending is all there will ever be.
                let rest = self.parser.flush();
                if rest.is_empty() {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "input closed while waiting for a key",
                    ));
                }
                self.queued.extend(rest);
                continue;
            }

            let keys = self.parser.advance(&buf[..n]);
            if keys.is_empty() && self.parser.has_pending() {
                // A read returns everything the terminal sent for one key,
                // so an unfinished sequence here is a bare ESC.
                self.queued.extend(self.parser.flush());
            } else {
                self.queued.extend(keys);
            }
        }
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Incremental byte-to-key parser.
#[derive(Debug, Default)]
pub struct Parser {
    buf: Vec<u8>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes and return every complete key they finish.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut keys = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Key(key, consumed) => {
                    keys.push(key);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => {
                    tracing::trace!(bytes = ?&self.buf[pos..pos + n], "skipped input");
                    pos += n;
                }
            }
        }

        self.buf.drain(..pos);
        keys
    }

    /// Whether bytes are waiting for the rest of a sequence.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Give up on pending bytes and report them as individual keys.
    ///
    /// ESC becomes [`KeyCode::Escape`]; control bytes become Ctrl+letter.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let keys = self.buf.iter().filter_map(|&b| literal_key(b)).collect();
        self.buf.clear();
        keys
    }
}

enum Parsed {
    Key(KeyEvent, usize),
    Incomplete,
    Skip(usize),
}

const ESC: u8 = 0x1B;

fn try_parse(buf: &[u8]) -> Parsed {
    match buf[0] {
        ESC => parse_escape(buf),
        0x80..=0xFF => parse_utf8(buf),
        b => literal_key(b).map_or(Parsed::Skip(1), |key| Parsed::Key(key, 1)),
    }
}

/// One byte on its own, outside any sequence.
fn literal_key(byte: u8) -> Option<KeyEvent> {
    let key = match byte {
        ESC => KeyEvent::plain(KeyCode::Escape),
        0x08 | 0x7F => KeyEvent::plain(KeyCode::Backspace),
        0x09 => KeyEvent::plain(KeyCode::Tab),
        0x0A | 0x0D => KeyEvent::plain(KeyCode::Enter),
        0x00 => KeyEvent::new(KeyCode::Char('@'), Modifiers::CTRL),
        b @ 0x01..=0x1A => KeyEvent::new(ctrl_letter(b), Modifiers::CTRL),
        b @ 0x20..=0x7E => KeyEvent::plain(KeyCode::Char(char::from(b))),
        _ => return None,
    };
    Some(key)
}

const fn ctrl_letter(byte: u8) -> KeyCode {
    KeyCode::Char((byte + b'a' - 1) as char)
}

fn parse_escape(buf: &[u8]) -> Parsed {
    let Some(&next) = buf.get(1) else {
        return Parsed::Incomplete;
    };

    match next {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        ESC => Parsed::Key(KeyEvent::new(KeyCode::Escape, Modifiers::ALT), 2),
        b @ 0x20..=0x7E => Parsed::Key(
            KeyEvent::new(KeyCode::Char(char::from(b)), Modifiers::ALT),
            2,
        ),
        b @ 0x01..=0x1A => Parsed::Key(
            KeyEvent::new(ctrl_letter(b), Modifiers::ALT | Modifiers::CTRL),
            2,
        ),
        _ => Parsed::Key(KeyEvent::plain(KeyCode::Escape), 1),
    }
}

/// `ESC [ params final`
fn parse_csi(buf: &[u8]) -> Parsed {
    let mut end = 2;
    loop {
        let Some(&b) = buf.get(end) else {
            return Parsed::Incomplete;
        };
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }

    let consumed = end + 1;
    let params: Vec<u16> = buf[2..end]
        .split(|&b| b == b';')
        .map(parse_u16)
        .collect();
    let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    let code = match buf[end] {
        b'~' => match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            15 => KeyCode::F(5),
            17 => KeyCode::F(6),
            18 => KeyCode::F(7),
            19 => KeyCode::F(8),
            20 => KeyCode::F(9),
            21 => KeyCode::F(10),
            23 => KeyCode::F(11),
            24 => KeyCode::F(12),
            _ => return Parsed::Skip(consumed),
        },
        b'Z' => return Parsed::Key(KeyEvent::new(KeyCode::Tab, Modifiers::SHIFT), consumed),
        b => match cursor_key(b) {
            Some(code) => code,
            None => return Parsed::Skip(consumed),
        },
    };

    Parsed::Key(KeyEvent::new(code, modifiers), consumed)
}

/// `ESC O final`
fn parse_ss3(buf: &[u8]) -> Parsed {
    let Some(&b) = buf.get(2) else {
        return Parsed::Incomplete;
    };
    cursor_key(b).map_or(Parsed::Skip(3), |code| Parsed::Key(KeyEvent::plain(code), 3))
}

/// Final bytes shared by CSI and SS3.
const fn cursor_key(final_byte: u8) -> Option<KeyCode> {
    Some(match final_byte {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return None,
    })
}

fn parse_utf8(buf: &[u8]) -> Parsed {
    let expected = match buf[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return Parsed::Skip(1),
    };
    if buf.len() < expected {
        return Parsed::Incomplete;
    }

    std::str::from_utf8(&buf[..expected])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Parsed::Skip(1), |ch| {
            Parsed::Key(KeyEvent::plain(KeyCode::Char(ch)), expected)
        })
}

fn parse_u16(digits: &[u8]) -> u16 {
    digits
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0u16, |acc, &b| {
            acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
        })
}

/// xterm encodes modifiers as `1 + mask`.
#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    Modifiers::from_bits_truncate(param.saturating_sub(1) as u8)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(data: &[u8]) -> Vec<KeyEvent> {
        Parser::new().advance(data)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    #[test]
    fn ascii_chars() {
        assert_eq!(
            parse(b"yn"),
            vec![key(KeyCode::Char('y')), key(KeyCode::Char('n'))]
        );
    }

    #[test]
    fn control_bytes() {
        assert_eq!(parse(b"\r"), vec![key(KeyCode::Enter)]);
        assert_eq!(parse(b"\n"), vec![key(KeyCode::Enter)]);
        assert_eq!(parse(b"\t"), vec![key(KeyCode::Tab)]);
        assert_eq!(parse(b"\x7f"), vec![key(KeyCode::Backspace)]);
        assert_eq!(
            parse(b"\x03"),
            vec![KeyEvent::new(KeyCode::Char('c'), Modifiers::CTRL)]
        );
    }

    #[test]
    fn lone_escape_waits_for_flush() {
        let mut p = Parser::new();
        assert!(p.advance(b"\x1b").is_empty());
        assert!(p.has_pending());
        assert_eq!(p.flush(), vec![key(KeyCode::Escape)]);
        assert!(!p.has_pending());
    }

    #[test]
    fn arrows_csi_and_ss3() {
        assert_eq!(parse(b"\x1b[A"), vec![key(KeyCode::Up)]);
        assert_eq!(parse(b"\x1b[D"), vec![key(KeyCode::Left)]);
        assert_eq!(parse(b"\x1bOB"), vec![key(KeyCode::Down)]);
        assert_eq!(parse(b"\x1bOP"), vec![key(KeyCode::F(1))]);
    }

    #[test]
    fn modified_arrow() {
        assert_eq!(
            parse(b"\x1b[1;5C"),
            vec![KeyEvent::new(KeyCode::Right, Modifiers::CTRL)]
        );
    }

    #[test]
    fn tilde_keys() {
        assert_eq!(parse(b"\x1b[3~"), vec![key(KeyCode::Delete)]);
        assert_eq!(parse(b"\x1b[5~"), vec![key(KeyCode::PageUp)]);
        assert_eq!(parse(b"\x1b[24~"), vec![key(KeyCode::F(12))]);
    }

    #[test]
    fn back_tab() {
        assert_eq!(
            parse(b"\x1b[Z"),
            vec![KeyEvent::new(KeyCode::Tab, Modifiers::SHIFT)]
        );
    }

    #[test]
    fn alt_char() {
        assert_eq!(
            parse(b"\x1bx"),
            vec![KeyEvent::new(KeyCode::Char('x'), Modifiers::ALT)]
        );
    }

    #[test]
    fn utf8_char() {
        assert_eq!(parse("é中".as_bytes()), vec![key(KeyCode::Char('é')), key(KeyCode::Char('中'))]);
    }

    #[test]
    fn split_sequence_resumes() {
        let mut p = Parser::new();
        assert!(p.advance(b"\x1b[").is_empty());
        assert_eq!(p.advance(b"B"), vec![key(KeyCode::Down)]);
    }

    #[test]
    fn unknown_csi_is_skipped() {
        assert_eq!(parse(b"\x1b[99~y"), vec![key(KeyCode::Char('y'))]);
    }

    #[test]
    fn stdin_keys_reads_in_order() {
        let mut keys = StdinKeys::from_reader(&b"ab"[..]);
        assert_eq!(keys.read_key().unwrap(), key(KeyCode::Char('a')));
        assert_eq!(keys.read_key().unwrap(), key(KeyCode::Char('b')));
        let err = keys.read_key().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn stdin_keys_bare_escape() {
        let mut keys = StdinKeys::from_reader(&b"\x1b"[..]);
        assert_eq!(keys.read_key().unwrap(), key(KeyCode::Escape));
    }
}
