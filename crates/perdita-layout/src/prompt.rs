//! Blocking prompts written into a pane.
//!
//! Both prompts render their message through [`Pane::write`], so the
//! message is markup and the pane remembers where it ended.

use std::io::Write;

use perdita_term::input::{KeyCode, KeySource, Modifiers};
use perdita_term::Terminal;

use crate::error::LayoutError;
use crate::pane::Pane;

/// Message used when [`Pane::request_confirmation`] is given none.
pub const DEFAULT_CONFIRMATION: &str = "Please Confirm";

/// Message used when [`Pane::press_any_key`] is given none.
pub const DEFAULT_PRESS_ANY_KEY: &str = "|i>Press any key to continue...|";

/// Markup appended to every confirmation message.
const CHOICES: &str = " (|fg[green]>y|/|fg[red]>n|)";

impl Pane {
    /// Ask a yes/no question and wait for the answer.
    ///
    /// `y` answers yes. `n`, Escape and Ctrl+C answer no. Every other key
    /// is ignored and the wait continues.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Term`] if the message cannot be written or
    /// the key source fails.
    pub fn request_confirmation<W: Write, K: KeySource>(
        &mut self,
        term: &mut Terminal<W>,
        keys: &mut K,
        message: Option<&str>,
    ) -> Result<bool, LayoutError> {
        let message = message.unwrap_or(DEFAULT_CONFIRMATION);
        self.write(term, &format!("{message}{CHOICES}"))?;

        loop {
            let key = keys.read_key()?;
            match key.code {
                KeyCode::Char('c') if key.modifiers.contains(Modifiers::CTRL) => return Ok(false),
                KeyCode::Char('y') => return Ok(true),
                KeyCode::Char('n') | KeyCode::Escape => return Ok(false),
                _ => tracing::trace!(?key, "ignored key while confirming"),
            }
        }
    }

    /// Show a message and block until any key arrives.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Term`] if the message cannot be written or
    /// the key source fails.
    pub fn press_any_key<W: Write, K: KeySource>(
        &mut self,
        term: &mut Terminal<W>,
        keys: &mut K,
        message: Option<&str>,
    ) -> Result<(), LayoutError> {
        self.write(term, message.unwrap_or(DEFAULT_PRESS_ANY_KEY))?;
        keys.read_key()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;

    use perdita_term::input::KeyEvent;
    use perdita_term::{Point, Size};

    use super::*;

    /// Replays a fixed list of keys, then reports end of input.
    struct Scripted(VecDeque<KeyEvent>);

    impl Scripted {
        fn new(codes: &[KeyCode]) -> Self {
            Self(codes.iter().map(|&c| KeyEvent::plain(c)).collect())
        }
    }

    impl KeySource for Scripted {
        fn read_key(&mut self) -> io::Result<KeyEvent> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script ended"))
        }
    }

    fn term() -> Terminal<Vec<u8>> {
        let mut t = Terminal::new(Vec::new(), Size::new(80, 24)).unwrap();
        t.output_mut().clear();
        t
    }

    fn confirm(codes: &[KeyCode]) -> Result<bool, LayoutError> {
        let mut t = term();
        Pane::full_screen().request_confirmation(&mut t, &mut Scripted::new(codes), None)
    }

    #[test]
    fn y_confirms() {
        assert!(confirm(&[KeyCode::Char('y')]).unwrap());
    }

    #[test]
    fn n_and_escape_decline() {
        assert!(!confirm(&[KeyCode::Char('n')]).unwrap());
        assert!(!confirm(&[KeyCode::Escape]).unwrap());
    }

    #[test]
    fn other_keys_are_ignored() {
        assert!(confirm(&[KeyCode::Char('x'), KeyCode::Enter, KeyCode::Char('y')]).unwrap());
    }

    #[test]
    fn ctrl_c_declines() {
        let mut t = term();
        let mut keys = Scripted(VecDeque::from([KeyEvent::new(
            KeyCode::Char('c'),
            Modifiers::CTRL,
        )]));
        let answer = Pane::full_screen()
            .request_confirmation(&mut t, &mut keys, None)
            .unwrap();
        assert!(!answer);
    }

    #[test]
    fn key_source_errors_propagate() {
        let err = confirm(&[KeyCode::Char('q')]).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Term(perdita_term::Error::Io(ref e)) if e.kind() == io::ErrorKind::UnexpectedEof
        ));
    }

    #[test]
    fn confirmation_renders_choices() {
        let mut t = term();
        let mut pane = Pane::full_screen();
        pane.request_confirmation(&mut t, &mut Scripted::new(&[KeyCode::Char('y')]), Some("Delete?"))
            .unwrap();
        let out = String::from_utf8(t.into_inner()).unwrap();
        assert!(out.starts_with("Delete? "));
        assert!(out.contains("\x1b[38;2;0;255;0my"));
        assert!(out.contains("\x1b[38;2;255;0;0mn"));
    }

    #[test]
    fn press_any_key_uses_default_message() {
        let mut t = term();
        let mut pane = Pane::full_screen();
        pane.press_any_key(&mut t, &mut Scripted::new(&[KeyCode::Tab]), None)
            .unwrap();
        assert_eq!(pane.last_known(), Some(Point::new(28, 0)));
        let out = String::from_utf8(t.into_inner()).unwrap();
        assert!(out.starts_with("\x1b[3mPress any key to continue..."));
    }
}
