// SPDX-License-Identifier: MIT
//
// TTY control: size queries, raw mode, and restore on exit.
//
// Safety: termios, ioctl(TIOCGWINSZ), isatty and the raw fd write in the
// panic hook are POSIX calls with no safe wrapper in std. Each unsafe block
// covers one call.
#![allow(unsafe_code)]
//
// Two layers. `RawMode` owns the saved termios of stdin and puts it back
// when dropped. `TtyGuard` adds the screen side on top of it: alternate
// screen saved, cursor hidden, and a process-wide panic hook that undoes
// both if a render dies halfway. The hook writes to fd 1 directly so it
// never blocks on a stdout lock the panicking thread may still hold.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;
use crate::coord::Size;

// ─── Queries ────────────────────────────────────────────────────────────────

#[cfg(unix)]
fn window_size(fd: libc::c_int) -> Option<Size> {
    let mut ws = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let rc = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &raw mut ws) };
    if rc != 0 || ws.ws_col == 0 || ws.ws_row == 0 {
        return None;
    }
    Some(Size::new(ws.ws_col, ws.ws_row))
}

/// Terminal size in cells, asked of stdout and then stdin.
///
/// `None` when neither is a terminal, or the terminal reports a zero
/// dimension.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    window_size(libc::STDOUT_FILENO).or_else(|| window_size(libc::STDIN_FILENO))
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Whether stdin is attached to a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) == 1 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Raw Mode ───────────────────────────────────────────────────────────────

/// Termios to put back if a panic skips the normal drop path.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

#[cfg(unix)]
fn remember_termios(saved: Option<libc::termios>) {
    match SAVED_TERMIOS.lock() {
        Ok(mut slot) => *slot = saved,
        Err(poisoned) => *poisoned.into_inner() = saved,
    }
}

/// Stdin switched to byte-at-a-time input with no echo and no signals.
///
/// The previous settings come back on drop. When stdin is not a terminal
/// nothing is changed and nothing is restored.
pub struct RawMode {
    #[cfg(unix)]
    saved: Option<libc::termios>,
}

impl RawMode {
    /// # Errors
    ///
    /// Returns the OS error if the termios of stdin cannot be read or set.
    #[cfg(unix)]
    pub fn enable() -> io::Result<Self> {
        if !is_tty() {
            return Ok(Self { saved: None });
        }

        // SAFETY: termios is plain old data; tcgetattr fills every field.
        let mut current: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut current) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let saved = current;

        unsafe { libc::cfmakeraw(&raw mut current) };
        // One byte at a time, no read timeout.
        current.c_cc[libc::VMIN] = 1;
        current.c_cc[libc::VTIME] = 0;

        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const current) } != 0
        {
            return Err(io::Error::last_os_error());
        }

        remember_termios(Some(saved));
        Ok(Self { saved: Some(saved) })
    }

    /// # Errors
    ///
    /// Never fails on this platform.
    #[cfg(not(unix))]
    pub fn enable() -> io::Result<Self> {
        Ok(Self {})
    }

    /// Whether the termios was actually changed.
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        #[cfg(unix)]
        {
            self.saved.is_some()
        }
        #[cfg(not(unix))]
        {
            false
        }
    }

    /// Put the saved settings back now.
    ///
    /// # Errors
    ///
    /// Returns the OS error if tcsetattr fails. The settings stay saved so
    /// the drop can try again.
    pub fn disable(&mut self) -> io::Result<()> {
        #[cfg(unix)]
        {
            let Some(saved) = self.saved else {
                return Ok(());
            };
            if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const saved) }
                != 0
            {
                return Err(io::Error::last_os_error());
            }
            self.saved = None;
            remember_termios(None);
        }
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = self.disable() {
            tracing::warn!(error = %e, "could not leave raw mode");
        }
    }
}

// ─── Panic Restore ──────────────────────────────────────────────────────────

/// Plain style, visible cursor, then the saved screen.
const PANIC_RESTORE: &[u8] = b"\x1b[0m\x1b[?25h\x1b[?47l";

static HOOK: Once = Once::new();

fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_after_panic();
            previous(info);
        }));
    });
}

#[cfg(unix)]
fn restore_after_panic() {
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            PANIC_RESTORE.as_ptr().cast(),
            PANIC_RESTORE.len(),
        );
    }
    let saved = match SAVED_TERMIOS.lock() {
        Ok(slot) => *slot,
        Err(poisoned) => *poisoned.into_inner(),
    };
    if let Some(saved) = saved {
        unsafe {
            let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &raw const saved);
        }
    }
}

#[cfg(not(unix))]
fn restore_after_panic() {
    let mut out = io::stdout();
    let _ = out.write_all(PANIC_RESTORE);
    let _ = out.flush();
}

// ─── TtyGuard ───────────────────────────────────────────────────────────────

/// A full-screen session on the controlling terminal.
///
/// ```no_run
/// use perdita_term::tty::TtyGuard;
///
/// let mut tty = TtyGuard::new();
/// tty.enter()?;
/// // render, read keys
/// tty.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Default)]
pub struct TtyGuard {
    raw: Option<RawMode>,
}

impl TtyGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.raw.is_some()
    }

    /// Raw input, alternate screen saved, cursor hidden.
    ///
    /// Entering twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if termios or stdout fails. Raw mode is undone
    /// again when the screen setup fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.is_active() {
            return Ok(());
        }

        install_panic_hook();
        let raw = RawMode::enable()?;

        let mut out = io::stdout().lock();
        ansi::save_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        out.flush()?;

        tracing::debug!(raw = raw.is_raw(), "tty entered");
        self.raw = Some(raw);
        Ok(())
    }

    /// Undo [`enter`](Self::enter). Leaving an inactive guard is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout or termios fails.
    pub fn leave(&mut self) -> io::Result<()> {
        let Some(mut raw) = self.raw.take() else {
            return Ok(());
        };

        {
            let mut out = io::stdout().lock();
            ansi::reset(&mut out)?;
            ansi::cursor_show(&mut out)?;
            ansi::restore_screen(&mut out)?;
            out.flush()?;
        }

        raw.disable()?;
        tracing::debug!("tty left");
        Ok(())
    }
}

impl Drop for TtyGuard {
    fn drop(&mut self) {
        if let Err(e) = self.leave() {
            tracing::warn!(error = %e, "tty restore failed");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
