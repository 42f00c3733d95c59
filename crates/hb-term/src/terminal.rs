// SPDX-License-Identifier: MIT
//
// Terminal control — input mode, alternate screen, and exactly-once restore.
//
// Safety: termios (tcgetattr, tcsetattr), ioctl (TIOCGWINSZ), isatty and
// raw fd writes are only reachable through `unsafe`. Each unsafe block is
// kept to the single call it needs.
#![allow(unsafe_code)]
//
// Hooking the terminal turns off echo and canonical line buffering (signal
// generation stays on, so Ctrl-C still raises SIGINT), switches to the
// alternate screen, clears it, enables SGR mouse reporting and hides the
// cursor.
//
// Restoring it can be triggered from four places: a termination signal, the
// panic hook, `Drop`, and an explicit shutdown. Some of those run in signal
// context, so the saved termios lives in a plain static cell guarded by an
// atomic state word rather than a `Mutex`, and the restore path only calls
// `tcsetattr` and `write`. Whichever caller wins the compare-exchange does
// the restore; everyone else sees it already done.

use std::io::{self, Write};
use std::sync::Once;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::ansi::{self, MouseMode};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

impl Size {
    /// Fallback when the size cannot be queried (pipes, tests).
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };

    /// Surface width in pixels: one pixel per column.
    #[inline]
    #[must_use]
    pub const fn pixel_width(self) -> i32 {
        self.cols as i32
    }

    /// Surface height in pixels: two pixels per row.
    #[inline]
    #[must_use]
    pub const fn pixel_height(self) -> i32 {
        self.rows as i32 * 2
    }
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Hook State ─────────────────────────────────────────────────────────────

const UNHOOKED: u8 = 0;
const HOOKED: u8 = 1;

/// `HOOKED` while the terminal is in our mode and not yet restored.
static STATE: AtomicU8 = AtomicU8::new(UNHOOKED);

/// Termios saved at hook time. Written only while `STATE` is `UNHOOKED`,
/// read only by the caller that moves `STATE` from `HOOKED` to `UNHOOKED`.
#[cfg(unix)]
struct SavedTermios(std::cell::UnsafeCell<Option<libc::termios>>);

// SAFETY: access is serialized by `STATE` as described above.
#[cfg(unix)]
unsafe impl Sync for SavedTermios {}

#[cfg(unix)]
static SAVED: SavedTermios = SavedTermios(std::cell::UnsafeCell::new(None));

/// Whether the terminal is currently hooked.
#[must_use]
pub fn is_hooked() -> bool {
    STATE.load(Ordering::Acquire) == HOOKED
}

/// Restore the terminal if it is hooked. Returns `true` for the one caller
/// that performed the restore.
///
/// Async-signal-safe: touches only an atomic, `tcsetattr` and `write(2)`.
pub fn restore_once() -> bool {
    if STATE
        .compare_exchange(HOOKED, UNHOOKED, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return false;
    }

    #[cfg(unix)]
    unsafe {
        if let Some(original) = (*SAVED.0.get()).as_ref() {
            let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
        }
        let _ = libc::write(
            libc::STDOUT_FILENO,
            ansi::UNHOOK.as_ptr().cast::<libc::c_void>(),
            ansi::UNHOOK.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(ansi::UNHOOK);
        let _ = stdout.flush();
    }

    true
}

/// Save the current termios and clear echo and canonical mode.
#[cfg(unix)]
fn enter_input_mode() -> io::Result<()> {
    if !is_tty() {
        return Ok(());
    }

    unsafe {
        let mut termios: libc::termios = std::mem::zeroed();
        if libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) != 0 {
            return Err(io::Error::last_os_error());
        }

        *SAVED.0.get() = Some(termios);

        termios.c_lflag &= !(libc::ECHO | libc::ICANON);
        if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &raw const termios) != 0 {
            return Err(io::Error::last_os_error());
        }
    }

    Ok(())
}

#[cfg(not(unix))]
fn enter_input_mode() -> io::Result<()> {
    Ok(())
}

// ─── Panic Hook ─────────────────────────────────────────────────────────────

static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install (once per process) a panic hook that restores the terminal
/// before the original hook prints the message.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_once();
            original(info);
        }));
    });
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Terminal handle with RAII cleanup.
///
/// [`enter`](Self::enter) hooks the terminal; it is restored on
/// [`leave`](Self::leave), on drop, on panic, or by a termination signal,
/// whichever happens first.
pub struct Terminal {
    size: Size,
}

impl Terminal {
    /// Create a handle and query the current size, falling back to 80×24.
    #[must_use]
    pub fn new() -> Self {
        Self {
            size: get_size().unwrap_or(Size::FALLBACK),
        }
    }

    /// Cached terminal size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-query the size from the OS and cache it.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(s) = get_size() {
            self.size = s;
        }
        self.size
    }

    /// Whether the terminal is hooked.
    #[must_use]
    pub fn is_active(&self) -> bool {
        is_hooked()
    }

    /// Hook the terminal. A no-op if it is already hooked.
    ///
    /// # Errors
    ///
    /// Returns an error if termios or terminal output fails.
    pub fn enter(&mut self, mouse: MouseMode) -> io::Result<()> {
        if is_hooked() {
            return Ok(());
        }

        install_panic_hook();
        enter_input_mode()?;
        STATE.store(HOOKED, Ordering::Release);

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        ansi::hook(&mut lock, mouse)?;
        lock.flush()?;

        tracing::info!(cols = self.size.cols, rows = self.size.rows, "terminal hooked");
        Ok(())
    }

    /// Restore the terminal. A no-op if something else already did.
    pub fn leave(&mut self) {
        if restore_once() {
            tracing::info!("terminal unhooked");
        }
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        self.leave();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
