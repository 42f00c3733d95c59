// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Signal-driven sticky flags.
//
// Resize and termination never arrive through the byte stream. SIGWINCH
// raises the resize flag; SIGINT and SIGTERM raise the close flag and put
// the terminal back immediately, since the process may be gone before the
// normal shutdown path runs. The poll step swaps each flag clear once per
// frame and turns it into a canonical event.
//
// Handlers store to atomics and call `terminal::restore_once` (itself
// async-signal-safe). Nothing else happens in signal context.

use std::sync::atomic::{AtomicBool, Ordering};

/// A pair of sticky flags: set by a handler, cleared by the poll step.
#[derive(Debug)]
pub struct SignalFlags {
    resize: AtomicBool,
    close: AtomicBool,
}

impl SignalFlags {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            resize: AtomicBool::new(false),
            close: AtomicBool::new(false),
        }
    }

    /// Note that the terminal changed size.
    pub fn raise_resize(&self) {
        self.resize.store(true, Ordering::Release);
    }

    /// Note that the application should close.
    pub fn raise_close(&self) {
        self.close.store(true, Ordering::Release);
    }

    /// Clear the resize flag, returning whether it was set.
    pub fn take_resize(&self) -> bool {
        self.resize.swap(false, Ordering::AcqRel)
    }

    /// Clear the close flag, returning whether it was set.
    pub fn take_close(&self) -> bool {
        self.close.swap(false, Ordering::AcqRel)
    }
}

impl Default for SignalFlags {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide flags the installed handlers write to.
pub static SIGNALS: SignalFlags = SignalFlags::new();

// ─── Handlers ───────────────────────────────────────────────────────────────

#[cfg(unix)]
extern "C" fn on_winch(_sig: libc::c_int) {
    SIGNALS.raise_resize();
}

#[cfg(unix)]
extern "C" fn on_terminate(_sig: libc::c_int) {
    SIGNALS.raise_close();
    crate::terminal::restore_once();
}

#[cfg(unix)]
fn set_handler(sig: libc::c_int, handler: libc::sighandler_t) {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = handler;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(sig, &raw const sa, std::ptr::null_mut());
    }
}

/// Install the SIGWINCH, SIGINT and SIGTERM handlers.
#[cfg(unix)]
pub fn install() {
    set_handler(libc::SIGWINCH, on_winch as *const () as libc::sighandler_t);
    set_handler(libc::SIGINT, on_terminate as *const () as libc::sighandler_t);
    set_handler(libc::SIGTERM, on_terminate as *const () as libc::sighandler_t);
}

/// Put the default dispositions back.
#[cfg(unix)]
pub fn uninstall() {
    set_handler(libc::SIGWINCH, libc::SIG_DFL);
    set_handler(libc::SIGINT, libc::SIG_DFL);
    set_handler(libc::SIGTERM, libc::SIG_DFL);
}

#[cfg(not(unix))]
pub fn install() {}

#[cfg(not(unix))]
pub fn uninstall() {}

// ─── Tests ───────────────────────────────────────────────────────────────────
