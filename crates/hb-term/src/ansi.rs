// SPDX-License-Identifier: MIT
//
// Escape sequences the terminal backend emits.
//
// Per-cell sequences (cursor placement, truecolor SGR) are functions over
// `impl Write` so the presenter can stream them into its frame buffer.
// The hook/unhook sequences that bracket a whole session are built here
// too: `hook` writes the session prologue, and `UNHOOK` is a constant byte
// string because it has to be written from signal context, where nothing
// may be formatted or allocated.
//
// Positions in this API are 0-based; the terminal's CUP is 1-based.

use std::io::{self, Write};

use hb_core::framebuffer::Rgba;

/// Lower half block (U+2584). The foreground colour fills the bottom half of
/// the cell, the background colour shows through the top half.
pub const HALF_BLOCK: &str = "\u{2584}";

// ─── Cells ──────────────────────────────────────────────────────────────────

/// Place the cursor at 0-based column `x`, row `y` (CUP).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Truecolor foreground (SGR 38;2). Alpha is ignored.
#[inline]
pub fn fg(w: &mut impl Write, c: Rgba) -> io::Result<()> {
    write!(w, "\x1b[38;2;{};{};{}m", c.r, c.g, c.b)
}

/// Truecolor background (SGR 48;2). Alpha is ignored.
#[inline]
pub fn bg(w: &mut impl Write, c: Rgba) -> io::Result<()> {
    write!(w, "\x1b[48;2;{};{};{}m", c.r, c.g, c.b)
}

// ─── Frames ─────────────────────────────────────────────────────────────────

/// Start a synchronized update (DEC mode 2026): the terminal holds the
/// screen until [`end_sync`]. Terminals without the mode ignore it.
#[inline]
pub fn begin_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

#[inline]
pub fn end_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}

// ─── Session ────────────────────────────────────────────────────────────────

/// How much pointer movement the terminal reports. Every mode uses SGR
/// encoding (DEC 1006), so there is no 223-column limit and releases are
/// told apart from presses by the final byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseMode {
    /// Presses and releases only (1000).
    Click,
    /// Plus movement while a button is held (1002).
    Drag,
    /// Plus all movement (1003).
    #[default]
    Motion,
}

/// Write the session prologue: alternate screen, default attributes, a
/// clear screen, mouse reporting for `mouse`, hidden cursor.
pub fn hook(w: &mut impl Write, mouse: MouseMode) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h\x1b[0m\x1b[2J\x1b[?1000h")?;
    if matches!(mouse, MouseMode::Drag | MouseMode::Motion) {
        w.write_all(b"\x1b[?1002h")?;
    }
    if mouse == MouseMode::Motion {
        w.write_all(b"\x1b[?1003h")?;
    }
    w.write_all(b"\x1b[?1006h\x1b[?25l")
}

/// Undo everything [`hook`] (and an interrupted synchronized update) did.
/// Leaving the alternate screen comes last so the shell's screen returns
/// with default attributes.
#[rustfmt::skip]
pub const UNHOOK: &[u8] = b"\
    \x1b[?2026l\
    \x1b[?1006l\x1b[?1003l\x1b[?1002l\x1b[?1000l\
    \x1b[0m\
    \x1b[?25h\
    \x1b[?1049l";

// ─── Tests ───────────────────────────────────────────────────────────────────
