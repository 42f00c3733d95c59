// SPDX-License-Identifier: MIT
//
// Frame output.
//
// A present produces thousands of small escape sequences. They all land
// in an `OutputBuffer` first and reach the terminal in a single write, so
// the terminal never sees half a frame between two syscalls.
//
// `HalfBlockWriter` decides which sequences a cell needs. It remembers the
// colours and cursor position the terminal is left in and leaves out
// anything that would not change them: a run of same-coloured cells on
// one row costs one pair of colour sequences, one cursor move, and then
// nothing but glyphs.

use std::io::{self, Write};

use hb_core::framebuffer::Rgba;

use crate::ansi;

// ─── OutputBuffer ───────────────────────────────────────────────────────────

/// Initial size. Frames with many colour changes outgrow it once and the
/// capacity is kept from then on.
const INITIAL_CAPACITY: usize = 16 * 1024;

/// In-memory sink for one frame of terminal output.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

impl OutputBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes written since the last flush.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Send the frame to stdout.
    ///
    /// # Errors
    ///
    /// Propagates the stdout write error; the bytes are kept in that case.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        self.flush_to(&mut io::stdout().lock())
    }

    /// Send the frame to `w` in one `write_all`, then empty the buffer.
    ///
    /// # Errors
    ///
    /// Propagates the write error; the bytes are kept in that case.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        w.write_all(&self.buf)?;
        w.flush()?;
        self.buf.clear();
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    /// No-op: bytes leave through [`OutputBuffer::flush_to`].
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── HalfBlockWriter ─────────────────────────────────────────────────────────

/// Colour as the terminal sees it: alpha plays no part.
type Rgb = [u8; 3];

const fn rgb(c: Rgba) -> Rgb {
    [c.r, c.g, c.b]
}

/// Stateful half-block cell renderer.
///
/// Per cell it emits, in order: background SGR, foreground SGR, cursor
/// position, then `▄`. Each of the first three is skipped when it would
/// not change terminal state.
///
/// - **Colours**: skipped if unchanged since the last emit.
/// - **Cursor**: skipped when the cell is at `(last_x + 1, last_y)`, since
///   the terminal advanced there after the previous glyph.
#[allow(clippy::struct_field_names)]
pub struct HalfBlockWriter {
    last_x: i32,
    last_y: i32,
    last_fg: Option<Rgb>,
    last_bg: Option<Rgb>,
}

impl HalfBlockWriter {
    /// A writer that assumes nothing about the terminal.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_x: -1,
            last_y: -1,
            last_fg: None,
            last_bg: None,
        }
    }

    /// Forget all tracked state. Call before each frame: the terminal may
    /// have been written to (or resized) in between.
    #[allow(clippy::missing_const_for_fn)]
    pub fn reset_state(&mut self) {
        *self = Self::new();
    }

    /// Render the cell at column `x`, row `y`: `top` shows through the
    /// upper half, `bottom` fills the lower half.
    pub fn render_cell(&mut self, out: &mut OutputBuffer, x: u16, y: u16, top: Rgba, bottom: Rgba) {
        let xi = i32::from(x);
        let yi = i32::from(y);

        let bg = rgb(top);
        if self.last_bg != Some(bg) {
            ansi::bg(out, top).ok();
            self.last_bg = Some(bg);
        }

        let fg = rgb(bottom);
        if self.last_fg != Some(fg) {
            ansi::fg(out, bottom).ok();
            self.last_fg = Some(fg);
        }

        if yi != self.last_y || xi != self.last_x + 1 {
            ansi::cursor_to(out, x, y).ok();
        }

        out.buf.extend_from_slice(ansi::HALF_BLOCK.as_bytes());
        self.last_x = xi;
        self.last_y = yi;
    }
}

impl Default for HalfBlockWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
