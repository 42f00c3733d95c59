// SPDX-License-Identifier: MIT
//
// hb-term — the terminal backend for halfblock.
//
// Draws a software framebuffer into the terminal with the lower half block
// (`▄`): every character cell carries two pixels, the upper one as the
// background colour and the lower one as the foreground colour, both as
// 24-bit truecolor. Input comes back the other way as SGR mouse reports
// and printable bytes on stdin, resize and termination as signals.
//
// Like the rest of the workspace this talks to the terminal directly with
// ANSI sequences and termios, no TUI framework in between.

pub mod ansi;
pub mod backend;
pub mod input;
pub mod keymap;
pub mod output;
pub mod present;
pub mod signals;
pub mod stdin;
pub mod terminal;

pub use backend::{TerminalBackend, TerminalConfig};
