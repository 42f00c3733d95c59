// SPDX-License-Identifier: MIT
//
// hb-toolkit — the native GUI toolkit backend for halfblock.
//
// A desktop toolkit runs its own application loop and delivers input and
// window changes as messages on that loop's thread. This crate bridges
// that world to the frame loop:
//
//   toolkit thread                          frame loop thread
//   ──────────────                          ─────────────────
//   NativeMessage ─▶ ToolkitAdapter ─▶ EventQueue ─▶ pump ─▶ EventSink
//                                                  ◀─ present (locked blit)
//
// The toolkit itself is abstract (`native::Toolkit`); `HeadlessToolkit` is
// an in-process implementation used by the demo and the tests.

pub mod adapter;
pub mod backend;
pub mod headless;
pub mod keymap;
pub mod message;
pub mod native;

pub use adapter::{Disposition, ToolkitAdapter};
pub use backend::ToolkitBackend;
pub use headless::{HeadlessToolkit, HeadlessWindow};
