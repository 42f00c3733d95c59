// SPDX-License-Identifier: MIT
//
// hb-core — the backend-independent half of halfblock.
//
// Every window backend, whatever it talks to underneath, funnels its
// native notifications into the same canonical `Event` stream. This crate
// owns that stream: the event vocabulary, the lock-protected FIFO queue
// that carries events from the producing context to the frame loop, the
// pump that applies them to display and input state, and the software
// framebuffer the application paints into.
//
// The backends (`hb-term`, `hb-toolkit`) depend on this crate and nothing
// here depends on them.

pub mod backend;
pub mod config;
pub mod display;
pub mod error;
pub mod event;
pub mod framebuffer;
pub mod input;
pub mod keys;
pub mod pump;
pub mod queue;

pub use error::{Error, Result};
