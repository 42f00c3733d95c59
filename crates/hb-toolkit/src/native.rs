// SPDX-License-Identifier: MIT
//
// What the backend needs from a native GUI toolkit.
//
// Two traits: the `Toolkit` (application object, runs its message loop on
// a thread of its own) and the `NativeWindow` it creates. The window is
// shared with that loop, so every call from the frame loop that touches
// it goes through a `WindowGuard`, which holds the window lock for exactly
// as long as the guard lives.
//
// Rectangles follow the toolkit convention of inclusive right/bottom
// edges: a 640-pixel-wide frame at x=0 spans 0..=639.

use std::ops::Deref;
use std::sync::Arc;

use hb_core::framebuffer::{Framebuffer, Rect};

use crate::adapter::ToolkitAdapter;
use crate::message::{NativeMessage, Point};

// ─── NativeRect ─────────────────────────────────────────────────────────────

/// A toolkit rectangle with inclusive `right`/`bottom` edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NativeRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl NativeRect {
    #[must_use]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The inclusive rectangle covering `width`×`height` pixels at `(x, y)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_size(x: i32, y: i32, width: u32, height: u32) -> Self {
        let (x, y) = (x as f32, y as f32);
        Self::new(x, y, x + width as f32 - 1.0, y + height as f32 - 1.0)
    }

    /// `right - left`: one less than the pixel width.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// `bottom - top`: one less than the pixel height.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// [`width`](Self::width) rounded to an integer.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn integer_width(&self) -> i32 {
        self.width().round() as i32
    }

    /// [`height`](Self::height) rounded to an integer.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn integer_height(&self) -> i32 {
        self.height().round() as i32
    }
}

// ─── Traits ─────────────────────────────────────────────────────────────────

/// A native top-level window with a single drawing view.
///
/// All methods except `lock`/`unlock` must only be called with the window
/// locked; use [`WindowGuard`].
pub trait NativeWindow: Send + Sync {
    /// Acquire the window lock, blocking. Returns `false` if the window is
    /// gone and cannot be locked.
    fn lock(&self) -> bool;

    /// Release the window lock.
    fn unlock(&self);

    /// Drawable view bounds, origin at the view's top-left.
    fn bounds(&self) -> NativeRect;

    /// Window frame in screen coordinates.
    fn frame(&self) -> NativeRect;

    fn set_title(&self, title: &str);

    /// Make the window visible.
    fn show(&self);

    /// Move the frame's top-left corner.
    fn move_to(&self, x: f32, y: f32);

    /// Resize so that the frame's `width()`/`height()` equal the arguments.
    fn resize_to(&self, width: f32, height: f32);

    /// Copy `rect` of `framebuffer` to the same place in the view.
    fn draw_bitmap(&self, framebuffer: &Framebuffer, rect: Rect);

    /// Pointer position in view coordinates.
    fn mouse_position(&self) -> Point;
}

/// A native GUI toolkit's application object.
pub trait Toolkit: Send + Sync + 'static {
    type Window: NativeWindow;

    /// Run the application message loop, routing every message through
    /// `adapter`. Called once, on a dedicated thread; returns only when
    /// the application quits.
    fn run(&self, adapter: Arc<ToolkitAdapter>);

    /// Whether the application is still starting up. `true` until `run`
    /// has its loop ready to receive messages.
    fn is_launching(&self) -> bool;

    /// Frame of the main screen.
    fn screen_frame(&self) -> NativeRect;

    /// Create a hidden window with the given frame.
    fn create_window(&self, frame: NativeRect, title: &str) -> Self::Window;

    /// Post a message to the application loop.
    fn post_app_message(&self, msg: NativeMessage);

    /// Warp the pointer to `(x, y)` in screen coordinates.
    fn set_mouse_position(&self, x: f32, y: f32);

    /// Show or hide the pointer.
    fn set_cursor_visible(&self, visible: bool);
}

// ─── WindowGuard ────────────────────────────────────────────────────────────

/// Scoped window lock: unlocks on drop, on every exit path.
#[must_use = "the window is unlocked as soon as the guard is dropped"]
pub struct WindowGuard<'a, W: NativeWindow + ?Sized> {
    window: &'a W,
}

impl<'a, W: NativeWindow + ?Sized> WindowGuard<'a, W> {
    /// Lock `window`. `None` if the lock could not be taken.
    pub fn lock(window: &'a W) -> Option<Self> {
        window.lock().then_some(Self { window })
    }
}

impl<W: NativeWindow + ?Sized> Deref for WindowGuard<'_, W> {
    type Target = W;

    fn deref(&self) -> &W {
        self.window
    }
}

impl<W: NativeWindow + ?Sized> Drop for WindowGuard<'_, W> {
    fn drop(&mut self) {
        self.window.unlock();
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
