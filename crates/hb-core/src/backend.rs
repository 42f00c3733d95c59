// SPDX-License-Identifier: MIT
//
// The interface every window backend exposes to the application.
//
// Construction is backend-specific (`TerminalBackend::initialize`,
// `ToolkitBackend::initialize`); everything after that goes through this
// trait, so the frame loop is written once:
//
//   backend.create_surface(w, h)?;
//   while backend.display().window.exists {
//       backend.process_events(&mut app)?;
//       app.paint(backend.framebuffer_mut()?);
//       backend.present(dirty)?;
//   }

use crate::display::{DisplayState, WindowState};
use crate::error::{Error, Result};
use crate::framebuffer::{Framebuffer, Rect};
use crate::input::InputState;
use crate::pump::EventSink;

/// A platform window backend.
pub trait WindowBackend {
    /// Current display and window state.
    fn display(&self) -> &DisplayState;

    /// Current held keys / buttons / pointer position.
    fn input(&self) -> &InputState;

    /// Create the drawable surface and its framebuffer.
    ///
    /// # Errors
    ///
    /// Fails if the size is unusable or the native surface cannot be made.
    fn create_surface(&mut self, width: u32, height: u32) -> Result<()>;

    /// The framebuffer to paint into.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSurface`] before `create_surface`.
    fn framebuffer_mut(&mut self) -> Result<&mut Framebuffer>;

    /// Collect pending native input and drain the event queue into `sink`.
    /// Call once per frame. Returns the number of events processed.
    ///
    /// # Errors
    ///
    /// Fails on an I/O error while reading native input.
    fn process_events(&mut self, sink: &mut impl EventSink) -> Result<usize>;

    /// Show the `dirty` part of the framebuffer.
    ///
    /// # Errors
    ///
    /// Fails before `create_surface` or on an output error.
    fn present(&mut self, dirty: Rect) -> Result<()>;

    /// Set the window title.
    ///
    /// # Errors
    ///
    /// Backend-specific.
    fn set_title(&mut self, title: &str) -> Result<()>;

    /// Make the window visible.
    ///
    /// # Errors
    ///
    /// Backend-specific.
    fn show(&mut self) -> Result<()>;

    /// Resize the window's drawable area.
    ///
    /// # Errors
    ///
    /// Backend-specific.
    fn set_size(&mut self, width: u32, height: u32) -> Result<()>;

    /// Whether the window is fullscreen.
    fn window_state(&self) -> WindowState {
        WindowState::Normal
    }

    /// Ask the window to close. The close arrives later as a
    /// `WindowClosing` event through the normal event path.
    ///
    /// # Errors
    ///
    /// Backend-specific.
    fn request_close(&mut self) -> Result<()>;

    /// Read text from the system clipboard.
    ///
    /// # Errors
    ///
    /// [`Error::NotSupported`] unless the backend overrides it.
    fn clipboard_text(&self) -> Result<String> {
        Err(Error::NotSupported("clipboard"))
    }

    /// Write text to the system clipboard.
    ///
    /// # Errors
    ///
    /// [`Error::NotSupported`] unless the backend overrides it.
    fn set_clipboard_text(&mut self, _text: &str) -> Result<()> {
        Err(Error::NotSupported("clipboard"))
    }

    /// Show a native open-file dialog filtered to `extensions`.
    ///
    /// # Errors
    ///
    /// [`Error::NotSupported`] unless the backend overrides it.
    fn open_file_dialog(&mut self, _extensions: &[&str]) -> Result<()> {
        Err(Error::NotSupported("open file dialog"))
    }

    /// Show a native save-file dialog.
    ///
    /// # Errors
    ///
    /// [`Error::NotSupported`] unless the backend overrides it.
    fn save_file_dialog(&mut self, _default_name: &str) -> Result<()> {
        Err(Error::NotSupported("save file dialog"))
    }

    /// Tear the backend down and restore the platform state.
    ///
    /// # Errors
    ///
    /// Fails if restoring the platform state fails.
    fn shutdown(&mut self) -> Result<()>;
}
