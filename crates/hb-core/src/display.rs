// SPDX-License-Identifier: MIT
//
// Display state — what the rest of the application reads between frames.
//
// The backend fills in the screen description when it initializes and
// the window description when it creates a surface. From then on only the
// pump writes to it, in response to resize / focus / close events.

/// Description of the physical display (or terminal) the backend drives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenInfo {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Bytes per pixel.
    pub depth: u8,
    /// Horizontal scale factor of one surface pixel.
    pub scale_x: f32,
    /// Vertical scale factor of one surface pixel.
    pub scale_y: f32,
}

impl Default for ScreenInfo {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            depth: 4,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

/// State of the application window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowInfo {
    /// Drawable width in pixels.
    pub width: i32,
    /// Drawable height in pixels.
    pub height: i32,
    /// Whether the window has input focus.
    pub focused: bool,
    /// Whether the window exists (false before creation and after close).
    pub exists: bool,
}

/// Window-state snapshot exposed by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayState {
    pub screen: ScreenInfo,
    pub window: WindowInfo,
}

/// Whether the window covers the whole screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowState {
    #[default]
    Normal,
    Fullscreen,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_does_not_exist() {
        let state = DisplayState::default();
        assert!(!state.window.exists);
        assert!(!state.window.focused);
        assert_eq!(state.screen.depth, 4);
    }

    #[test]
    fn default_window_state_is_normal() {
        assert_eq!(WindowState::default(), WindowState::Normal);
    }
}
