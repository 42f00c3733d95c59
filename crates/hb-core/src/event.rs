// SPDX-License-Identifier: MIT
//
// Canonical events.
//
// The device-independent vocabulary every backend speaks. Adapters build
// these from native notifications; the pump consumes them. An event is a
// plain `Copy` value: created once when the native notification arrives,
// discarded once the pump has applied it.
//
// Key events carry the *native* key code rather than a canonical key. The
// mapping happens in the pump, against the backend's key table, so that an
// unknown code is detected (and reported) in exactly one place.

// ─── Mouse Buttons ──────────────────────────────────────────────────────────

/// Canonical mouse button identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Tertiary button (usually the wheel click).
    Middle,
    /// First extra button ("back").
    X1,
    /// Second extra button ("forward").
    X2,
}

// ─── Event ──────────────────────────────────────────────────────────────────

/// A canonical input or window-state event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Vertical wheel movement. Positive values scroll away from the user.
    MouseScroll { delta: f32 },
    /// A mouse button went down.
    MouseButtonDown(MouseButton),
    /// A mouse button went up.
    MouseButtonUp(MouseButton),
    /// The pointer moved to `(x, y)` in surface coordinates.
    MouseMove { x: i32, y: i32 },
    /// A key went down. Carries the backend's native key code.
    KeyDown(u32),
    /// A key went up. Carries the backend's native key code.
    KeyUp(u32),
    /// A single Unicode code point of text input.
    TextInput(char),
    /// The drawable surface changed size (true pixel dimensions).
    WindowResized { width: i32, height: i32 },
    /// The window gained (`true`) or lost (`false`) input focus.
    WindowFocusChanged(bool),
    /// The surface contents were invalidated and need repainting.
    WindowRedrawNeeded,
    /// The window is being closed.
    WindowClosing,
}

/// Fieldless discriminant of [`Event`], for filtering and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MouseScroll,
    MouseButtonDown,
    MouseButtonUp,
    MouseMove,
    KeyDown,
    KeyUp,
    TextInput,
    WindowResized,
    WindowFocusChanged,
    WindowRedrawNeeded,
    WindowClosing,
}

impl Event {
    /// The kind tag of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::MouseScroll { .. } => EventKind::MouseScroll,
            Self::MouseButtonDown(_) => EventKind::MouseButtonDown,
            Self::MouseButtonUp(_) => EventKind::MouseButtonUp,
            Self::MouseMove { .. } => EventKind::MouseMove,
            Self::KeyDown(_) => EventKind::KeyDown,
            Self::KeyUp(_) => EventKind::KeyUp,
            Self::TextInput(_) => EventKind::TextInput,
            Self::WindowResized { .. } => EventKind::WindowResized,
            Self::WindowFocusChanged(_) => EventKind::WindowFocusChanged,
            Self::WindowRedrawNeeded => EventKind::WindowRedrawNeeded,
            Self::WindowClosing => EventKind::WindowClosing,
        }
    }

    /// Button-edge event for `button` in the given state.
    #[must_use]
    pub const fn button(button: MouseButton, pressed: bool) -> Self {
        if pressed {
            Self::MouseButtonDown(button)
        } else {
            Self::MouseButtonUp(button)
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(Event::MouseScroll { delta: 1.0 }.kind(), EventKind::MouseScroll);
        assert_eq!(Event::MouseMove { x: 1, y: 2 }.kind(), EventKind::MouseMove);
        assert_eq!(Event::KeyDown(30).kind(), EventKind::KeyDown);
        assert_eq!(Event::KeyUp(30).kind(), EventKind::KeyUp);
        assert_eq!(Event::TextInput('x').kind(), EventKind::TextInput);
        assert_eq!(Event::WindowClosing.kind(), EventKind::WindowClosing);
        assert_eq!(
            Event::WindowResized { width: 1, height: 1 }.kind(),
            EventKind::WindowResized
        );
    }

    #[test]
    fn button_constructor_picks_edge() {
        assert_eq!(
            Event::button(MouseButton::Left, true),
            Event::MouseButtonDown(MouseButton::Left)
        );
        assert_eq!(
            Event::button(MouseButton::Right, false),
            Event::MouseButtonUp(MouseButton::Right)
        );
    }

    #[test]
    fn events_are_copy() {
        let a = Event::WindowFocusChanged(true);
        let b = a;
        assert_eq!(a, b);
    }
}
