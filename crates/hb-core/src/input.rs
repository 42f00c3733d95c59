// SPDX-License-Identifier: MIT
//
// Input state — which keys and buttons are held, and where the pointer is.
//
// Written only by the pump. The application reads it between frames, e.g.
// to poll "is W held" for movement instead of tracking key events itself.

use std::collections::HashSet;

use crate::event::MouseButton;
use crate::keys::Key;

/// Held keys, held mouse buttons and the last pointer position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    keys: HashSet<Key>,
    buttons: HashSet<MouseButton>,
    pointer: (i32, i32),
}

impl InputState {
    /// Empty state: nothing held, pointer at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition.
    ///
    /// Returns `true` when this is a press of a key that was already held
    /// (an auto-repeat).
    pub fn set_key(&mut self, key: Key, pressed: bool) -> bool {
        if pressed {
            !self.keys.insert(key)
        } else {
            self.keys.remove(&key);
            false
        }
    }

    /// Record a mouse button transition.
    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(&button);
        }
    }

    /// Record the pointer position.
    pub const fn set_pointer(&mut self, x: i32, y: i32) {
        self.pointer = (x, y);
    }

    /// Whether `key` is currently held.
    #[must_use]
    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    /// Whether `button` is currently held.
    #[must_use]
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Last reported pointer position.
    #[must_use]
    pub const fn pointer(&self) -> (i32, i32) {
        self.pointer
    }

    /// Release every held key and button. The pump calls this when the
    /// window loses focus.
    pub fn release_all(&mut self) {
        self.keys.clear();
        self.buttons.clear();
    }
}
