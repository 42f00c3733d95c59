// SPDX-License-Identifier: MIT
//
// Canonical keys and native key tables.
//
// Backends describe their native key codes with a static table: a
// `&'static [Option<Key>]` indexed by the native code, built at compile
// time. A `None` slot (or an index past the end) is the "no canonical key"
// answer; the pump logs it and drops the event.

// ─── Key ────────────────────────────────────────────────────────────────────

/// Canonical, layout-independent key identity.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    // ── Letters ─────────────────────────────────────────────────
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    // ── Digit row ───────────────────────────────────────────────
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,
    // ── Function keys ───────────────────────────────────────────
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    // ── Editing / whitespace ────────────────────────────────────
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,
    Insert,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    // ── Punctuation ─────────────────────────────────────────────
    Tilde,
    Minus,
    Equals,
    LBracket,
    RBracket,
    Backslash,
    Semicolon,
    Quote,
    Comma,
    Period,
    Slash,
    // ── Modifiers ───────────────────────────────────────────────
    LShift,
    RShift,
    LCtrl,
    RCtrl,
    LAlt,
    RAlt,
    LWin,
    RWin,
    // ── Locks / system ──────────────────────────────────────────
    CapsLock,
    ScrollLock,
    NumLock,
    PrintScreen,
    Pause,
    // ── Keypad ──────────────────────────────────────────────────
    Kp0, Kp1, Kp2, Kp3, Kp4, Kp5, Kp6, Kp7, Kp8, Kp9,
    KpDivide,
    KpMultiply,
    KpMinus,
    KpPlus,
    KpDecimal,
    KpEnter,
}

/// Letter keys in alphabetical order, for building tables from ASCII.
#[rustfmt::skip]
pub const LETTERS: [Key; 26] = [
    Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
    Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
    Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
];

/// Digit-row keys `0`–`9`, for building tables from ASCII.
#[rustfmt::skip]
pub const DIGITS: [Key; 10] = [
    Key::Digit0, Key::Digit1, Key::Digit2, Key::Digit3, Key::Digit4,
    Key::Digit5, Key::Digit6, Key::Digit7, Key::Digit8, Key::Digit9,
];

// ─── Key Maps ───────────────────────────────────────────────────────────────

/// Translation from a backend's native key codes to canonical keys.
pub trait KeyMap {
    /// Map a native key code. `None` means the code has no canonical key.
    fn map_key(&self, native: u32) -> Option<Key>;
}

/// A [`KeyMap`] backed by a compile-time table indexed by native code.
#[derive(Debug, Clone, Copy)]
pub struct StaticKeyMap {
    table: &'static [Option<Key>],
}

impl StaticKeyMap {
    /// Wrap a static table.
    #[must_use]
    pub const fn new(table: &'static [Option<Key>]) -> Self {
        Self { table }
    }

    /// Number of native codes the table covers.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl KeyMap for StaticKeyMap {
    fn map_key(&self, native: u32) -> Option<Key> {
        usize::try_from(native)
            .ok()
            .and_then(|idx| self.table.get(idx).copied().flatten())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    static TABLE: [Option<Key>; 4] = [None, Some(Key::Escape), None, Some(Key::Space)];

    #[test]
    fn maps_present_entries() {
        let map = StaticKeyMap::new(&TABLE);
        assert_eq!(map.map_key(1), Some(Key::Escape));
        assert_eq!(map.map_key(3), Some(Key::Space));
    }

    #[test]
    fn empty_slot_is_unmapped() {
        let map = StaticKeyMap::new(&TABLE);
        assert_eq!(map.map_key(0), None);
        assert_eq!(map.map_key(2), None);
    }

    #[test]
    fn out_of_range_is_unmapped() {
        let map = StaticKeyMap::new(&TABLE);
        assert_eq!(map.map_key(4), None);
        assert_eq!(map.map_key(u32::MAX), None);
    }

    #[test]
    fn letter_and_digit_tables_are_ordered() {
        assert_eq!(LETTERS[0], Key::A);
        assert_eq!(LETTERS[25], Key::Z);
        assert_eq!(DIGITS[0], Key::Digit0);
        assert_eq!(DIGITS[9], Key::Digit9);
    }

    #[test]
    fn len_reports_table_size() {
        let map = StaticKeyMap::new(&TABLE);
        assert_eq!(map.len(), 4);
        assert!(!map.is_empty());
    }
}
