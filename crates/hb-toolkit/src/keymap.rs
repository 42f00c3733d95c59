// SPDX-License-Identifier: MIT
//
// Toolkit key table.
//
// Native key codes are physical positions on the keyboard, numbered row by
// row from the top-left: the function row starts at 0x01, the digit row at
// 0x11, and so on down to the space bar row. Codes 0x67 and 0x69.. are
// unassigned.

use hb_core::keys::{Key, StaticKeyMap};

/// Key map for the toolkit backend's native codes.
pub const KEYMAP: StaticKeyMap = StaticKeyMap::new(&TABLE);

const fn k(key: Key) -> Option<Key> {
    Some(key)
}

const NO: Option<Key> = None;

#[rustfmt::skip]
static TABLE: [Option<Key>; 0x70] = [
    /* 0x00 */ NO, k(Key::Escape), k(Key::F1), k(Key::F2),
    /* 0x04 */ k(Key::F3), k(Key::F4), k(Key::F5), k(Key::F6),
    /* 0x08 */ k(Key::F7), k(Key::F8), k(Key::F9), k(Key::F10),
    /* 0x0C */ k(Key::F11), k(Key::F12), k(Key::PrintScreen), k(Key::ScrollLock),
    /* 0x10 */ k(Key::Pause), k(Key::Tilde), k(Key::Digit1), k(Key::Digit2),
    /* 0x14 */ k(Key::Digit3), k(Key::Digit4), k(Key::Digit5), k(Key::Digit6),
    /* 0x18 */ k(Key::Digit7), k(Key::Digit8), k(Key::Digit9), k(Key::Digit0),
    /* 0x1C */ k(Key::Minus), k(Key::Equals), k(Key::Backspace), k(Key::Insert),
    /* 0x20 */ k(Key::Home), k(Key::PageUp), k(Key::NumLock), k(Key::KpDivide),
    /* 0x24 */ k(Key::KpMultiply), k(Key::KpMinus), k(Key::Tab), k(Key::Q),
    /* 0x28 */ k(Key::W), k(Key::E), k(Key::R), k(Key::T),
    /* 0x2C */ k(Key::Y), k(Key::U), k(Key::I), k(Key::O),
    /* 0x30 */ k(Key::P), k(Key::LBracket), k(Key::RBracket), k(Key::Backslash),
    /* 0x34 */ k(Key::Delete), k(Key::End), k(Key::PageDown), k(Key::Kp7),
    /* 0x38 */ k(Key::Kp8), k(Key::Kp9), k(Key::KpPlus), k(Key::CapsLock),
    /* 0x3C */ k(Key::A), k(Key::S), k(Key::D), k(Key::F),
    /* 0x40 */ k(Key::G), k(Key::H), k(Key::J), k(Key::K),
    /* 0x44 */ k(Key::L), k(Key::Semicolon), k(Key::Quote), k(Key::Enter),
    /* 0x48 */ k(Key::Kp4), k(Key::Kp5), k(Key::Kp6), k(Key::LShift),
    /* 0x4C */ k(Key::Z), k(Key::X), k(Key::C), k(Key::V),
    /* 0x50 */ k(Key::B), k(Key::N), k(Key::M), k(Key::Comma),
    /* 0x54 */ k(Key::Period), k(Key::Slash), k(Key::RShift), k(Key::Up),
    /* 0x58 */ k(Key::Kp1), k(Key::Kp2), k(Key::Kp3), k(Key::KpEnter),
    /* 0x5C */ k(Key::LCtrl), k(Key::LAlt), k(Key::Space), k(Key::RAlt),
    /* 0x60 */ k(Key::RCtrl), k(Key::Left), k(Key::Down), k(Key::Right),
    /* 0x64 */ k(Key::Kp0), k(Key::KpDecimal), k(Key::LWin), NO,
    /* 0x68 */ k(Key::RWin), NO, NO, NO,
    /* 0x6C */ NO, NO, NO, NO,
];

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use hb_core::keys::KeyMap;

    #[test]
    fn row_starts() {
        assert_eq!(KEYMAP.map_key(0x01), Some(Key::Escape));
        assert_eq!(KEYMAP.map_key(0x12), Some(Key::Digit1));
        assert_eq!(KEYMAP.map_key(0x27), Some(Key::Q));
        assert_eq!(KEYMAP.map_key(0x3C), Some(Key::A));
        assert_eq!(KEYMAP.map_key(0x4C), Some(Key::Z));
        assert_eq!(KEYMAP.map_key(0x5E), Some(Key::Space));
    }

    #[test]
    fn arrows_and_keypad() {
        assert_eq!(KEYMAP.map_key(0x57), Some(Key::Up));
        assert_eq!(KEYMAP.map_key(0x61), Some(Key::Left));
        assert_eq!(KEYMAP.map_key(0x62), Some(Key::Down));
        assert_eq!(KEYMAP.map_key(0x63), Some(Key::Right));
        assert_eq!(KEYMAP.map_key(0x5B), Some(Key::KpEnter));
        assert_eq!(KEYMAP.map_key(0x64), Some(Key::Kp0));
    }

    #[test]
    fn gaps_and_out_of_range_map_to_nothing() {
        assert_eq!(KEYMAP.map_key(0x00), None);
        assert_eq!(KEYMAP.map_key(0x67), None);
        assert_eq!(KEYMAP.map_key(0x69), None);
        assert_eq!(KEYMAP.map_key(0x6F), None);
        assert_eq!(KEYMAP.map_key(0x70), None);
        assert_eq!(KEYMAP.map_key(u32::MAX), None);
    }

    #[test]
    fn every_letter_has_exactly_one_code() {
        for letter in hb_core::keys::LETTERS {
            let hits = (0..0x70u32)
                .filter(|&code| KEYMAP.map_key(code) == Some(letter))
                .count();
            assert_eq!(hits, 1, "{letter:?}");
        }
    }
}
