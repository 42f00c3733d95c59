// SPDX-License-Identifier: MIT
//
// Terminal key table.
//
// The parser reports printable ASCII bytes as native key codes, with
// letters already folded to uppercase. This table maps those bytes to
// canonical keys. Shifted symbols resolve to the key that produces them
// on a US layout, so `!` reads as `Digit1` and `?` as `Slash`.

use hb_core::keys::{DIGITS, Key, LETTERS, StaticKeyMap};

/// Key map for the terminal backend's native codes (ASCII bytes).
pub const KEYMAP: StaticKeyMap = StaticKeyMap::new(&TABLE);

static TABLE: [Option<Key>; 128] = build();

/// US-layout punctuation: unshifted byte, shifted byte, key.
#[rustfmt::skip]
const PUNCTUATION: [(u8, u8, Key); 11] = [
    (b'`',  b'~', Key::Tilde),
    (b'-',  b'_', Key::Minus),
    (b'=',  b'+', Key::Equals),
    (b'[',  b'{', Key::LBracket),
    (b']',  b'}', Key::RBracket),
    (b'\\', b'|', Key::Backslash),
    (b';',  b':', Key::Semicolon),
    (b'\'', b'"', Key::Quote),
    (b',',  b'<', Key::Comma),
    (b'.',  b'>', Key::Period),
    (b'/',  b'?', Key::Slash),
];

/// Shifted digit row, `)` through `(` in digit order.
const SHIFTED_DIGITS: &[u8; 10] = b")!@#$%^&*(";

const fn build() -> [Option<Key>; 128] {
    let mut t = [None; 128];

    t[b' ' as usize] = Some(Key::Space);

    let mut i = 0;
    while i < LETTERS.len() {
        t[b'A' as usize + i] = Some(LETTERS[i]);
        i += 1;
    }

    let mut i = 0;
    while i < DIGITS.len() {
        t[b'0' as usize + i] = Some(DIGITS[i]);
        t[SHIFTED_DIGITS[i] as usize] = Some(DIGITS[i]);
        i += 1;
    }

    let mut i = 0;
    while i < PUNCTUATION.len() {
        let (plain, shifted, key) = PUNCTUATION[i];
        t[plain as usize] = Some(key);
        t[shifted as usize] = Some(key);
        i += 1;
    }

    t
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use hb_core::keys::KeyMap;

    #[test]
    fn every_printable_byte_is_mapped_except_lowercase() {
        for b in 0x20u8..=0x7E {
            let mapped = KEYMAP.map_key(u32::from(b));
            if b.is_ascii_lowercase() {
                assert_eq!(mapped, None, "byte {b:#x}");
            } else {
                assert!(mapped.is_some(), "byte {b:#x} ({})", b as char);
            }
        }
    }

    #[test]
    fn letters_digits_and_space() {
        assert_eq!(KEYMAP.map_key(u32::from(b'Q')), Some(Key::Q));
        assert_eq!(KEYMAP.map_key(u32::from(b'Z')), Some(Key::Z));
        assert_eq!(KEYMAP.map_key(u32::from(b'7')), Some(Key::Digit7));
        assert_eq!(KEYMAP.map_key(32), Some(Key::Space));
    }

    #[test]
    fn shifted_symbols_share_a_key() {
        assert_eq!(KEYMAP.map_key(u32::from(b'!')), Some(Key::Digit1));
        assert_eq!(KEYMAP.map_key(u32::from(b')')), Some(Key::Digit0));
        assert_eq!(KEYMAP.map_key(u32::from(b'?')), Some(Key::Slash));
        assert_eq!(KEYMAP.map_key(u32::from(b'~')), Some(Key::Tilde));
    }

    #[test]
    fn control_bytes_and_out_of_range_are_unmapped() {
        assert_eq!(KEYMAP.map_key(0x1B), None);
        assert_eq!(KEYMAP.map_key(0x7F), None);
        assert_eq!(KEYMAP.map_key(0x80), None);
        assert_eq!(KEYMAP.len(), 128);
    }
}
