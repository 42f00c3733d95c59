// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into canonical events and pushes them onto the
// backend's queue. Two things are recognised:
//
// - SGR mouse reports (`ESC [ < Cb ; Cx ; Cy M|m`): wheel, motion, and
//   button press/release
// - printable ASCII: a key press (letters folded to uppercase) plus the
//   unfolded character as text input
//
// Every other escape sequence (arrows, focus reports, SS3 keys) is
// consumed and dropped, as are control bytes.
//
// # Design
//
// Escape sequences can straddle two `read()` calls, so the parser keeps
// the unparsed tail of each feed and completes it with the next one. The
// parse functions themselves are pure: they look at a slice and say what
// they found and how many bytes it took.

use hb_core::event::{Event, MouseButton};
use hb_core::queue::EventQueue;

/// Escape byte.
const ESC: u8 = 0x1B;

/// An unfinished sequence longer than this is garbage, not a slow write.
const MAX_PENDING: usize = 64;

// ─── InputParser ────────────────────────────────────────────────────────────

/// Incremental parser from terminal bytes to canonical events.
#[derive(Debug, Default)]
pub struct InputParser {
    /// Bytes of an incomplete escape sequence carried to the next feed.
    pending: Vec<u8>,
}

impl InputParser {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Number of bytes held back waiting for the rest of a sequence.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Parse `bytes` (after any carried-over tail) and push the resulting
    /// events onto `queue`, in input order.
    pub fn feed(&mut self, bytes: &[u8], queue: &EventQueue) {
        self.pending.extend_from_slice(bytes);

        let mut pos = 0;
        while pos < self.pending.len() {
            let rest = &self.pending[pos..];
            match try_parse(rest) {
                Parsed::Input(input, len) => {
                    emit(input, queue);
                    pos += len;
                }
                Parsed::Skip(len) => pos += len,
                // Too long to be a real sequence, and no ESC follows it
                // (that would have ended it): drop the whole run.
                Parsed::Incomplete if rest.len() > MAX_PENDING => pos = self.pending.len(),
                Parsed::Incomplete => break,
            }
        }

        self.pending.drain(..pos);
    }

    /// Discard any carried-over bytes.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

// ─── Parse Results ──────────────────────────────────────────────────────────

/// Result of trying to parse one item from the front of a buffer.
#[derive(Debug, PartialEq, Eq)]
enum Parsed {
    /// Recognised input, consuming `usize` bytes.
    Input(Input, usize),
    /// Sequence is incomplete; wait for more bytes.
    Incomplete,
    /// Unrecognised or ignored byte(s), skip `usize` bytes.
    Skip(usize),
}

/// What a complete item decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    /// A printable ASCII byte (0x20..=0x7E).
    Printable(u8),
    /// An SGR mouse report.
    Mouse(MouseReport),
}

/// Raw fields of an SGR mouse report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MouseReport {
    cb: u16,
    x: u16,
    y: u16,
    release: bool,
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────

fn try_parse(buf: &[u8]) -> Parsed {
    match buf[0] {
        ESC => parse_escape(buf),
        b @ 0x20..=0x7E => Parsed::Input(Input::Printable(b), 1),
        _ => Parsed::Skip(1),
    }
}

fn parse_escape(buf: &[u8]) -> Parsed {
    debug_assert_eq!(buf[0], ESC);

    if buf.len() < 2 {
        return Parsed::Incomplete;
    }

    match buf[1] {
        b'[' => parse_csi(buf),
        // SS3: ESC O <final>
        b'O' if buf.len() < 3 => Parsed::Incomplete,
        b'O' => Parsed::Skip(3),
        // Lone ESC (or Alt prefix): drop the ESC, keep what follows.
        _ => Parsed::Skip(1),
    }
}

fn parse_csi(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == ESC && buf[1] == b'[');

    if buf.len() < 3 {
        return Parsed::Incomplete;
    }

    if buf[2] == b'<' {
        return parse_sgr_mouse(buf);
    }

    // Parameter bytes are 0x30..=0x3F, intermediates 0x20..=0x2F. The
    // first byte outside both is the final byte (0x40..=0x7E) or garbage;
    // either way the sequence ends there. An ESC starts the next one.
    match buf[2..].iter().position(|b| !(0x20..=0x3F).contains(b)) {
        Some(offset) if buf[2 + offset] == ESC => Parsed::Skip(2 + offset),
        Some(offset) => Parsed::Skip(2 + offset + 1),
        None => Parsed::Incomplete,
    }
}

fn parse_sgr_mouse(buf: &[u8]) -> Parsed {
    // Format: ESC [ < Cb ; Cx ; Cy M    (press/motion)
    //         ESC [ < Cb ; Cx ; Cy m    (release)
    debug_assert!(buf.len() >= 3 && buf[2] == b'<');

    let start = 3;
    let mut end = start;
    while end < buf.len() {
        if buf[end] == b'M' || buf[end] == b'm' {
            break;
        }
        if buf[end] == ESC {
            return Parsed::Skip(end);
        }
        if !buf[end].is_ascii_digit() && buf[end] != b';' {
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }

    if end >= buf.len() {
        return Parsed::Incomplete;
    }

    let params = &buf[start..end];
    let (cb, rest) = parse_u16_from(params);
    let rest = skip_byte(rest, b';');
    let (x, rest) = parse_u16_from(rest);
    let rest = skip_byte(rest, b';');
    let (y, _) = parse_u16_from(rest);

    Parsed::Input(
        Input::Mouse(MouseReport {
            cb,
            x,
            y,
            release: buf[end] == b'm',
        }),
        end + 1,
    )
}

/// Parse a u16 from the leading digits of `buf`, saturating on overflow.
fn parse_u16_from(buf: &[u8]) -> (u16, &[u8]) {
    let mut val: u16 = 0;
    let mut pos = 0;
    while pos < buf.len() && buf[pos].is_ascii_digit() {
        val = val
            .saturating_mul(10)
            .saturating_add(u16::from(buf[pos] - b'0'));
        pos += 1;
    }
    (val, &buf[pos..])
}

/// Skip a leading byte if it matches `expected`.
fn skip_byte(buf: &[u8], expected: u8) -> &[u8] {
    if buf.first() == Some(&expected) {
        &buf[1..]
    } else {
        buf
    }
}

// ─── Emission ───────────────────────────────────────────────────────────────

/// Wheel bit of the SGR button code.
const MOUSE_WHEEL: u16 = 64;
/// Motion bit of the SGR button code.
const MOUSE_MOTION: u16 = 32;
/// Extra-button bit (buttons 8 and up).
const MOUSE_EXTRA: u16 = 128;

fn emit(input: Input, queue: &EventQueue) {
    match input {
        Input::Printable(b' ') => {
            queue.push(Event::KeyDown(u32::from(b' ')));
            queue.push(Event::KeyUp(u32::from(b' ')));
            queue.push(Event::TextInput(' '));
        }
        Input::Printable(b) => {
            queue.push(Event::KeyDown(u32::from(b.to_ascii_uppercase())));
            queue.push(Event::TextInput(char::from(b)));
        }
        Input::Mouse(report) => emit_mouse(report, queue),
    }
}

fn emit_mouse(report: MouseReport, queue: &EventQueue) {
    let base = report.cb & 3;
    let position = Event::MouseMove {
        x: i32::from(report.x),
        y: i32::from(report.y) * 2,
    };

    if report.cb & MOUSE_WHEEL != 0 {
        match base {
            0 => queue.push(Event::MouseScroll { delta: 1.0 }),
            1 => queue.push(Event::MouseScroll { delta: -1.0 }),
            _ => {}
        }
        return;
    }

    queue.push(position);
    if report.cb & MOUSE_MOTION != 0 {
        return;
    }

    let button = if report.cb & MOUSE_EXTRA != 0 {
        match base {
            0 => Some(MouseButton::X1),
            1 => Some(MouseButton::X2),
            _ => None,
        }
    } else {
        match base {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    };

    match button {
        Some(button) => queue.push(Event::button(button, !report.release)),
        None => tracing::warn!(cb = report.cb, "unknown mouse button"),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(bytes: &[u8]) -> Vec<Event> {
        let queue = EventQueue::new();
        let mut parser = InputParser::new();
        parser.feed(bytes, &queue);
        drain(&queue)
    }

    fn drain(queue: &EventQueue) -> Vec<Event> {
        std::iter::from_fn(|| queue.pull()).collect()
    }

    // ── Mouse ───────────────────────────────────────────────────────────

    #[test]
    fn left_press_moves_then_presses() {
        assert_eq!(
            parse(b"\x1b[<0;10;5M"),
            vec![
                Event::MouseMove { x: 10, y: 10 },
                Event::MouseButtonDown(MouseButton::Left),
            ]
        );
    }

    #[test]
    fn left_release_moves_then_releases() {
        assert_eq!(
            parse(b"\x1b[<0;10;5m"),
            vec![
                Event::MouseMove { x: 10, y: 10 },
                Event::MouseButtonUp(MouseButton::Left),
            ]
        );
    }

    #[test]
    fn middle_and_right_buttons() {
        assert_eq!(
            parse(b"\x1b[<1;1;1M\x1b[<2;1;1m"),
            vec![
                Event::MouseMove { x: 1, y: 2 },
                Event::MouseButtonDown(MouseButton::Middle),
                Event::MouseMove { x: 1, y: 2 },
                Event::MouseButtonUp(MouseButton::Right),
            ]
        );
    }

    #[test]
    fn extra_buttons() {
        assert_eq!(
            parse(b"\x1b[<128;3;3M\x1b[<129;3;3M"),
            vec![
                Event::MouseMove { x: 3, y: 6 },
                Event::MouseButtonDown(MouseButton::X1),
                Event::MouseMove { x: 3, y: 6 },
                Event::MouseButtonDown(MouseButton::X2),
            ]
        );
    }

    #[test]
    fn modifier_bits_do_not_change_button() {
        // 16 = ctrl held
        assert_eq!(
            parse(b"\x1b[<16;2;2M"),
            vec![
                Event::MouseMove { x: 2, y: 4 },
                Event::MouseButtonDown(MouseButton::Left),
            ]
        );
    }

    #[test]
    fn motion_only_moves() {
        assert_eq!(parse(b"\x1b[<35;7;3M"), vec![Event::MouseMove { x: 7, y: 6 }]);
        assert_eq!(parse(b"\x1b[<32;7;3M"), vec![Event::MouseMove { x: 7, y: 6 }]);
    }

    #[test]
    fn wheel_up_and_down() {
        assert_eq!(
            parse(b"\x1b[<64;1;1M\x1b[<65;1;1M"),
            vec![
                Event::MouseScroll { delta: 1.0 },
                Event::MouseScroll { delta: -1.0 },
            ]
        );
    }

    #[test]
    fn horizontal_wheel_is_ignored() {
        assert!(parse(b"\x1b[<66;1;1M\x1b[<67;1;1M").is_empty());
    }

    #[test]
    fn legacy_release_code_only_moves() {
        assert_eq!(parse(b"\x1b[<3;4;4M"), vec![Event::MouseMove { x: 4, y: 8 }]);
    }

    #[test]
    fn malformed_mouse_report_is_skipped() {
        // The report is dropped at the bad byte; the rest reads as text.
        assert_eq!(
            parse(b"\x1b[<0;x;1Ma"),
            vec![
                Event::KeyDown(u32::from(b';')),
                Event::TextInput(';'),
                Event::KeyDown(u32::from(b'1')),
                Event::TextInput('1'),
                Event::KeyDown(u32::from(b'M')),
                Event::TextInput('M'),
                Event::KeyDown(u32::from(b'A')),
                Event::TextInput('a'),
            ]
        );
    }

    // ── Keys ────────────────────────────────────────────────────────────

    #[test]
    fn lowercase_letter_is_folded_for_key_but_not_text() {
        assert_eq!(
            parse(b"q"),
            vec![Event::KeyDown(u32::from(b'Q')), Event::TextInput('q')]
        );
    }

    #[test]
    fn uppercase_letter_is_press_only() {
        assert_eq!(
            parse(b"W"),
            vec![Event::KeyDown(u32::from(b'W')), Event::TextInput('W')]
        );
    }

    #[test]
    fn space_is_press_and_release() {
        assert_eq!(
            parse(b" "),
            vec![
                Event::KeyDown(32),
                Event::KeyUp(32),
                Event::TextInput(' '),
            ]
        );
    }

    #[test]
    fn control_bytes_are_skipped() {
        assert!(parse(b"\r\n\t\x7f\x01\x80\xff").is_empty());
    }

    #[test]
    fn other_csi_sequences_are_skipped() {
        assert_eq!(
            parse(b"\x1b[A\x1b[1;5C\x1b[Iz\x1b[200~"),
            vec![Event::KeyDown(u32::from(b'Z')), Event::TextInput('z')]
        );
    }

    #[test]
    fn ss3_sequence_is_skipped() {
        assert!(parse(b"\x1bOP").is_empty());
    }

    #[test]
    fn alt_prefix_drops_escape() {
        assert_eq!(
            parse(b"\x1bx"),
            vec![Event::KeyDown(u32::from(b'X')), Event::TextInput('x')]
        );
    }

    // ── Buffering ───────────────────────────────────────────────────────

    #[test]
    fn sequence_split_across_feeds_is_completed() {
        let queue = EventQueue::new();
        let mut parser = InputParser::new();

        parser.feed(b"a\x1b[<0;1", &queue);
        assert_eq!(parser.pending_len(), 6);
        assert_eq!(
            drain(&queue),
            vec![Event::KeyDown(u32::from(b'A')), Event::TextInput('a')]
        );

        parser.feed(b"0;5M", &queue);
        assert_eq!(parser.pending_len(), 0);
        assert_eq!(
            drain(&queue),
            vec![
                Event::MouseMove { x: 10, y: 10 },
                Event::MouseButtonDown(MouseButton::Left),
            ]
        );
    }

    #[test]
    fn lone_escape_waits_for_next_byte() {
        let queue = EventQueue::new();
        let mut parser = InputParser::new();

        parser.feed(b"\x1b", &queue);
        assert_eq!(parser.pending_len(), 1);
        assert!(queue.is_empty());

        parser.feed(b"[B", &queue);
        assert_eq!(parser.pending_len(), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn oversized_incomplete_sequence_is_dropped() {
        let queue = EventQueue::new();
        let mut parser = InputParser::new();
        let mut junk = b"\x1b[".to_vec();
        junk.extend(std::iter::repeat_n(b'1', MAX_PENDING + 8));

        parser.feed(&junk, &queue);
        assert!(queue.is_empty());
        assert_eq!(parser.pending_len(), 0);

        parser.feed(b"a", &queue);
        assert_eq!(
            std::iter::from_fn(|| queue.pull()).collect::<Vec<_>>(),
            vec![Event::KeyDown(u32::from(b'A')), Event::TextInput('a')]
        );
    }

    #[test]
    fn interrupted_sequence_keeps_the_next_one() {
        let queue = EventQueue::new();
        let mut parser = InputParser::new();
        let mut junk = b"\x1b[".to_vec();
        junk.extend(std::iter::repeat_n(b'1', MAX_PENDING + 8));
        junk.extend_from_slice(b"\x1b[<0;3;4M");

        parser.feed(&junk, &queue);
        assert_eq!(
            std::iter::from_fn(|| queue.pull()).collect::<Vec<_>>(),
            vec![
                Event::MouseMove { x: 3, y: 8 },
                Event::MouseButtonDown(MouseButton::Left),
            ]
        );
        assert_eq!(parser.pending_len(), 0);
    }

    #[test]
    fn clear_discards_pending_bytes() {
        let queue = EventQueue::new();
        let mut parser = InputParser::new();
        parser.feed(b"\x1b[<0;1", &queue);
        assert!(parser.pending_len() > 0);

        parser.clear();
        assert_eq!(parser.pending_len(), 0);
    }

    #[test]
    fn number_parsing_saturates() {
        assert_eq!(parse_u16_from(b"99999;"), (u16::MAX, &b";"[..]));
        assert_eq!(parse_u16_from(b""), (0, &b""[..]));
    }
}
