// SPDX-License-Identifier: MIT
//
// Event pump — drains the queue once per frame.
//
// Every backend's `process_events` ends here. The pump pulls events in
// arrival order until the queue is empty, folds each one into display and
// input state, and raises the matching notification on the application's
// `EventSink`.
//
// Key events arrive with native codes. The backend's key map turns them
// into canonical keys; a code with no canonical key is logged and dropped,
// so the application never sees an invalid key.

use crate::display::DisplayState;
use crate::event::{Event, MouseButton};
use crate::input::InputState;
use crate::keys::{Key, KeyMap};
use crate::queue::EventQueue;

// ─── EventSink ──────────────────────────────────────────────────────────────

/// Application-side notifications raised by the pump.
///
/// Every method has a no-op default, so an application only implements
/// what it cares about. State has already been updated when a method is
/// called: `on_resized` can read the new size from the `DisplayState`.
pub trait EventSink {
    /// Wheel moved by `delta` notches.
    fn on_scroll(&mut self, _delta: f32) {}

    /// A mouse button changed state.
    fn on_button(&mut self, _button: MouseButton, _pressed: bool) {}

    /// The pointer moved.
    fn on_pointer_move(&mut self, _x: i32, _y: i32) {}

    /// A mapped key changed state. `repeat` is set for a press of a key
    /// that was already held.
    fn on_key(&mut self, _key: Key, _pressed: bool, _repeat: bool) {}

    /// One code point of text input.
    fn on_text_input(&mut self, _ch: char) {}

    /// The window surface was resized.
    fn on_resized(&mut self, _width: i32, _height: i32) {}

    /// The window gained or lost focus.
    fn on_focus_changed(&mut self, _focused: bool) {}

    /// The window contents must be repainted.
    fn on_redraw_needed(&mut self) {}

    /// The window is closing.
    fn on_closing(&mut self) {}
}

/// Discards every notification. State is still updated.
impl EventSink for () {}

// ─── Pump ───────────────────────────────────────────────────────────────────

/// Drain `queue` completely, applying every event in order.
///
/// Returns the number of events pulled, including dropped unmapped keys.
/// An empty queue is a no-op: no state changes, no notifications.
pub fn pump(
    queue: &EventQueue,
    keymap: &impl KeyMap,
    display: &mut DisplayState,
    input: &mut InputState,
    sink: &mut impl EventSink,
) -> usize {
    let mut count = 0;
    while let Some(event) = queue.pull() {
        count += 1;
        apply(event, keymap, display, input, sink);
    }
    count
}

/// Apply a single event.
fn apply(
    event: Event,
    keymap: &impl KeyMap,
    display: &mut DisplayState,
    input: &mut InputState,
    sink: &mut impl EventSink,
) {
    match event {
        Event::MouseScroll { delta } => sink.on_scroll(delta),
        Event::MouseButtonDown(button) => {
            input.set_button(button, true);
            sink.on_button(button, true);
        }
        Event::MouseButtonUp(button) => {
            input.set_button(button, false);
            sink.on_button(button, false);
        }
        Event::MouseMove { x, y } => {
            input.set_pointer(x, y);
            sink.on_pointer_move(x, y);
        }
        Event::KeyDown(code) => apply_key(code, true, keymap, input, sink),
        Event::KeyUp(code) => apply_key(code, false, keymap, input, sink),
        Event::TextInput(ch) => sink.on_text_input(ch),
        Event::WindowResized { width, height } => {
            display.window.width = width;
            display.window.height = height;
            sink.on_resized(width, height);
        }
        Event::WindowFocusChanged(focused) => {
            display.window.focused = focused;
            // Releases that happen while unfocused never reach us.
            if !focused {
                input.release_all();
            }
            sink.on_focus_changed(focused);
        }
        Event::WindowRedrawNeeded => sink.on_redraw_needed(),
        Event::WindowClosing => {
            display.window.exists = false;
            sink.on_closing();
        }
    }
}

fn apply_key(
    code: u32,
    pressed: bool,
    keymap: &impl KeyMap,
    input: &mut InputState,
    sink: &mut impl EventSink,
) {
    let Some(key) = keymap.map_key(code) else {
        tracing::warn!("unknown key: {code} ({code:#x})");
        return;
    };
    let repeat = input.set_key(key, pressed);
    sink.on_key(key, pressed, repeat);
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::StaticKeyMap;
    use pretty_assertions::assert_eq;

    static TABLE: [Option<Key>; 3] = [None, Some(Key::A), Some(Key::Space)];
    const KEYMAP: StaticKeyMap = StaticKeyMap::new(&TABLE);

    /// Records every notification as a readable line.
    #[derive(Default)]
    struct Recorder {
        log: Vec<String>,
    }

    impl EventSink for Recorder {
        fn on_scroll(&mut self, delta: f32) {
            self.log.push(format!("scroll {delta}"));
        }
        fn on_button(&mut self, button: MouseButton, pressed: bool) {
            self.log.push(format!("button {button:?} {pressed}"));
        }
        fn on_pointer_move(&mut self, x: i32, y: i32) {
            self.log.push(format!("move {x},{y}"));
        }
        fn on_key(&mut self, key: Key, pressed: bool, repeat: bool) {
            self.log.push(format!("key {key:?} {pressed} {repeat}"));
        }
        fn on_text_input(&mut self, ch: char) {
            self.log.push(format!("text {ch}"));
        }
        fn on_resized(&mut self, width: i32, height: i32) {
            self.log.push(format!("resized {width}x{height}"));
        }
        fn on_focus_changed(&mut self, focused: bool) {
            self.log.push(format!("focus {focused}"));
        }
        fn on_redraw_needed(&mut self) {
            self.log.push("redraw".into());
        }
        fn on_closing(&mut self) {
            self.log.push("closing".into());
        }
    }

    fn run(events: &[Event]) -> (DisplayState, InputState, Vec<String>, usize) {
        let queue = EventQueue::new();
        for &event in events {
            queue.push(event);
        }
        let mut display = DisplayState::default();
        display.window.exists = true;
        let mut input = InputState::new();
        let mut sink = Recorder::default();
        let count = pump(&queue, &KEYMAP, &mut display, &mut input, &mut sink);
        assert!(queue.is_empty());
        (display, input, sink.log, count)
    }

    #[test]
    fn empty_queue_is_noop() {
        let queue = EventQueue::new();
        let mut display = DisplayState::default();
        let before = display;
        let mut input = InputState::new();
        let mut sink = Recorder::default();

        let count = pump(&queue, &KEYMAP, &mut display, &mut input, &mut sink);

        assert_eq!(count, 0);
        assert_eq!(display, before);
        assert_eq!(input, InputState::new());
        assert!(sink.log.is_empty());
    }

    #[test]
    fn notifications_follow_arrival_order() {
        let (_, _, log, count) = run(&[
            Event::MouseMove { x: 4, y: 8 },
            Event::MouseButtonDown(MouseButton::Left),
            Event::KeyDown(1),
            Event::TextInput('a'),
            Event::KeyUp(1),
            Event::MouseButtonUp(MouseButton::Left),
            Event::MouseScroll { delta: -1.0 },
            Event::WindowRedrawNeeded,
        ]);

        assert_eq!(count, 8);
        assert_eq!(
            log,
            vec![
                "move 4,8",
                "button Left true",
                "key A true false",
                "text a",
                "key A false false",
                "button Left false",
                "scroll -1",
                "redraw",
            ]
        );
    }

    #[test]
    fn resize_updates_window_size() {
        let (display, _, log, _) = run(&[Event::WindowResized { width: 800, height: 600 }]);
        assert_eq!(display.window.width, 800);
        assert_eq!(display.window.height, 600);
        assert_eq!(log, vec!["resized 800x600"]);
    }

    #[test]
    fn focus_updates_window_state() {
        let (display, _, _, _) = run(&[
            Event::WindowFocusChanged(true),
            Event::WindowFocusChanged(false),
            Event::WindowFocusChanged(true),
        ]);
        assert!(display.window.focused);
    }

    #[test]
    fn focus_loss_releases_held_input() {
        let (_, input, log, _) = run(&[
            Event::KeyDown(1),
            Event::MouseButtonDown(MouseButton::Left),
            Event::WindowFocusChanged(false),
        ]);
        assert!(!input.is_key_down(Key::A));
        assert!(!input.is_button_down(MouseButton::Left));
        assert_eq!(log.last().map(String::as_str), Some("focus false"));
    }

    #[test]
    fn key_held_across_focus_loss_is_not_a_repeat() {
        let (_, input, log, _) = run(&[
            Event::KeyDown(1),
            Event::WindowFocusChanged(false),
            Event::WindowFocusChanged(true),
            Event::KeyDown(1),
        ]);
        assert_eq!(log.last().map(String::as_str), Some("key A true false"));
        assert!(input.is_key_down(Key::A));
    }

    #[test]
    fn closing_clears_exists() {
        let (display, _, log, _) = run(&[Event::WindowClosing]);
        assert!(!display.window.exists);
        assert_eq!(log, vec!["closing"]);
    }

    #[test]
    fn unmapped_key_is_dropped() {
        let (_, input, log, count) = run(&[Event::KeyDown(0), Event::KeyDown(99), Event::KeyUp(0)]);
        assert_eq!(count, 3);
        assert!(log.is_empty());
        assert_eq!(input, InputState::new());
    }

    #[test]
    fn held_key_press_is_repeat() {
        let (_, input, log, _) = run(&[Event::KeyDown(2), Event::KeyDown(2)]);
        assert_eq!(log, vec!["key Space true false", "key Space true true"]);
        assert!(input.is_key_down(Key::Space));
    }

    #[test]
    fn input_state_tracks_pointer_and_buttons() {
        let (_, input, _, _) = run(&[
            Event::MouseMove { x: 10, y: 20 },
            Event::MouseButtonDown(MouseButton::Right),
        ]);
        assert_eq!(input.pointer(), (10, 20));
        assert!(input.is_button_down(MouseButton::Right));
    }

    #[test]
    fn unit_sink_still_updates_state() {
        let queue = EventQueue::new();
        queue.push(Event::WindowResized { width: 3, height: 4 });
        let mut display = DisplayState::default();
        let mut input = InputState::new();
        pump(&queue, &KEYMAP, &mut display, &mut input, &mut ());
        assert_eq!((display.window.width, display.window.height), (3, 4));
    }
}
