// SPDX-License-Identifier: MIT
//
// Toolkit adapter — native messages in, canonical events out.
//
// Runs on the toolkit's thread, called for every message the application
// object or the window receives. It only classifies and enqueues: no
// application code runs here, and nothing blocks beyond the queue's
// one-operation lock.
//
// The toolkit reports mouse buttons as "the set currently held" rather
// than as edges. The adapter keeps the previous set and emits one
// press/release per bit that changed.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use hb_core::event::{Event, MouseButton};
use hb_core::queue::EventQueue;

use crate::message::{Buttons, MessageKind, NativeMessage, Point, field};

/// What the toolkit should do with a message after the adapter saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Disposition {
    /// Continue with the toolkit's own default handling.
    Default,
}

/// Button bits in the order their edges are emitted.
const BUTTON_MAP: [(Buttons, MouseButton); 3] = [
    (Buttons::PRIMARY, MouseButton::Left),
    (Buttons::SECONDARY, MouseButton::Right),
    (Buttons::TERTIARY, MouseButton::Middle),
];

/// Classifies native messages into canonical events on a shared queue.
#[derive(Debug)]
pub struct ToolkitAdapter {
    queue: Arc<EventQueue>,
    /// Button set from the last `MouseDown`/`MouseUp`.
    last_buttons: AtomicU32,
}

impl ToolkitAdapter {
    #[must_use]
    pub const fn new(queue: Arc<EventQueue>) -> Self {
        Self {
            queue,
            last_buttons: AtomicU32::new(0),
        }
    }

    /// The queue events are pushed onto.
    #[must_use]
    pub fn queue(&self) -> &Arc<EventQueue> {
        &self.queue
    }

    /// Handle a message addressed to the application object.
    pub fn dispatch_app(&self, msg: &NativeMessage) -> Disposition {
        match msg.what() {
            MessageKind::QuitRequested => {
                tracing::info!("application quit requested");
                self.queue.push(Event::WindowClosing);
            }
            // Opened files belong to the file dialog, not to the event stream.
            MessageKind::RefsReceived => {}
            what => tracing::trace!(?what, "unhandled application message"),
        }
        Disposition::Default
    }

    /// Handle a message addressed to the window.
    pub fn dispatch_window(&self, msg: &NativeMessage) -> Disposition {
        let event = match msg.what() {
            MessageKind::KeyDown | MessageKind::UnmappedKeyDown => {
                msg.find_i32(field::KEY).map(|k| Event::KeyDown(native_key(k)))
            }
            MessageKind::KeyUp | MessageKind::UnmappedKeyUp => {
                msg.find_i32(field::KEY).map(|k| Event::KeyUp(native_key(k)))
            }
            MessageKind::MouseDown | MessageKind::MouseUp => {
                if let Some(mask) = msg.find_i32(field::BUTTONS) {
                    self.update_buttons(mask);
                }
                None
            }
            MessageKind::MouseMoved => msg.find_point(field::WHERE).map(pointer_moved),
            MessageKind::MouseWheelChanged => msg
                .find_f32(field::WHEEL_DELTA_Y)
                .map(|delta| Event::MouseScroll { delta: -delta }),
            MessageKind::WindowActivated => {
                msg.find_bool(field::ACTIVE).map(Event::WindowFocusChanged)
            }
            MessageKind::WindowMoved => None,
            MessageKind::WindowResized => {
                match (msg.find_i32(field::WIDTH), msg.find_i32(field::HEIGHT)) {
                    (Some(width), Some(height)) => Some(Event::WindowResized {
                        width: width.saturating_add(1),
                        height: height.saturating_add(1),
                    }),
                    _ => None,
                }
            }
            MessageKind::QuitRequested => {
                tracing::info!("window quit requested");
                Some(Event::WindowClosing)
            }
            MessageKind::Update => Some(Event::WindowRedrawNeeded),
            what => {
                tracing::trace!(?what, "unhandled window message");
                None
            }
        };

        if let Some(event) = event {
            self.queue.push(event);
        }
        if msg.what() == MessageKind::KeyDown {
            self.push_text(msg);
        }
        Disposition::Default
    }

    /// Emit one edge per button whose bit differs from the last mask.
    #[allow(clippy::cast_sign_loss)]
    fn update_buttons(&self, mask: i32) {
        let raw = mask as u32;
        let held = Buttons::from_bits_truncate(raw);
        if raw & !Buttons::all().bits() != 0 {
            tracing::warn!("unknown mouse buttons: {raw:#x}");
        }

        let last = self.last_buttons.swap(held.bits(), Ordering::AcqRel);
        let last = Buttons::from_bits_truncate(last);
        let changed = held ^ last;
        for (bit, button) in BUTTON_MAP {
            if changed.contains(bit) {
                self.queue.push(Event::button(button, held.contains(bit)));
            }
        }
    }

    /// Text input carried by a key press: the first code point of `bytes`.
    fn push_text(&self, msg: &NativeMessage) {
        if let Some(ch) = msg.find_str(field::BYTES).and_then(|s| s.chars().next()) {
            self.queue.push(Event::TextInput(ch));
        }
    }
}

/// View coordinates truncate towards zero.
#[allow(clippy::cast_possible_truncation)]
fn pointer_moved(p: Point) -> Event {
    Event::MouseMove {
        x: p.x as i32,
        y: p.y as i32,
    }
}

/// Negative codes cannot index the key table; send them somewhere that
/// maps to nothing so the pump reports them.
fn native_key(code: i32) -> u32 {
    u32::try_from(code).unwrap_or(u32::MAX)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
