// SPDX-License-Identifier: MIT
//
// Headless toolkit.
//
// An in-process stand-in for a native GUI toolkit: an application loop on
// its own thread, fed through a channel, and windows that keep their
// title, frame and every blitted rectangle in memory instead of on
// screen. Behaviourally it follows the real thing where the backend can
// tell the difference:
//
//   - window messages are dispatched with the window locked, so the
//     frame loop's locked operations and the adapter never overlap;
//   - resize notifications carry the inclusive frame size, one less than
//     the drawable size;
//   - an application quit request, once handled, ends the loop, after
//     which the windows can no longer be locked.
//
// Tests drive it by posting messages into windows (`inject`) and reading
// back what the backend did to them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use hb_core::framebuffer::{Framebuffer, Rect, Rgba};

use crate::adapter::{Disposition, ToolkitAdapter};
use crate::message::{MessageKind, NativeMessage, Point, field};
use crate::native::{NativeRect, NativeWindow, Toolkit, WindowGuard};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A message on its way into the application loop.
enum Envelope {
    App(NativeMessage),
    Window(HeadlessWindow, NativeMessage),
}

// ─── HeadlessToolkit ────────────────────────────────────────────────────────

/// A [`Toolkit`] with no display.
pub struct HeadlessToolkit {
    tx: Sender<Envelope>,
    rx: Mutex<Option<Receiver<Envelope>>>,
    launching: AtomicBool,
    quit: AtomicBool,
    cursor_visible: AtomicBool,
    screen: NativeRect,
    windows: Mutex<Vec<HeadlessWindow>>,
}

impl HeadlessToolkit {
    /// A toolkit whose main screen is `width`×`height` pixels.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx: Mutex::new(Some(rx)),
            launching: AtomicBool::new(true),
            quit: AtomicBool::new(false),
            cursor_visible: AtomicBool::new(true),
            screen: NativeRect::from_size(0, 0, width, height),
            windows: Mutex::new(Vec::new()),
        }
    }

    /// Every window created so far, oldest first.
    #[must_use]
    pub fn windows(&self) -> Vec<HeadlessWindow> {
        lock(&self.windows).clone()
    }

    /// Whether the application loop has ended.
    #[must_use]
    pub fn has_quit(&self) -> bool {
        self.quit.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible.load(Ordering::Relaxed)
    }
}

impl Default for HeadlessToolkit {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

impl Toolkit for HeadlessToolkit {
    type Window = HeadlessWindow;

    fn run(&self, adapter: Arc<ToolkitAdapter>) {
        let Some(rx) = lock(&self.rx).take() else {
            tracing::warn!("headless toolkit is already running");
            return;
        };
        self.launching.store(false, Ordering::Release);

        while let Ok(envelope) = rx.recv() {
            match envelope {
                Envelope::App(msg) => {
                    let quit = msg.what() == MessageKind::QuitRequested;
                    match adapter.dispatch_app(&msg) {
                        Disposition::Default if quit => break,
                        Disposition::Default => {}
                    }
                }
                Envelope::Window(window, msg) => {
                    if let Some(_guard) = WindowGuard::lock(&window) {
                        adapter.dispatch_window(&msg);
                    }
                }
            }
        }

        for window in lock(&self.windows).iter() {
            window.close();
        }
        self.quit.store(true, Ordering::Release);
        tracing::debug!("headless application loop ended");
    }

    fn is_launching(&self) -> bool {
        self.launching.load(Ordering::Acquire)
    }

    fn screen_frame(&self) -> NativeRect {
        self.screen
    }

    fn create_window(&self, frame: NativeRect, title: &str) -> HeadlessWindow {
        let window = HeadlessWindow::new(frame, title, self.tx.clone());
        lock(&self.windows).push(window.clone());
        window
    }

    fn post_app_message(&self, msg: NativeMessage) {
        // Nobody is listening once the loop is over; the message is dropped.
        let _ = self.tx.send(Envelope::App(msg));
    }

    fn set_mouse_position(&self, x: f32, y: f32) {
        for window in lock(&self.windows).iter() {
            window.warp_pointer(x, y);
        }
    }

    fn set_cursor_visible(&self, visible: bool) {
        self.cursor_visible.store(visible, Ordering::Relaxed);
    }
}

// ─── HeadlessWindow ─────────────────────────────────────────────────────────

/// One rectangle copied out of a framebuffer by `draw_bitmap`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blit {
    /// Where in the view, clipped to the framebuffer.
    pub rect: Rect,
    /// The copied pixels, row-major, `rect.width * rect.height` long.
    pub pixels: Vec<Rgba>,
}

#[derive(Debug)]
struct WindowData {
    title: String,
    frame: NativeRect,
    visible: bool,
    pointer: Point,
    blits: Vec<Blit>,
}

#[derive(Debug)]
struct Shared {
    locked: Mutex<bool>,
    unlocked: Condvar,
    closed: AtomicBool,
    data: Mutex<WindowData>,
}

/// A window of the [`HeadlessToolkit`]. Cloning gives another handle to
/// the same window.
///
/// The window lock is not recursive: a thread that already holds it must
/// not lock it again.
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    shared: Arc<Shared>,
    tx: Sender<Envelope>,
}

impl HeadlessWindow {
    fn new(frame: NativeRect, title: &str, tx: Sender<Envelope>) -> Self {
        Self {
            shared: Arc::new(Shared {
                locked: Mutex::new(false),
                unlocked: Condvar::new(),
                closed: AtomicBool::new(false),
                data: Mutex::new(WindowData {
                    title: title.to_owned(),
                    frame,
                    visible: false,
                    pointer: Point::default(),
                    blits: Vec::new(),
                }),
            }),
            tx,
        }
    }

    /// Deliver `msg` to this window through the application loop, as if
    /// the user had done something to it.
    pub fn inject(&self, msg: NativeMessage) {
        let _ = self.tx.send(Envelope::Window(self.clone(), msg));
    }

    /// Move the pointer without generating a message.
    pub fn set_pointer(&self, at: Point) {
        lock(&self.shared.data).pointer = at;
    }

    #[must_use]
    pub fn title(&self) -> String {
        lock(&self.shared.data).title.clone()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        lock(&self.shared.data).visible
    }

    /// Every blit so far, oldest first.
    #[must_use]
    pub fn blits(&self) -> Vec<Blit> {
        lock(&self.shared.data).blits.clone()
    }

    /// Whether some thread holds the window lock right now.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        *lock(&self.shared.locked)
    }

    /// Whether the window is gone for good.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    /// The pointer moved to screen position `(x, y)`. Only the window under
    /// it hears about the move.
    fn warp_pointer(&self, x: f32, y: f32) {
        let mut data = lock(&self.shared.data);
        let f = data.frame;
        let at = Point::new(x - f.left, y - f.top);
        data.pointer = at;
        drop(data);

        let inside = (f.left..=f.right).contains(&x) && (f.top..=f.bottom).contains(&y);
        if inside {
            self.inject(NativeMessage::new(MessageKind::MouseMoved).with_point(field::WHERE, at));
        }
    }

    fn close(&self) {
        let _locked = lock(&self.shared.locked);
        self.shared.closed.store(true, Ordering::Release);
        self.shared.unlocked.notify_all();
    }
}

impl NativeWindow for HeadlessWindow {
    fn lock(&self) -> bool {
        let mut locked = lock(&self.shared.locked);
        while *locked && !self.is_closed() {
            locked = self
                .shared
                .unlocked
                .wait(locked)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if self.is_closed() {
            return false;
        }
        *locked = true;
        true
    }

    fn unlock(&self) {
        *lock(&self.shared.locked) = false;
        self.shared.unlocked.notify_one();
    }

    fn bounds(&self) -> NativeRect {
        let frame = lock(&self.shared.data).frame;
        NativeRect::new(0.0, 0.0, frame.width(), frame.height())
    }

    fn frame(&self) -> NativeRect {
        lock(&self.shared.data).frame
    }

    fn set_title(&self, title: &str) {
        title.clone_into(&mut lock(&self.shared.data).title);
    }

    fn show(&self) {
        let was_visible = std::mem::replace(&mut lock(&self.shared.data).visible, true);
        if !was_visible {
            self.inject(NativeMessage::new(MessageKind::WindowActivated).with_bool(field::ACTIVE, true));
            self.inject(NativeMessage::new(MessageKind::Update));
        }
    }

    fn move_to(&self, x: f32, y: f32) {
        let mut data = lock(&self.shared.data);
        let f = data.frame;
        data.frame = NativeRect::new(x, y, x + f.width(), y + f.height());
        drop(data);
        self.inject(NativeMessage::new(MessageKind::WindowMoved).with_point(field::WHERE, Point::new(x, y)));
    }

    #[allow(clippy::cast_possible_truncation)]
    fn resize_to(&self, width: f32, height: f32) {
        let mut data = lock(&self.shared.data);
        let f = data.frame;
        data.frame = NativeRect::new(f.left, f.top, f.left + width, f.top + height);
        drop(data);
        self.inject(
            NativeMessage::new(MessageKind::WindowResized)
                .with_i32(field::WIDTH, width.round() as i32)
                .with_i32(field::HEIGHT, height.round() as i32),
        );
    }

    fn draw_bitmap(&self, framebuffer: &Framebuffer, rect: Rect) {
        let rect = rect.clip(framebuffer.width(), framebuffer.height());
        if rect.is_empty() {
            return;
        }
        let (x0, x1) = (rect.x as usize, rect.right() as usize);
        let pixels = (rect.y..rect.bottom())
            .filter_map(|y| framebuffer.row(y))
            .flat_map(|row| row[x0..x1].iter().copied())
            .collect();
        lock(&self.shared.data).blits.push(Blit { rect, pixels });
    }

    fn mouse_position(&self) -> Point {
        lock(&self.shared.data).pointer
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
