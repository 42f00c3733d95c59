// SPDX-License-Identifier: MIT
//
// Toolkit window backend.
//
// Two threads. The toolkit's application loop runs on a thread of its own
// (`hb-toolkit-app`), started by `initialize` and never joined; every
// native message it receives goes through the `ToolkitAdapter` onto the
// shared queue. The caller's thread owns everything else: it drains the
// queue in `process_events`, paints the framebuffer, and blits it in
// `present`.
//
// The window is touched from both sides, so every frame-loop operation
// on it holds the window lock through a `WindowGuard`. A window that can
// no longer be locked (the application loop has ended) makes those
// operations quiet no-ops.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use hb_core::backend::WindowBackend;
use hb_core::config::BackendConfig;
use hb_core::display::{DisplayState, ScreenInfo, WindowInfo, WindowState};
use hb_core::error::{Error, Result};
use hb_core::framebuffer::{Framebuffer, Rect};
use hb_core::input::InputState;
use hb_core::pump::{EventSink, pump};
use hb_core::queue::EventQueue;

use crate::adapter::ToolkitAdapter;
use crate::keymap::KEYMAP;
use crate::message::{MessageKind, NativeMessage};
use crate::native::{NativeRect, NativeWindow, Toolkit, WindowGuard};

/// A [`WindowBackend`] on top of a native GUI [`Toolkit`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use hb_core::backend::WindowBackend;
/// use hb_core::config::BackendConfig;
/// use hb_toolkit::{HeadlessToolkit, ToolkitBackend};
///
/// let toolkit = Arc::new(HeadlessToolkit::new(1024, 768));
/// let mut backend = ToolkitBackend::initialize(toolkit, BackendConfig::default())?;
/// assert_eq!(backend.display().screen.width, 1024);
///
/// backend.create_surface(640, 480)?;
/// backend.framebuffer_mut()?.fill(hb_core::framebuffer::Rgba::rgb(0, 0, 64));
/// backend.present(hb_core::framebuffer::Rect::new(0, 0, 640, 480))?;
/// backend.shutdown()?;
/// # Ok::<(), hb_core::Error>(())
/// ```
pub struct ToolkitBackend<T: Toolkit> {
    toolkit: Arc<T>,
    adapter: Arc<ToolkitAdapter>,
    title: String,
    window: Option<T::Window>,
    display: DisplayState,
    input: InputState,
    framebuffer: Option<Framebuffer>,
    state: WindowState,
    /// Frame to go back to when leaving fullscreen.
    saved_frame: Option<NativeRect>,
}

impl<T: Toolkit> ToolkitBackend<T> {
    /// Start the toolkit's application loop and wait until it is up.
    ///
    /// The wait has no deadline. If it takes longer than
    /// `config.launch_warn_after` a warning is logged once and the wait
    /// goes on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ThreadSpawn`] if the application thread cannot be
    /// started.
    pub fn initialize(toolkit: Arc<T>, config: BackendConfig) -> Result<Self> {
        let queue = Arc::new(EventQueue::from_config(&config));
        let adapter = Arc::new(ToolkitAdapter::new(queue));

        let app = Arc::clone(&toolkit);
        let app_adapter = Arc::clone(&adapter);
        thread::Builder::new()
            .name("hb-toolkit-app".into())
            .spawn(move || app.run(app_adapter))
            .map_err(Error::ThreadSpawn)?;

        wait_for_launch(toolkit.as_ref(), &config);

        let screen = toolkit.screen_frame();
        let display = DisplayState {
            screen: ScreenInfo {
                width: screen.integer_width() + 1,
                height: screen.integer_height() + 1,
                ..ScreenInfo::default()
            },
            window: WindowInfo::default(),
        };

        Ok(Self {
            toolkit,
            adapter,
            title: config.title,
            window: None,
            display,
            input: InputState::new(),
            framebuffer: None,
            state: WindowState::Normal,
            saved_frame: None,
        })
    }

    /// The toolkit this backend runs on.
    #[must_use]
    pub const fn toolkit(&self) -> &Arc<T> {
        &self.toolkit
    }

    /// The native window, once `create_surface` has made it.
    #[must_use]
    pub const fn window(&self) -> Option<&T::Window> {
        self.window.as_ref()
    }

    /// Make the window cover the whole screen, remembering its frame.
    ///
    /// # Errors
    ///
    /// [`Error::NoSurface`] before `create_surface`.
    pub fn enter_fullscreen(&mut self) -> Result<()> {
        if self.state == WindowState::Fullscreen {
            return Ok(());
        }
        let screen = self.toolkit.screen_frame();
        let saved = self.with_window(|w| {
            let saved = w.frame();
            w.move_to(screen.left, screen.top);
            w.resize_to(screen.width(), screen.height());
            saved
        })?;
        if let Some(frame) = saved {
            self.saved_frame = Some(frame);
            self.state = WindowState::Fullscreen;
        }
        Ok(())
    }

    /// Put the window back where it was before `enter_fullscreen`.
    ///
    /// # Errors
    ///
    /// [`Error::NoSurface`] before `create_surface`.
    pub fn exit_fullscreen(&mut self) -> Result<()> {
        let Some(frame) = self.saved_frame else {
            return Ok(());
        };
        let restored = self.with_window(|w| {
            w.move_to(frame.left, frame.top);
            w.resize_to(frame.width(), frame.height());
        })?;
        if restored.is_some() {
            self.saved_frame = None;
            self.state = WindowState::Normal;
        }
        Ok(())
    }

    /// Pointer position in view coordinates, read under the window lock.
    /// `None` if the window can no longer be locked.
    ///
    /// # Errors
    ///
    /// [`Error::NoSurface`] before `create_surface`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn cursor_position(&self) -> Result<Option<(i32, i32)>> {
        self.with_window(|w| {
            let p = w.mouse_position();
            (p.x as i32, p.y as i32)
        })
    }

    /// Warp the pointer to `(x, y)` in view coordinates. The toolkit then
    /// reports the move like any other.
    ///
    /// # Errors
    ///
    /// [`Error::NoSurface`] before `create_surface`.
    pub fn set_cursor_position(&self, x: i32, y: i32) -> Result<()> {
        if let Some(frame) = self.with_window(NativeWindow::frame)? {
            #[allow(clippy::cast_precision_loss)]
            let (x, y) = (x as f32, y as f32);
            self.toolkit.set_mouse_position(frame.left + x, frame.top + y);
        }
        Ok(())
    }

    /// Show or hide the pointer. Needs no window.
    pub fn set_cursor_visible(&self, visible: bool) {
        tracing::debug!(visible, "cursor visibility");
        self.toolkit.set_cursor_visible(visible);
    }

    /// Run `f` on the locked window. `Ok(None)` when the lock is refused.
    fn with_window<R>(&self, f: impl FnOnce(&T::Window) -> R) -> Result<Option<R>> {
        let window = self.window.as_ref().ok_or(Error::NoSurface)?;
        let Some(guard) = WindowGuard::lock(window) else {
            tracing::debug!("window lock refused, operation skipped");
            return Ok(None);
        };
        Ok(Some(f(&guard)))
    }

    /// Open the native window centred on the screen.
    fn open_window(&mut self, width: u32, height: u32) {
        let screen = self.toolkit.screen_frame();
        let w = i32::try_from(width).unwrap_or(i32::MAX);
        let h = i32::try_from(height).unwrap_or(i32::MAX);
        let x = (screen.integer_width() + 1).saturating_sub(w) / 2;
        let y = (screen.integer_height() + 1).saturating_sub(h) / 2;

        let window = self
            .toolkit
            .create_window(NativeRect::from_size(x, y, width, height), &self.title);
        let bounds = WindowGuard::lock(&window).map(|g| g.bounds());

        self.display.window = WindowInfo {
            width: bounds.map_or(w, |b| b.integer_width() + 1),
            height: bounds.map_or(h, |b| b.integer_height() + 1),
            focused: false,
            exists: true,
        };
        tracing::debug!(x, y, width, height, "window created");
        self.window = Some(window);
    }
}

/// Sleep in `launch_poll_interval` steps until the toolkit is up.
fn wait_for_launch(toolkit: &impl Toolkit, config: &BackendConfig) {
    let start = Instant::now();
    let mut warned = false;
    while toolkit.is_launching() {
        if !warned && start.elapsed() >= config.launch_warn_after {
            tracing::warn!(
                waited_ms = start.elapsed().as_millis(),
                "toolkit is still launching"
            );
            warned = true;
        }
        thread::sleep(config.launch_poll_interval);
    }
    tracing::info!(elapsed_ms = start.elapsed().as_millis(), "toolkit launched");
}

impl<T: Toolkit> WindowBackend for ToolkitBackend<T> {
    fn display(&self) -> &DisplayState {
        &self.display
    }

    fn input(&self) -> &InputState {
        &self.input
    }

    fn create_surface(&mut self, width: u32, height: u32) -> Result<()> {
        let framebuffer = Framebuffer::new(width, height)?;
        if self.window.is_none() {
            self.open_window(width, height);
        }
        self.framebuffer = Some(framebuffer);
        Ok(())
    }

    fn framebuffer_mut(&mut self) -> Result<&mut Framebuffer> {
        self.framebuffer.as_mut().ok_or(Error::NoSurface)
    }

    fn process_events(&mut self, sink: &mut impl EventSink) -> Result<usize> {
        Ok(pump(
            self.adapter.queue(),
            &KEYMAP,
            &mut self.display,
            &mut self.input,
            sink,
        ))
    }

    fn present(&mut self, dirty: Rect) -> Result<()> {
        let framebuffer = self.framebuffer.as_ref().ok_or(Error::NoSurface)?;
        let window = self.window.as_ref().ok_or(Error::NoSurface)?;
        if let Some(guard) = WindowGuard::lock(window) {
            guard.draw_bitmap(framebuffer, dirty);
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        title.clone_into(&mut self.title);
        if self.window.is_some() {
            self.with_window(|w| w.set_title(title))?;
        }
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        self.with_window(NativeWindow::show)?;
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn set_size(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::SurfaceSize { width, height });
        }
        self.with_window(|w| w.resize_to(width as f32 - 1.0, height as f32 - 1.0))?;
        Ok(())
    }

    fn window_state(&self) -> WindowState {
        self.state
    }

    fn request_close(&mut self) -> Result<()> {
        self.toolkit
            .post_app_message(NativeMessage::new(MessageKind::QuitRequested));
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.toolkit
            .post_app_message(NativeMessage::new(MessageKind::QuitRequested));
        self.framebuffer = None;
        self.window = None;
        self.display.window.exists = false;
        tracing::info!("toolkit backend shut down");
        Ok(())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessToolkit;
    use crate::message::{Point, field};
    use hb_core::framebuffer::Rgba;
    use hb_core::keys::Key;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn config() -> BackendConfig {
        BackendConfig {
            launch_poll_interval: Duration::from_millis(1),
            ..BackendConfig::default()
        }
    }

    fn backend() -> ToolkitBackend<HeadlessToolkit> {
        let toolkit = Arc::new(HeadlessToolkit::new(1024, 768));
        ToolkitBackend::initialize(toolkit, config()).unwrap()
    }

    /// Pump until `done` holds; the application thread needs a moment.
    fn pump_until(
        backend: &mut ToolkitBackend<HeadlessToolkit>,
        done: impl Fn(&ToolkitBackend<HeadlessToolkit>) -> bool,
    ) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(backend) {
            assert!(Instant::now() < deadline, "timed out waiting for events");
            backend.process_events(&mut ()).unwrap();
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn initialize_reports_screen() {
        let mut b = backend();
        assert!(!b.toolkit().is_launching());
        assert_eq!(b.display().screen.width, 1024);
        assert_eq!(b.display().screen.height, 768);
        assert_eq!(b.display().screen.depth, 4);
        assert!(!b.display().window.exists);
        b.shutdown().unwrap();
    }

    #[test]
    fn surface_operations_need_a_surface() {
        let mut b = backend();
        assert!(matches!(b.framebuffer_mut(), Err(Error::NoSurface)));
        assert!(matches!(b.present(Rect::new(0, 0, 1, 1)), Err(Error::NoSurface)));
        assert!(matches!(b.show(), Err(Error::NoSurface)));
        assert!(matches!(b.enter_fullscreen(), Err(Error::NoSurface)));
        assert!(matches!(b.cursor_position(), Err(Error::NoSurface)));
        assert!(matches!(b.set_cursor_position(1, 1), Err(Error::NoSurface)));
        assert!(matches!(
            b.create_surface(0, 10),
            Err(Error::SurfaceSize { width: 0, height: 10 })
        ));
        b.shutdown().unwrap();
    }

    #[test]
    fn create_surface_centres_window() {
        let mut b = backend();
        b.create_surface(640, 480).unwrap();

        let window = b.window().unwrap();
        assert_eq!(window.frame(), NativeRect::new(192.0, 144.0, 831.0, 623.0));
        assert_eq!(window.title(), "halfblock");
        assert!(!window.is_visible());
        assert_eq!(b.display().window.width, 640);
        assert_eq!(b.display().window.height, 480);
        assert!(b.display().window.exists);
        b.shutdown().unwrap();
    }

    #[test]
    fn title_set_before_surface_is_used() {
        let mut b = backend();
        b.set_title("early").unwrap();
        b.create_surface(8, 8).unwrap();
        assert_eq!(b.window().unwrap().title(), "early");
        b.set_title("late").unwrap();
        assert_eq!(b.window().unwrap().title(), "late");
        b.shutdown().unwrap();
    }

    #[test]
    fn present_blits_dirty_rect_unlocked_after() {
        let mut b = backend();
        b.create_surface(4, 4).unwrap();
        b.framebuffer_mut().unwrap().fill(Rgba::rgb(9, 9, 9));
        b.present(Rect::new(1, 1, 2, 2)).unwrap();

        let window = b.window().unwrap();
        let blits = window.blits();
        assert_eq!(blits.len(), 1);
        assert_eq!(blits[0].rect, Rect::new(1, 1, 2, 2));
        assert_eq!(blits[0].pixels, vec![Rgba::rgb(9, 9, 9); 4]);
        assert!(!window.is_locked());
        b.shutdown().unwrap();
    }

    #[test]
    fn show_yields_focus_and_redraw() {
        let mut b = backend();
        b.create_surface(8, 8).unwrap();
        b.show().unwrap();
        assert!(b.window().unwrap().is_visible());
        pump_until(&mut b, |b| b.display().window.focused);
        b.shutdown().unwrap();
    }

    #[test]
    fn set_size_round_trips_through_adapter() {
        let mut b = backend();
        b.create_surface(640, 480).unwrap();
        b.set_size(800, 600).unwrap();
        assert_eq!(b.window().unwrap().bounds().integer_width(), 799);

        pump_until(&mut b, |b| b.display().window.width == 800);
        assert_eq!(b.display().window.height, 600);
        assert!(matches!(
            b.set_size(0, 600),
            Err(Error::SurfaceSize { width: 0, height: 600 })
        ));
        b.shutdown().unwrap();
    }

    #[test]
    fn fullscreen_saves_and_restores_frame() {
        let mut b = backend();
        b.create_surface(640, 480).unwrap();
        let before = b.window().unwrap().frame();

        b.enter_fullscreen().unwrap();
        assert_eq!(b.window_state(), WindowState::Fullscreen);
        assert_eq!(b.window().unwrap().frame(), b.toolkit().screen_frame());
        b.enter_fullscreen().unwrap();

        b.exit_fullscreen().unwrap();
        assert_eq!(b.window_state(), WindowState::Normal);
        assert_eq!(b.window().unwrap().frame(), before);
        b.exit_fullscreen().unwrap();
        b.shutdown().unwrap();
    }

    #[test]
    fn cursor_position_reads_pointer() {
        let mut b = backend();
        b.create_surface(8, 8).unwrap();
        b.window().unwrap().set_pointer(Point::new(3.7, 5.2));
        assert_eq!(b.cursor_position().unwrap(), Some((3, 5)));
        b.shutdown().unwrap();
    }

    #[test]
    fn cursor_warp_is_relative_to_the_view() {
        let mut b = backend();
        b.create_surface(640, 480).unwrap();
        b.set_cursor_position(12, 34).unwrap();
        assert_eq!(b.cursor_position().unwrap(), Some((12, 34)));

        pump_until(&mut b, |b| b.input().pointer() == (12, 34));
        b.shutdown().unwrap();
    }

    #[test]
    fn cursor_visibility_goes_to_the_toolkit() {
        let mut b = backend();
        assert!(b.toolkit().is_cursor_visible());
        b.set_cursor_visible(false);
        assert!(!b.toolkit().is_cursor_visible());
        b.set_cursor_visible(true);
        assert!(b.toolkit().is_cursor_visible());
        b.shutdown().unwrap();
    }

    #[test]
    fn request_close_ends_in_window_closing() {
        let mut b = backend();
        b.create_surface(8, 8).unwrap();
        b.request_close().unwrap();
        pump_until(&mut b, |b| !b.display().window.exists && b.toolkit().has_quit());

        // The window is gone for good; locked operations become no-ops.
        assert_eq!(b.cursor_position().unwrap(), None);
        b.present(Rect::new(0, 0, 8, 8)).unwrap();
        b.shutdown().unwrap();
    }

    #[test]
    fn injected_keys_use_toolkit_keymap() {
        let mut b = backend();
        b.create_surface(8, 8).unwrap();
        b.window()
            .unwrap()
            .inject(NativeMessage::new(MessageKind::KeyDown).with_i32(field::KEY, 0x3C));
        pump_until(&mut b, |b| b.input().is_key_down(Key::A));
        b.shutdown().unwrap();
    }
}
