// SPDX-License-Identifier: MIT
//
// Terminal window backend.
//
// The "window" is the terminal itself: one pixel per column, two per row.
// Everything runs on the caller's thread. Once per frame `process_events`
// folds the signal flags and any waiting stdin bytes into the queue, then
// pumps the queue into the application; `present` turns the dirty part of
// the framebuffer into half-block cells and writes them in one go.

use std::io;

use hb_core::backend::WindowBackend;
use hb_core::config::BackendConfig;
use hb_core::display::{DisplayState, ScreenInfo, WindowInfo};
use hb_core::error::{Error, Result};
use hb_core::event::Event;
use hb_core::framebuffer::{Framebuffer, Rect};
use hb_core::input::InputState;
use hb_core::pump::{EventSink, pump};
use hb_core::queue::EventQueue;

use crate::ansi::{self, MouseMode};
use crate::input::InputParser;
use crate::keymap::KEYMAP;
use crate::output::{HalfBlockWriter, OutputBuffer};
use crate::present::draw_framebuffer;
use crate::signals::{self, SIGNALS, SignalFlags};
use crate::stdin::{InputSource, Stdin};
use crate::terminal::{Size, Terminal};

// ─── Config ─────────────────────────────────────────────────────────────────

/// Terminal backend configuration.
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Settings shared by every backend.
    pub backend: BackendConfig,

    /// Maximum bytes taken from stdin per frame. Default: 4096.
    pub read_buf_size: usize,

    /// How much mouse movement the terminal reports. Default: all motion.
    pub mouse_mode: MouseMode,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            read_buf_size: 4096,
            mouse_mode: MouseMode::Motion,
        }
    }
}

// ─── Input Poll ─────────────────────────────────────────────────────────────

/// The non-blocking half of `process_events`: signal flags and stdin.
struct InputPoll {
    parser: InputParser,
    buf: Vec<u8>,
}

impl InputPoll {
    fn new(read_buf_size: usize) -> Self {
        Self {
            parser: InputParser::new(),
            buf: vec![0; read_buf_size.max(1)],
        }
    }

    /// Resize first, then close (which skips reading), then at most one
    /// read of whatever stdin already holds.
    ///
    /// Returns the new terminal size if a resize was handled.
    fn poll(
        &mut self,
        flags: &SignalFlags,
        source: &mut impl InputSource,
        queue: &EventQueue,
        query_size: impl FnOnce() -> Size,
    ) -> io::Result<Option<Size>> {
        let resized = flags.take_resize().then(|| {
            let size = query_size();
            tracing::debug!(cols = size.cols, rows = size.rows, "terminal resized");
            queue.push(Event::WindowResized {
                width: size.pixel_width(),
                height: size.pixel_height(),
            });
            size
        });

        if flags.take_close() {
            queue.push(Event::WindowClosing);
            return Ok(resized);
        }

        let n = source.read_available(&mut self.buf)?;
        if n > 0 {
            self.parser.feed(&self.buf[..n], queue);
        }
        Ok(resized)
    }
}

/// The terminal is the whole screen: it follows every resize. The window
/// half is left to the pump, which sees the queued `WindowResized`.
const fn resize_screen(screen: &mut ScreenInfo, size: Size) {
    screen.width = size.pixel_width();
    screen.height = size.pixel_height();
}

// ─── TerminalBackend ────────────────────────────────────────────────────────

/// A [`WindowBackend`] drawing into the terminal it runs in.
///
/// # Example
///
/// ```no_run
/// use hb_core::backend::WindowBackend;
/// use hb_term::{TerminalBackend, TerminalConfig};
///
/// let mut backend = TerminalBackend::initialize(TerminalConfig::default())?;
/// let (w, h) = (backend.display().window.width, backend.display().window.height);
/// backend.create_surface(w as u32, h as u32)?;
/// while backend.display().window.exists {
///     backend.process_events(&mut ())?;
///     let fb = backend.framebuffer_mut()?;
///     let dirty = fb.bounds();
///     backend.present(dirty)?;
/// }
/// backend.shutdown()?;
/// # Ok::<(), hb_core::Error>(())
/// ```
pub struct TerminalBackend {
    terminal: Terminal,
    queue: EventQueue,
    poll: InputPoll,
    display: DisplayState,
    input: InputState,
    framebuffer: Option<Framebuffer>,
    out: OutputBuffer,
    writer: HalfBlockWriter,
}

impl TerminalBackend {
    /// Hook the terminal and install the signal handlers.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be switched into our mode.
    pub fn initialize(config: TerminalConfig) -> Result<Self> {
        let mut terminal = Terminal::new();
        signals::install();
        if let Err(err) = terminal.enter(config.mouse_mode) {
            signals::uninstall();
            return Err(err.into());
        }

        let size = terminal.size();
        let display = DisplayState {
            screen: ScreenInfo {
                width: size.pixel_width(),
                height: size.pixel_height(),
                depth: 4,
                scale_x: 0.5,
                scale_y: 0.5,
            },
            window: WindowInfo {
                width: size.pixel_width(),
                height: size.pixel_height(),
                focused: true,
                exists: true,
            },
        };

        Ok(Self {
            terminal,
            queue: EventQueue::from_config(&config.backend),
            poll: InputPoll::new(config.read_buf_size),
            display,
            input: InputState::new(),
            framebuffer: None,
            out: OutputBuffer::new(),
            writer: HalfBlockWriter::new(),
        })
    }

    /// Current terminal size in cells.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }
}

impl WindowBackend for TerminalBackend {
    fn display(&self) -> &DisplayState {
        &self.display
    }

    fn input(&self) -> &InputState {
        &self.input
    }

    fn create_surface(&mut self, width: u32, height: u32) -> Result<()> {
        self.framebuffer = Some(Framebuffer::new(width, height)?);
        Ok(())
    }

    fn framebuffer_mut(&mut self) -> Result<&mut Framebuffer> {
        self.framebuffer.as_mut().ok_or(Error::NoSurface)
    }

    fn process_events(&mut self, sink: &mut impl EventSink) -> Result<usize> {
        let terminal = &mut self.terminal;
        let resized = self
            .poll
            .poll(&SIGNALS, &mut Stdin, &self.queue, || terminal.refresh_size())?;
        if let Some(size) = resized {
            resize_screen(&mut self.display.screen, size);
        }
        Ok(pump(
            &self.queue,
            &KEYMAP,
            &mut self.display,
            &mut self.input,
            sink,
        ))
    }

    fn present(&mut self, dirty: Rect) -> Result<()> {
        let fb = self.framebuffer.as_ref().ok_or(Error::NoSurface)?;
        ansi::begin_sync(&mut self.out)?;
        draw_framebuffer(&mut self.out, &mut self.writer, fb, dirty);
        ansi::end_sync(&mut self.out)?;
        self.out.flush_stdout()?;
        Ok(())
    }

    fn set_title(&mut self, _title: &str) -> Result<()> {
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        Ok(())
    }

    fn set_size(&mut self, _width: u32, _height: u32) -> Result<()> {
        Ok(())
    }

    fn request_close(&mut self) -> Result<()> {
        SIGNALS.raise_close();
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.terminal.leave();
        signals::uninstall();
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
