// SPDX-License-Identifier: MIT
//
// halfblock — demo driver for the window backends.
//
// Opens a window on the chosen backend, paints an animated pattern into
// the software framebuffer every frame, and follows the input that comes
// back through the event pump:
//
//   backend.process_events(&mut demo)   → Demo's EventSink callbacks
//   paint(framebuffer, frame, invert)   → pixels
//   backend.present(bounds)             → terminal cells / native blit
//
// Q or Escape quits, as does closing the window (Ctrl-C or SIGTERM in the
// terminal). Holding the left mouse button inverts the pattern. Logs go to
// a file, because in the terminal backend stdout is the screen.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use hb_core::backend::WindowBackend;
use hb_core::config::BackendConfig;
use hb_core::event::MouseButton;
use hb_core::framebuffer::{Framebuffer, Rgba};
use hb_core::keys::Key;
use hb_core::pump::EventSink;
use hb_term::{TerminalBackend, TerminalConfig};
use hb_toolkit::{HeadlessToolkit, ToolkitBackend};

/// Surface size used when the backend has no window size of its own yet.
const DEFAULT_SURFACE: (u32, u32) = (320, 200);

/// Frame limit for the headless backend, which has nobody to close it.
const HEADLESS_FRAMES: u64 = 120;

// ─── CLI ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendKind {
    /// Draw into this terminal with half-block cells.
    Terminal,
    /// Run the toolkit backend against the in-process headless toolkit.
    Headless,
}

#[derive(Debug, Parser)]
#[command(name = "halfblock", version, about = "Animated framebuffer demo for the halfblock backends")]
struct Args {
    /// Window backend to run.
    #[arg(long, value_enum, default_value_t = BackendKind::Terminal, env = "HALFBLOCK_BACKEND")]
    backend: BackendKind,

    /// Target frames per second.
    #[arg(
        long,
        default_value_t = 30,
        env = "HALFBLOCK_FPS",
        value_parser = clap::value_parser!(u32).range(1..=240)
    )]
    fps: u32,

    /// Stop after this many frames. Without it the terminal demo runs until
    /// closed and the headless demo stops after 120 frames.
    #[arg(long, env = "HALFBLOCK_FRAMES")]
    frames: Option<u64>,

    /// Where to write the log. Filter with RUST_LOG (default: info).
    #[arg(long, default_value = "halfblock.log", env = "HALFBLOCK_LOG_FILE")]
    log_file: PathBuf,
}

// ─── Demo ───────────────────────────────────────────────────────────────────

/// Application state, fed by the pump. Held buttons are read from the
/// backend's `InputState`.
#[derive(Debug, Default)]
struct Demo {
    quit: bool,
    /// Size from the latest `WindowResized`, not yet applied to the surface.
    pending_resize: Option<(u32, u32)>,
}

impl EventSink for Demo {
    fn on_key(&mut self, key: Key, pressed: bool, repeat: bool) {
        tracing::debug!(?key, pressed, repeat, "key");
        if pressed && matches!(key, Key::Q | Key::Escape) {
            self.quit = true;
        }
    }

    fn on_resized(&mut self, width: i32, height: i32) {
        if let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) {
            if w > 0 && h > 0 {
                self.pending_resize = Some((w, h));
            }
        }
    }

    fn on_closing(&mut self) {
        tracing::info!("window closing");
        self.quit = true;
    }
}

/// Paint frame number `frame`, optionally inverted.
fn paint(fb: &mut Framebuffer, frame: u64, invert: bool) {
    for y in 0..fb.height() {
        for x in 0..fb.width() {
            let px = pattern(x, y, frame);
            let px = if invert { Rgba::rgb(255 - px.r, 255 - px.g, 255 - px.b) } else { px };
            fb.set(x, y, px);
        }
    }
}

/// Diagonal colour bands drifting with time.
#[allow(clippy::cast_possible_truncation)]
fn pattern(x: u32, y: u32, t: u64) -> Rgba {
    let (x, y) = (u64::from(x), u64::from(y));
    let r = (x * 4 + t * 3) % 256;
    let g = (y * 8 + t * 2) % 256;
    let b = ((x ^ y) + t) % 256;
    Rgba::rgb(r as u8, g as u8, b as u8)
}

// ─── Frame Loop ─────────────────────────────────────────────────────────────

/// Run frames until the demo quits or `frames` is reached. Returns the
/// number of frames presented.
fn run(backend: &mut impl WindowBackend, fps: u32, frames: Option<u64>) -> hb_core::Result<u64> {
    let window = backend.display().window;
    let (width, height) = match (u32::try_from(window.width), u32::try_from(window.height)) {
        (Ok(w), Ok(h)) if window.exists && w > 0 && h > 0 => (w, h),
        _ => DEFAULT_SURFACE,
    };

    backend.set_title("halfblock demo")?;
    backend.create_surface(width, height)?;
    backend.show()?;

    let frame_time = Duration::from_secs(1) / fps;
    let mut demo = Demo::default();
    let mut frame = 0;

    loop {
        let started = Instant::now();
        backend.process_events(&mut demo)?;
        if demo.quit || !backend.display().window.exists {
            break;
        }
        if let Some((w, h)) = demo.pending_resize.take() {
            tracing::debug!(w, h, "resizing surface");
            backend.create_surface(w, h)?;
        }

        let invert = backend.input().is_button_down(MouseButton::Left);
        let fb = backend.framebuffer_mut()?;
        paint(fb, frame, invert);
        let bounds = fb.bounds();
        backend.present(bounds)?;

        frame += 1;
        if frames.is_some_and(|limit| frame >= limit) {
            break;
        }
        if let Some(rest) = frame_time.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    backend.shutdown()?;
    Ok(frame)
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_file) {
        eprintln!("halfblock: cannot open log file {}: {e}", args.log_file.display());
        return ExitCode::FAILURE;
    }
    tracing::info!(backend = ?args.backend, fps = args.fps, "starting");

    let result = match args.backend {
        BackendKind::Terminal => TerminalBackend::initialize(TerminalConfig::default())
            .and_then(|mut backend| run(&mut backend, args.fps, args.frames)),
        BackendKind::Headless => {
            let toolkit = Arc::new(HeadlessToolkit::default());
            let frames = args.frames.or(Some(HEADLESS_FRAMES));
            ToolkitBackend::initialize(toolkit, BackendConfig::default())
                .and_then(|mut backend| run(&mut backend, args.fps, frames))
        }
    };

    match result {
        Ok(frames) => {
            tracing::info!(frames, "finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "backend failed");
            eprintln!("halfblock: {e}");
            ExitCode::FAILURE
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn cli_defaults() {
        let args = Args::try_parse_from(["halfblock"]).unwrap();
        assert_eq!(args.backend, BackendKind::Terminal);
        assert_eq!(args.fps, 30);
        assert_eq!(args.frames, None);
        assert_eq!(args.log_file, PathBuf::from("halfblock.log"));
    }

    #[test]
    fn cli_rejects_zero_fps() {
        assert!(Args::try_parse_from(["halfblock", "--fps", "0"]).is_err());
    }

    #[test]
    fn quit_keys_and_close() {
        let mut demo = Demo::default();
        demo.on_key(Key::A, true, false);
        assert!(!demo.quit);
        demo.on_key(Key::Q, false, false);
        assert!(!demo.quit);
        demo.on_key(Key::Escape, true, false);
        assert!(demo.quit);

        let mut demo = Demo::default();
        demo.on_closing();
        assert!(demo.quit);
    }

    #[test]
    fn resize_ignores_empty_sizes() {
        let mut demo = Demo::default();
        demo.on_resized(0, 10);
        demo.on_resized(-5, 10);
        assert_eq!(demo.pending_resize, None);
        demo.on_resized(100, 60);
        assert_eq!(demo.pending_resize, Some((100, 60)));
    }

    #[test]
    fn invert_flips_every_channel() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        paint(&mut fb, 7, false);
        let plain = fb.get(1, 2).unwrap();
        assert_eq!(plain, pattern(1, 2, 7));

        paint(&mut fb, 7, true);
        assert_eq!(fb.get(1, 2), Some(Rgba::rgb(255 - plain.r, 255 - plain.g, 255 - plain.b)));
    }

    #[test]
    fn headless_run_stops_at_frame_limit() {
        let toolkit = Arc::new(HeadlessToolkit::new(640, 480));
        let config = BackendConfig {
            launch_poll_interval: Duration::from_millis(1),
            ..BackendConfig::default()
        };
        let mut backend = ToolkitBackend::initialize(Arc::clone(&toolkit), config).unwrap();

        let presented = run(&mut backend, 240, Some(3)).unwrap();

        assert_eq!(presented, 3);
        let window = &toolkit.windows()[0];
        assert_eq!(window.title(), "halfblock demo");
        assert_eq!(window.blits().len(), 3);
        assert_eq!(window.blits()[0].rect, hb_core::framebuffer::Rect::new(0, 0, 320, 200));
    }
}
