// SPDX-License-Identifier: MIT
//
// Framebuffer to terminal, two pixel rows per character row.
//
// Each terminal cell shows a `▄`: its background colour is the upper pixel
// and its foreground colour the lower one, so a terminal of `rows` lines
// displays `rows * 2` pixel rows. A dirty rectangle starting on an odd row
// is widened up to the even row above, since a cell is always redrawn as a
// whole.

use hb_core::framebuffer::{Framebuffer, Rect, Rgba};

use crate::output::{HalfBlockWriter, OutputBuffer};

/// Append the cells covering `dirty` to `out`.
///
/// The writer's tracked state is reset first. A lower pixel past the last
/// framebuffer row renders black.
pub fn draw_framebuffer(
    out: &mut OutputBuffer,
    writer: &mut HalfBlockWriter,
    fb: &Framebuffer,
    dirty: Rect,
) {
    writer.reset_state();

    let r = dirty.clip(fb.width(), fb.height());
    if r.is_empty() {
        return;
    }

    for y in ((r.y & !1)..r.bottom()).step_by(2) {
        let Ok(row) = u16::try_from(y / 2) else {
            break;
        };
        for x in r.x..r.right() {
            let Ok(col) = u16::try_from(x) else {
                break;
            };
            let top = fb.get(x, y).unwrap_or(Rgba::BLACK);
            let bottom = fb.get(x, y + 1).unwrap_or(Rgba::BLACK);
            writer.render_cell(out, col, row, top, bottom);
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RED: Rgba = Rgba::rgb(255, 0, 0);
    const BLUE: Rgba = Rgba::rgb(0, 0, 255);

    fn draw(fb: &Framebuffer, dirty: Rect) -> String {
        let mut out = OutputBuffer::new();
        let mut writer = HalfBlockWriter::new();
        draw_framebuffer(&mut out, &mut writer, fb, dirty);
        String::from_utf8(out.as_bytes().to_vec()).unwrap()
    }

    /// Red top row, blue bottom row.
    fn red_over_blue(width: u32) -> Framebuffer {
        let mut fb = Framebuffer::new(width, 2).unwrap();
        for x in 0..width {
            fb.set(x, 0, RED);
            fb.set(x, 1, BLUE);
        }
        fb
    }

    #[test]
    fn two_by_two_is_one_colour_pair_and_two_glyphs() {
        let fb = red_over_blue(2);
        assert_eq!(
            draw(&fb, fb.bounds()),
            "\x1b[48;2;255;0;0m\x1b[38;2;0;0;255m\x1b[1;1H\u{2584}\u{2584}"
        );
    }

    #[test]
    fn odd_start_row_is_widened_to_even() {
        let fb = red_over_blue(1);
        assert_eq!(draw(&fb, Rect::new(0, 1, 1, 1)), draw(&fb, fb.bounds()));
    }

    #[test]
    fn missing_lower_row_is_black() {
        let mut fb = Framebuffer::new(1, 3).unwrap();
        fb.fill(RED);
        let out = draw(&fb, Rect::new(0, 2, 1, 1));
        assert_eq!(out, "\x1b[48;2;255;0;0m\x1b[38;2;0;0;0m\x1b[2;1H\u{2584}");
    }

    #[test]
    fn dirty_rect_is_clipped() {
        let fb = red_over_blue(2);
        let clipped = draw(&fb, Rect::new(1, 0, 100, 100));
        assert_eq!(clipped.matches('\u{2584}').count(), 1);
        assert!(clipped.contains("\x1b[1;2H"));
    }

    #[test]
    fn empty_rect_draws_nothing() {
        let fb = red_over_blue(2);
        assert!(draw(&fb, Rect::new(0, 0, 0, 2)).is_empty());
        assert!(draw(&fb, Rect::new(5, 5, 2, 2)).is_empty());
    }

    #[test]
    fn rows_map_to_half_height() {
        let mut fb = Framebuffer::new(1, 6).unwrap();
        fb.fill(RED);
        let out = draw(&fb, fb.bounds());
        assert!(out.contains("\x1b[1;1H"));
        assert!(out.contains("\x1b[2;1H"));
        assert!(out.contains("\x1b[3;1H"));
        assert_eq!(out.matches('\u{2584}').count(), 3);
    }
}
