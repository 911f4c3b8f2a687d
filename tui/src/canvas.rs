//! Cell Canvas - Braille Drawing Surface
//!
//! Implements the core's [`DrawSurface`] on a terminal grid. Every cell
//! holds a 2x4 block of braille dots, so the particle fields get eight
//! sub-pixels per cell. Each dot keeps an intensity that full-surface
//! fills decay, which is how the warp leaves trails.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};

use orchestrator_core::{DrawSurface, Rgba, SurfaceSize};

/// Dots per cell horizontally
pub const DOTS_X: u16 = 2;
/// Dots per cell vertically
pub const DOTS_Y: u16 = 4;

/// Dimmer dots are not drawn
const VISIBLE_INTENSITY: f32 = 0.08;

/// Braille bit for the dot at (column, row) inside a cell
const BRAILLE_BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

#[derive(Clone, Copy, Debug)]
struct Dot {
    intensity: f32,
    color: Rgba,
}

impl Default for Dot {
    fn default() -> Self {
        Self {
            intensity: 0.0,
            color: Rgba::BLACK,
        }
    }
}

/// A braille dot grid sized in terminal cells
#[derive(Clone, Debug)]
pub struct CellCanvas {
    cols: u16,
    rows: u16,
    dots: Vec<Dot>,
}

impl CellCanvas {
    /// Canvas covering `cols` x `rows` terminal cells
    pub fn new(cols: u16, rows: u16) -> Self {
        let mut canvas = Self {
            cols: 0,
            rows: 0,
            dots: Vec::new(),
        };
        canvas.resize(cols, rows);
        canvas
    }

    /// Resize to a new cell grid, dropping the current picture
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        let len = usize::from(cols) * usize::from(DOTS_X) * usize::from(rows) * usize::from(DOTS_Y);
        self.dots = vec![Dot::default(); len];
    }

    /// Erase every dot
    pub fn clear(&mut self) {
        self.dots.fill(Dot::default());
    }

    /// Size in cells
    pub fn cells(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Number of dots bright enough to draw
    pub fn lit_dots(&self) -> usize {
        self.dots
            .iter()
            .filter(|d| d.intensity >= VISIBLE_INTENSITY)
            .count()
    }

    fn dot_width(&self) -> usize {
        usize::from(self.cols) * usize::from(DOTS_X)
    }

    fn dot_height(&self) -> usize {
        usize::from(self.rows) * usize::from(DOTS_Y)
    }

    fn plot(&mut self, x: i32, y: i32, color: Rgba) {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return;
        };
        if x >= self.dot_width() || y >= self.dot_height() {
            return;
        }
        let idx = y * self.dot_width() + x;
        if let Some(dot) = self.dots.get_mut(idx) {
            if color.a >= dot.intensity {
                dot.intensity = color.a;
                dot.color = color;
            }
        }
    }

    /// Draw the canvas into `area` of `buf`; unlit cells stay untouched
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let width = self.dot_width();
        for cy in 0..self.rows.min(area.height) {
            for cx in 0..self.cols.min(area.width) {
                let mut bits = 0u8;
                let mut brightest = Dot::default();

                for (dx, column) in BRAILLE_BITS.iter().enumerate() {
                    for (dy, bit) in column.iter().enumerate() {
                        let x = usize::from(cx) * usize::from(DOTS_X) + dx;
                        let y = usize::from(cy) * usize::from(DOTS_Y) + dy;
                        let Some(dot) = self.dots.get(y * width + x) else {
                            continue;
                        };
                        if dot.intensity >= VISIBLE_INTENSITY {
                            bits |= bit;
                            if dot.intensity > brightest.intensity {
                                brightest = *dot;
                            }
                        }
                    }
                }

                if bits == 0 {
                    continue;
                }

                let symbol = char::from_u32(0x2800 + u32::from(bits)).unwrap_or('.');
                buf[(area.x + cx, area.y + cy)]
                    .set_char(symbol)
                    .set_style(Style::default().fg(shade(brightest)));
            }
        }
    }
}

/// Dot color dimmed by intensity, never fully black
fn shade(dot: Dot) -> Color {
    let k = dot.intensity.clamp(0.35, 1.0);
    let scale = |c: u8| (f32::from(c) * k).round() as u8;
    Color::Rgb(
        scale(dot.color.r),
        scale(dot.color.g),
        scale(dot.color.b),
    )
}

impl DrawSurface for CellCanvas {
    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(
            u32::from(self.cols) * u32::from(DOTS_X),
            u32::from(self.rows) * u32::from(DOTS_Y),
        )
    }

    fn fill(&mut self, color: Rgba) {
        let keep = 1.0 - color.a.clamp(0.0, 1.0);
        for dot in &mut self.dots {
            dot.intensity *= keep;
        }
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let (px, py) = (x.floor() as i32, y.floor() as i32);
        let r = radius.max(0.0).min(4.0);
        let reach = r.floor() as i32;

        for oy in -reach..=reach {
            for ox in -reach..=reach {
                if ((ox * ox + oy * oy) as f32) <= r * r {
                    self.plot(px + ox, py + oy, color);
                }
            }
        }
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), _width: f32, color: Rgba) {
        if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
            return;
        }

        // Keep Bresenham bounded for endpoints projected far off-screen
        let limit_x = self.dot_width() as f32 * 2.0;
        let limit_y = self.dot_height() as f32 * 2.0;
        let clamp = |v: f32, limit: f32| v.clamp(-limit, limit).floor() as i32;

        let (mut x0, mut y0) = (clamp(from.0, limit_x), clamp(from.1, limit_y));
        let (x1, y1) = (clamp(to.0, limit_x), clamp(to.1, limit_y));

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_size_in_dots() {
        let canvas = CellCanvas::new(10, 5);
        assert_eq!(canvas.size(), SurfaceSize::new(20, 20));
    }

    #[test]
    fn test_dot_becomes_braille_cell() {
        let mut canvas = CellCanvas::new(2, 1);
        canvas.fill_circle(0.2, 0.2, 0.0, Rgba::WHITE);

        let mut buf = Buffer::empty(Rect::new(0, 0, 2, 1));
        canvas.render(Rect::new(0, 0, 2, 1), &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "\u{2801}");
        assert_eq!(buf[(1, 0)].symbol(), " ");
    }

    #[test]
    fn test_fill_decays_trails() {
        let mut canvas = CellCanvas::new(4, 2);
        canvas.stroke_line((0.0, 0.0), (7.0, 7.0), 1.0, Rgba::COSMIC_CYAN);
        let lit = canvas.lit_dots();
        assert_eq!(lit, 8);

        canvas.fill(Rgba::BLACK.with_alpha(0.3));
        assert_eq!(canvas.lit_dots(), lit);

        canvas.fill(Rgba::BLACK);
        assert_eq!(canvas.lit_dots(), 0);
    }

    #[test]
    fn test_out_of_range_drawing_is_clipped() {
        let mut canvas = CellCanvas::new(4, 2);
        canvas.fill_circle(-3.0, 100.0, 1.0, Rgba::WHITE);
        canvas.fill_circle(f32::NAN, 1.0, 1.0, Rgba::WHITE);
        canvas.stroke_line((-1e9, -1e9), (1e9, 1e9), 1.0, Rgba::WHITE);
        assert!(canvas.lit_dots() > 0);
        assert!(canvas.lit_dots() <= 8);
    }

    #[test]
    fn test_very_tall_canvas_does_not_overflow() {
        let mut canvas = CellCanvas::new(1, 20_000);
        assert_eq!(canvas.size(), SurfaceSize::new(2, 80_000));

        canvas.fill_circle(1.0, 79_999.0, 0.0, Rgba::WHITE);
        assert_eq!(canvas.lit_dots(), 1);

        let mut buf = Buffer::empty(Rect::new(0, 19_999, 1, 1));
        canvas.render(Rect::new(0, 0, 1, 20_000), &mut buf);
        assert_eq!(buf[(0, 19_999)].symbol(), "\u{2880}");
    }

    #[test]
    fn test_empty_canvas_is_safe() {
        let mut canvas = CellCanvas::new(0, 0);
        canvas.fill_circle(0.0, 0.0, 1.0, Rgba::WHITE);
        canvas.stroke_line((0.0, 0.0), (5.0, 5.0), 1.0, Rgba::WHITE);
        let mut buf = Buffer::empty(Rect::new(0, 0, 1, 1));
        canvas.render(Rect::new(0, 0, 1, 1), &mut buf);
        assert_eq!(canvas.lit_dots(), 0);
    }
}
