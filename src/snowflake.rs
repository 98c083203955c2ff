//! The snowflake visualization: drives the growth engine at a fixed cadence
//! and rasterizes its segment layers as braille line art.
//!
//! Controls:
//! - 1-9, 0: speed presets
//! - Space: pause
//! - Q/Esc: quit

use crate::config::SnowConfig;
use crate::engine::{SnowEngine, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::geometry::Segment;
use crate::terminal::Terminal;
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::style::Color;
use rand::prelude::*;
use std::io;

// Braille cells pack a 2x4 dot grid.
const BRAILLE_BASE: u32 = 0x2800;
const DOTS_X: usize = 2;
const DOTS_Y: usize = 4;

// Cell-relative dot position for each braille bit, low bit first.
const DOT_OFFSETS: [(usize, usize); 8] = [
    (0, 0),
    (0, 1),
    (0, 2),
    (1, 0),
    (1, 1),
    (1, 2),
    (0, 3),
    (1, 3),
];

/// Runtime state for interactive controls.
struct VizState {
    speed: f32,
    paused: bool,
}

impl VizState {
    fn new(initial_speed: f32) -> Self {
        Self {
            speed: initial_speed,
            paused: false,
        }
    }

    /// Handle keypress, returns true if should quit.
    fn handle_key(&mut self, code: KeyCode, _modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char(' ') => self.paused = !self.paused,
            // Number keys: change speed (1=fastest, 9=slowest, 0=very slow)
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let n = c.to_digit(10).unwrap() as u8;
                self.speed = match n {
                    1 => 0.01,
                    2 => 0.02,
                    3 => 0.05,
                    4 => 0.07,
                    5 => 0.1,
                    6 => 0.15,
                    7 => 0.2,
                    8 => 0.3,
                    _ => 0.5,
                };
            }
            _ => {}
        }
        false
    }
}

/// Braille dot canvas the display-space segments are rasterized onto.
struct DotGrid {
    width: usize,
    height: usize,
    dots: Vec<Option<Color>>,
    scale: f64,
    x_origin: f64,
    y_origin: f64,
}

impl DotGrid {
    fn new(cols: u16, rows: u16) -> Self {
        let width = (cols as usize * DOTS_X).max(1);
        let height = (rows as usize * DOTS_Y).max(1);
        // Fit the fractal canvas into the dot grid, preserving aspect.
        let scale = (width as f64 / f64::from(CANVAS_WIDTH))
            .min(height as f64 / f64::from(CANVAS_HEIGHT));
        let x_origin = (width as f64 - f64::from(CANVAS_WIDTH) * scale) / 2.0;
        let y_origin = (height as f64 - f64::from(CANVAS_HEIGHT) * scale) / 2.0;
        Self {
            width,
            height,
            dots: vec![None; width * height],
            scale,
            x_origin,
            y_origin,
        }
    }

    fn clear(&mut self) {
        self.dots.fill(None);
    }

    fn plot(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height {
            self.dots[y as usize * self.width + x as usize] = Some(color);
        }
    }

    /// Bresenham between a segment's display-space endpoints.
    fn line(&mut self, seg: &Segment, color: Color) {
        let x0 = (f64::from(seg.p1.x) * self.scale + self.x_origin) as i32;
        let y0 = (f64::from(seg.p1.y) * self.scale + self.y_origin) as i32;
        let x1 = (f64::from(seg.p2.x) * self.scale + self.x_origin) as i32;
        let y1 = (f64::from(seg.p2.y) * self.scale + self.y_origin) as i32;

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.plot(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                if x == x1 {
                    break;
                }
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                if y == y1 {
                    break;
                }
                err += dx;
                y += sy;
            }
        }
    }

    /// Pack the dots into braille characters on the terminal buffer.
    fn blit(&self, term: &mut Terminal) {
        let (cols, rows) = term.size();
        for cy in 0..rows as usize {
            for cx in 0..cols as usize {
                let mut bits: u8 = 0;
                let mut color = None;
                for (bit, (dx, dy)) in DOT_OFFSETS.iter().enumerate() {
                    let gx = cx * DOTS_X + dx;
                    let gy = cy * DOTS_Y + dy;
                    if gx < self.width && gy < self.height {
                        if let Some(c) = self.dots[gy * self.width + gx] {
                            bits |= 1 << bit;
                            color = Some(c);
                        }
                    }
                }
                if bits != 0 {
                    let ch = char::from_u32(BRAILLE_BASE + u32::from(bits)).unwrap_or(' ');
                    term.set(cx as i32, cy as i32, ch, color);
                }
            }
        }
    }
}

/// Run the visualization.
pub fn run(config: SnowConfig) -> io::Result<()> {
    let seed = config.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0) // Fallback seed for misconfigured system clocks
    });

    let mut term = Terminal::new(true)?;
    term.clear_screen()?;

    let mut engine = SnowEngine::new(CANVAS_WIDTH, CANVAS_HEIGHT, StdRng::seed_from_u64(seed));
    let mut state = VizState::new(config.time_step);

    let (init_w, init_h) = term.size();
    let mut grid = DotGrid::new(init_w, init_h);

    loop {
        let (width, height) = crossterm::terminal::size().unwrap_or(term.size());
        if (width, height) != term.size() {
            term.resize(width, height);
            term.clear_screen()?;
            grid = DotGrid::new(width, height);
        }

        if let Some((code, mods)) = term.check_key()? {
            if state.handle_key(code, mods) {
                break;
            }
        }

        if state.paused {
            term.sleep(0.1);
            continue;
        }

        // Guard against zero-size terminal
        if width == 0 || height == 0 {
            term.sleep(0.1);
            continue;
        }

        engine.advance();

        grid.clear();
        for layer in engine.renderables() {
            for seg in &layer.segments {
                grid.line(seg, layer.color);
            }
        }

        term.clear();
        grid.blit(&mut term);

        let label = format!(
            "snowflake  seed {}  segments {}  flakes {}",
            seed,
            engine.active_len(),
            engine.flake_count()
        );
        term.set_str(1, 0, &label, Some(Color::DarkGrey));

        term.present()?;
        term.sleep(state.speed);
    }

    Ok(())
}
