//! Crossterm-backed render surface: a back buffer of colored cells,
//! flushed to the terminal in one queued write per frame.

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;

/// A single cell in the back buffer.
#[derive(Clone, Copy)]
struct Cell {
    ch: char,
    fg: Option<Color>,
}

impl Default for Cell {
    fn default() -> Self {
        Self { ch: ' ', fg: None }
    }
}

pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Cell>,
    alternate_screen: bool,
}

impl Terminal {
    /// Initialize the terminal for drawing. With `alternate_screen` the
    /// session switches to raw mode and hides the cursor until drop.
    pub fn new(alternate_screen: bool) -> io::Result<Self> {
        let (width, height) = size()?;

        if alternate_screen {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
        }

        Ok(Self {
            width,
            height,
            buffer: vec![Cell::default(); width as usize * height as usize],
            alternate_screen,
        })
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Adopt new terminal dimensions, dropping the old buffer contents.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.buffer = vec![Cell::default(); width as usize * height as usize];
    }

    /// Reset the back buffer to blanks.
    pub fn clear(&mut self) {
        self.buffer.fill(Cell::default());
    }

    /// Clear the actual terminal.
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))
    }

    /// Set a character at a position; out-of-bounds writes are dropped.
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize * self.width as usize + x as usize] = Cell { ch, fg };
        }
    }

    /// Set a string starting at a position.
    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<Color>) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg);
        }
    }

    /// Flush the back buffer to the terminal.
    pub fn present(&self) -> io::Result<()> {
        let mut out = stdout();
        for y in 0..self.height {
            queue!(out, MoveTo(0, y))?;
            for x in 0..self.width {
                let cell = self.buffer[y as usize * self.width as usize + x as usize];
                match cell.fg {
                    Some(color) => queue!(out, SetForegroundColor(color), Print(cell.ch))?,
                    None => queue!(out, ResetColor, Print(cell.ch))?,
                }
            }
        }
        queue!(out, ResetColor)?;
        out.flush()
    }

    /// Check for a keypress without blocking.
    pub fn check_key(&self) -> io::Result<Option<(KeyCode, KeyModifiers)>> {
        if poll(Duration::from_millis(0))? {
            if let Event::Key(key) = read()? {
                return Ok(Some((key.code, key.modifiers)));
            }
        }
        Ok(None)
    }

    /// Sleep for the given fraction of a second.
    pub fn sleep(&self, seconds: f32) {
        std::thread::sleep(Duration::from_secs_f32(seconds.max(0.0)));
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.alternate_screen {
            let _ = execute!(stdout(), Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}
