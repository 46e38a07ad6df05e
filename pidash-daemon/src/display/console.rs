//! Console backend: frames go to the log instead of a panel
//!
//! Useful on a bench without the hat, or under systemd with the journal.

use log::info;
use pidash_display::{DisplayBackend, DisplayError, SCREEN_COLS, SCREEN_ROWS};

const WIDTH: usize = 128;
const HEIGHT: usize = 64;

/// Text grid plus a 1-bit pixel buffer
pub struct ConsoleBackend {
    rows: Vec<String>,
    pixels: Vec<bool>,
}

impl Default for ConsoleBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleBackend {
    pub fn new() -> Self {
        Self {
            rows: vec![String::new(); SCREEN_ROWS],
            pixels: vec![false; WIDTH * HEIGHT],
        }
    }

    /// The frame as printable lines
    ///
    /// Pixel content is drawn with half blocks, two pixel rows per line.
    pub fn frame_lines(&self) -> Vec<String> {
        let border = format!("+{}+", "-".repeat(SCREEN_COLS));
        let mut lines = vec![border.clone()];

        if self.pixels.iter().any(|&p| p) {
            for y in (0..HEIGHT).step_by(2) {
                let line: String = (0..WIDTH)
                    .map(|x| match (self.pixel(x, y), self.pixel(x, y + 1)) {
                        (true, true) => '█',
                        (true, false) => '▀',
                        (false, true) => '▄',
                        (false, false) => ' ',
                    })
                    .collect();
                lines.push(line.trim_end().to_string());
            }
        } else {
            for row in &self.rows {
                lines.push(format!("|{:<width$}|", row, width = SCREEN_COLS));
            }
        }

        lines.push(border);
        lines
    }

    fn pixel(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.pixels[y * WIDTH + x]
    }
}

impl DisplayBackend for ConsoleBackend {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.rows.iter_mut().for_each(String::clear);
        self.pixels.iter_mut().for_each(|p| *p = false);
        Ok(())
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        let row = self
            .rows
            .get_mut(row as usize)
            .ok_or(DisplayError::InvalidCoordinates)?;
        let col = col as usize;
        if col >= SCREEN_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }

        let mut cells: Vec<char> = row.chars().collect();
        cells.resize(cells.len().max(col), ' ');
        cells.truncate(col);
        cells.extend(text.chars().take(SCREEN_COLS - col));
        *row = cells.into_iter().collect();
        Ok(())
    }

    fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16) -> Result<(), DisplayError> {
        let (x, y) = (x as usize, y as usize);
        if x >= WIDTH || y >= HEIGHT {
            return Err(DisplayError::InvalidCoordinates);
        }
        let x_end = (x + width as usize).min(WIDTH);
        let y_end = (y + height as usize).min(HEIGHT);
        for py in y..y_end {
            for px in x..x_end {
                self.pixels[py * WIDTH + px] = true;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        for line in self.frame_lines() {
            info!("{}", line);
        }
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }

    fn pixel_dimensions(&self) -> (u16, u16) {
        (WIDTH as u16, HEIGHT as u16)
    }

    fn is_ready(&self) -> bool {
        true
    }
}
