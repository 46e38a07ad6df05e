//! Screen buffer
//!
//! Character rows for a 128x64 panel with a 6x10 font, plus an optional
//! QR code that replaces the text.

use heapless::String;

use crate::qr::QrMatrix;

/// Number of character rows (64 px / 10 px)
pub const SCREEN_ROWS: usize = 6;

/// Number of character columns (128 px / 6 px)
pub const SCREEN_COLS: usize = 21;

/// What the panel should be showing
///
/// Setters only mark the screen dirty when the content actually changes,
/// so re-showing the same page does not touch the display.
#[derive(Clone, PartialEq)]
pub struct Screen {
    lines: [String<SCREEN_COLS>; SCREEN_ROWS],
    qr: Option<QrMatrix>,
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Create a new empty screen
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
            qr: None,
            dirty: true,
        }
    }

    /// Clear text and QR
    pub fn clear(&mut self) {
        for row in 0..SCREEN_ROWS {
            self.set_line(row, "");
        }
        self.set_qr(None);
    }

    /// Set the content of a row, cut at [`SCREEN_COLS`] characters
    pub fn set_line(&mut self, row: usize, text: &str) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };

        let mut next: String<SCREEN_COLS> = String::new();
        for c in text.chars() {
            if next.push(c).is_err() {
                break;
            }
        }

        if *line != next {
            *line = next;
            self.dirty = true;
        }
    }

    /// Get the content of a row
    pub fn get_line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    pub fn set_qr(&mut self, qr: Option<QrMatrix>) {
        if self.qr != qr {
            self.qr = qr;
            self.dirty = true;
        }
    }

    pub fn qr(&self) -> Option<&QrMatrix> {
        self.qr.as_ref()
    }

    /// Check if screen needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark screen as clean (after rendering)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Force the next render to redraw
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Rows with their index, skipping empty ones
    pub fn rows(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, l)| !l.is_empty())
            .map(|(i, l)| (i, l.as_str()))
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", line.as_str());
        }
        defmt::write!(f, "]");
    }
}
