//! Display backends for the daemon

pub mod console;
pub mod oled;

pub use console::ConsoleBackend;
pub use oled::OledBackend;

use pidash_display::{DisplayBackend, DisplayError};

/// The backend selected in the configuration
pub enum PanelDisplay {
    Oled(OledBackend),
    Console(ConsoleBackend),
}

macro_rules! delegate {
    ($self:ident, $b:ident => $call:expr) => {
        match $self {
            PanelDisplay::Oled($b) => $call,
            PanelDisplay::Console($b) => $call,
        }
    };
}

impl DisplayBackend for PanelDisplay {
    fn clear(&mut self) -> Result<(), DisplayError> {
        delegate!(self, b => b.clear())
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        delegate!(self, b => b.draw_text(row, col, text))
    }

    fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16) -> Result<(), DisplayError> {
        delegate!(self, b => b.fill_rect(x, y, width, height))
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        delegate!(self, b => b.flush())
    }

    fn dimensions(&self) -> (u8, u8) {
        delegate!(self, b => b.dimensions())
    }

    fn pixel_dimensions(&self) -> (u16, u16) {
        delegate!(self, b => b.pixel_dimensions())
    }

    fn is_ready(&self) -> bool {
        delegate!(self, b => b.is_ready())
    }
}
