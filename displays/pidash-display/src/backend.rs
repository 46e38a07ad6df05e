//! Display backend trait
//!
//! Defines the interface the renderer draws through.

use pidash_core::traits::RenderError;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
    /// Display not initialized
    NotInitialized,
}

impl From<DisplayError> for RenderError {
    fn from(e: DisplayError) -> Self {
        match e {
            DisplayError::Communication => RenderError::Communication,
            DisplayError::NotInitialized => RenderError::NotReady,
            DisplayError::InvalidCoordinates => RenderError::Layout,
        }
    }
}

/// Display backend trait
///
/// Text is addressed in character cells, fills in pixels. Drawing goes
/// to a frame buffer until [`flush`](DisplayBackend::flush).
pub trait DisplayBackend {
    /// Clear the frame buffer
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw text at the specified row and column
    ///
    /// - `row`: Row number (0-based)
    /// - `col`: Column number in characters (0-based)
    /// - `text`: Text to display
    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError>;

    /// Light a rectangle of pixels
    fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16) -> Result<(), DisplayError>;

    /// Send the frame buffer to the hardware
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Get the display dimensions
    ///
    /// Returns (columns, rows) in character units
    fn dimensions(&self) -> (u8, u8);

    /// Get pixel dimensions as (width, height)
    fn pixel_dimensions(&self) -> (u16, u16);

    /// Check if the display is ready
    fn is_ready(&self) -> bool;
}
