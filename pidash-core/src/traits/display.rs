//! Page rendering trait

use crate::panel::PageContent;

/// Errors a page sink can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// Transport to the display failed
    Communication,
    /// Display not initialized
    NotReady,
    /// Content could not be laid out (e.g. QR payload too long)
    Layout,
}

/// Something that can put a page on the screen
///
/// The panel only supplies structured content; fonts, coordinates and
/// the transport are the sink's business.
pub trait PageSink {
    fn show(&mut self, content: &PageContent) -> Result<(), RenderError>;
}
