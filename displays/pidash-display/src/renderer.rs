//! Page rendering
//!
//! Lays out page content on the 21x6 character panel:
//!
//! ```text
//! row 0  title
//! row 1  Label: value
//! ...
//! ```
//!
//! The connect page is drawn as a centered QR code with no text.

use core::fmt::Write;

use heapless::String;
use log::{debug, warn};
use pidash_core::panel::{Body, PageContent};
use pidash_core::traits::{PageSink, RenderError};

use crate::backend::{DisplayBackend, DisplayError};
use crate::qr::QrMatrix;
use crate::screen::{Screen, SCREEN_ROWS};

/// Room for a full "label: value" pair before it is cut to the panel width
const ROW_BUF_LEN: usize = 40;

/// Page renderer over a display backend
pub struct Renderer<B> {
    backend: B,
    screen: Screen,
}

impl<B: DisplayBackend> Renderer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            screen: Screen::new(),
        }
    }

    /// Get the current screen buffer
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_inner(self) -> B {
        self.backend
    }

    /// Lay out page content into the screen buffer
    pub fn compose(&mut self, content: &PageContent) -> Result<(), RenderError> {
        match &content.body {
            Body::Qr(payload) => {
                let qr = QrMatrix::encode(payload).map_err(|e| {
                    warn!("Cannot encode connect code: {}", e);
                    RenderError::Layout
                })?;
                self.clear_from(0);
                self.screen.set_qr(Some(qr));
            }
            Body::Fields(fields) => {
                self.screen.set_qr(None);
                self.screen.set_line(0, &content.title);
                let mut row = 1;
                for field in fields {
                    let mut line: String<ROW_BUF_LEN> = String::new();
                    let _ = write_to_string(
                        &mut line,
                        format_args!("{}: {}", field.label, field.value),
                    );
                    self.screen.set_line(row, &line);
                    row += 1;
                }
                self.clear_from(row);
            }
            Body::Lines(lines) => {
                self.screen.set_qr(None);
                self.screen.set_line(0, &content.title);
                let mut row = 1;
                for line in lines {
                    self.screen.set_line(row, line);
                    row += 1;
                }
                self.clear_from(row);
            }
        }
        Ok(())
    }

    /// Push the screen buffer to the backend if it changed
    pub fn render(&mut self) -> Result<(), DisplayError> {
        if !self.backend.is_ready() {
            return Err(DisplayError::NotInitialized);
        }
        if !self.screen.is_dirty() {
            return Ok(());
        }

        let result = self.draw();
        match result {
            Ok(()) => self.screen.mark_clean(),
            // Retry the whole frame next time
            Err(_) => self.screen.mark_dirty(),
        }
        result
    }

    fn draw(&mut self) -> Result<(), DisplayError> {
        self.backend.clear()?;

        if let Some(qr) = self.screen.qr() {
            let (width, height) = self.backend.pixel_dimensions();
            let scale = qr.scale_for(width, height);
            if scale == 0 {
                return Err(DisplayError::InvalidCoordinates);
            }
            let side = qr.size() as u16 * scale;
            let x0 = (width - side) / 2;
            let y0 = (height - side) / 2;

            for y in 0..qr.size() {
                for x in 0..qr.size() {
                    if qr.is_dark(x, y) {
                        self.backend.fill_rect(
                            x0 + x as u16 * scale,
                            y0 + y as u16 * scale,
                            scale,
                            scale,
                        )?;
                    }
                }
            }
        } else {
            let (_, rows) = self.backend.dimensions();
            for (row, text) in self.screen.rows() {
                if row >= rows as usize {
                    break;
                }
                self.backend.draw_text(row as u8, 0, text)?;
            }
        }

        self.backend.flush()
    }

    fn clear_from(&mut self, first: usize) {
        for row in first..SCREEN_ROWS {
            self.screen.set_line(row, "");
        }
    }
}

impl<B: DisplayBackend> PageSink for Renderer<B> {
    fn show(&mut self, content: &PageContent) -> Result<(), RenderError> {
        debug!("Showing {}", content.title.as_str());
        self.compose(content)?;
        self.render()?;
        Ok(())
    }
}

fn write_to_string<const N: usize>(
    s: &mut String<N>,
    args: core::fmt::Arguments<'_>,
) -> core::fmt::Result {
    s.write_fmt(args)
}
