//! Display abstraction and page renderer for pidash
//!
//! This crate provides:
//! - `DisplayBackend` trait for character-cell displays with pixel fill
//! - `Screen`, a text buffer that only redraws when its content changes
//! - `QrMatrix`, an allocation-free QR encoding of the connect URL
//! - `Renderer`, which lays out `PageContent` and implements `PageSink`
//!
//! # Architecture
//!
//! The panel hands the renderer structured page content. The renderer
//! turns it into text rows (or a QR code) and pushes the result to a
//! backend. The daemon supplies the backend: an SSD1306 OLED on SPI, or
//! a console backend that writes frames to the log.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod backend;
pub mod qr;
pub mod renderer;
pub mod screen;

pub use backend::{DisplayBackend, DisplayError};
pub use qr::{QrError, QrMatrix, MAX_QR_SIZE};
pub use renderer::Renderer;
pub use screen::{Screen, SCREEN_COLS, SCREEN_ROWS};
