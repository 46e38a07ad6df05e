//! QR code encoding
//!
//! Encodes into fixed buffers sized for the largest version that still
//! scans reliably from a 64 px tall panel.

use core::fmt;

use qrcodegen_no_heap::{QrCode, QrCodeEcc, Version};

/// Largest QR version the panel will draw
pub const MAX_QR_VERSION: u8 = 4;

/// Modules per side at [`MAX_QR_VERSION`]
pub const MAX_QR_SIZE: usize = MAX_QR_VERSION as usize * 4 + 17;

const ENCODE_BUF_LEN: usize = Version::new(MAX_QR_VERSION).buffer_len();
const MODULE_BYTES: usize = (MAX_QR_SIZE * MAX_QR_SIZE + 7) / 8;

/// QR encoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QrError {
    /// Nothing to encode
    Empty,
    /// Payload needs a version above [`MAX_QR_VERSION`]
    TooLong,
}

impl fmt::Display for QrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QrError::Empty => write!(f, "empty QR payload"),
            QrError::TooLong => write!(f, "QR payload exceeds version {}", MAX_QR_VERSION),
        }
    }
}

/// An encoded QR code, one bit per module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    size: u8,
    modules: [u8; MODULE_BYTES],
}

impl QrMatrix {
    /// Encode text at low error correction, boosted when it fits
    pub fn encode(text: &str) -> Result<Self, QrError> {
        if text.is_empty() {
            return Err(QrError::Empty);
        }

        let mut tempbuffer = [0u8; ENCODE_BUF_LEN];
        let mut outbuffer = [0u8; ENCODE_BUF_LEN];
        let code = QrCode::encode_text(
            text,
            &mut tempbuffer,
            &mut outbuffer,
            QrCodeEcc::Low,
            Version::MIN,
            Version::new(MAX_QR_VERSION),
            None,
            true,
        )
        .map_err(|_| QrError::TooLong)?;

        let size = code.size();
        let mut modules = [0u8; MODULE_BYTES];
        for y in 0..size {
            for x in 0..size {
                if code.get_module(x, y) {
                    let i = (y * size + x) as usize;
                    modules[i / 8] |= 1 << (i % 8);
                }
            }
        }

        Ok(Self {
            size: size as u8,
            modules,
        })
    }

    /// Modules per side
    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Check if a module is dark; out of range is light
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        let size = self.size();
        if x >= size || y >= size {
            return false;
        }
        let i = y * size + x;
        self.modules[i / 8] & (1 << (i % 8)) != 0
    }

    /// Largest whole-pixel module size that fits the area
    pub fn scale_for(&self, width: u16, height: u16) -> u16 {
        let size = self.size as u16;
        if size == 0 {
            return 0;
        }
        (width / size).min(height / size)
    }
}
