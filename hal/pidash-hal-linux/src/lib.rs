//! Linux HAL for pidash
//!
//! Implements the `pidash-hal` traits on top of `linux-embedded-hal`:
//!
//! - I2C through `/dev/i2c-N` ([`i2c::LinuxI2c`])
//! - Input lines through the gpio character device ([`gpio::LinuxInputPin`])
//! - Blocking delays ([`Delay`], re-exported)

#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;

pub use gpio::LinuxInputPin;
pub use i2c::LinuxI2c;
pub use linux_embedded_hal::Delay;
