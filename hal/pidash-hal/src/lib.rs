//! pidash Hardware Abstraction Layer
//!
//! This crate defines the small set of hardware traits the panel needs.
//! Drivers in `pidash-drivers` are generic over these traits, so the same
//! code runs against `/dev/i2c-N` on the board and against mock buses in
//! host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  pidash-daemon / pidash-drivers         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pidash-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ pidash-hal-   │       │  test mocks   │
//! │    linux      │       │               │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputPin`] - Digital input
//! - [`i2c::I2cBus`] - I2C bus operations

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;

pub use gpio::InputPin;
pub use i2c::{I2cBus, I2cBusError};
