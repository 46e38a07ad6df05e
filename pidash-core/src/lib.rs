//! Board-agnostic core logic for the status panel
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware-facing traits (power monitor, buttons, alarm outputs, page sink)
//! - Power-monitor calibration and raw-code to physical-unit conversion
//! - Page navigation state machine
//! - Low-battery shutdown guard
//! - The panel cycle that ties them together
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod panel;
pub mod power;
pub mod safety;
pub mod state;
pub mod traits;

#[cfg(test)]
pub(crate) mod mock;
