//! I2C peripheral drivers
//!
//! This crate provides concrete implementations of the traits defined
//! in pidash-core for the UPS/joystick hat:
//!
//! - INA219 power monitor ([`sensor::Ina219`])
//! - PCF8574 port expander carrying the joystick, buzzer and LED
//!   ([`expander::Pcf8574`])

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod expander;
pub mod sensor;

#[cfg(test)]
pub(crate) mod mock;
