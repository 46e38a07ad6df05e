//! Port expander drivers
//!
//! The hat's PCF8574 carries the four directional keys on P0..P3, the
//! status LED on P4 and the buzzer on P7. All of them are active-low.

pub mod pcf8574;

pub use pcf8574::{classify, pins, Pcf8574};
