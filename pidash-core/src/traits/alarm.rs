//! Alarm output trait

use super::sensor::BusError;

/// Buzzer and LED enables on the port expander
///
/// Each call must re-read the port before writing so the other bits
/// on the same byte are preserved.
pub trait AlarmOutput {
    /// Switch the buzzer on or off
    fn set_buzzer(&mut self, on: bool) -> Result<(), BusError>;

    /// Switch the LED on or off
    fn set_led(&mut self, on: bool) -> Result<(), BusError>;
}
