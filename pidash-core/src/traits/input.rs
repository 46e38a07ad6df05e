//! Button input traits

use pidash_hal::InputPin;

use super::sensor::BusError;
use crate::state::ButtonEvent;

/// Directional inputs behind the port expander
pub trait ButtonInput {
    /// Read the port once and classify the asserted input
    fn poll(&mut self) -> Result<ButtonEvent, BusError>;
}

/// The joystick center key
pub trait CenterButton {
    /// Check if the key is currently held
    fn is_pressed(&mut self) -> bool;
}

/// Center key wired to a pulled-up GPIO; pressing shorts it to ground
pub struct ActiveLow<P> {
    pin: P,
}

impl<P: InputPin> ActiveLow<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Release the underlying pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: InputPin> CenterButton for ActiveLow<P> {
    fn is_pressed(&mut self) -> bool {
        self.pin.is_low()
    }
}
