//! PCF8574 8-bit quasi-bidirectional port
//!
//! The chip has no direction register: a pin reads as an input only
//! while its latch bit is high, and a read returns pin levels rather
//! than the latch. Every write is therefore built from a fresh read and
//! keeps the key inputs released.

use log::trace;
use pidash_core::state::ButtonEvent;
use pidash_core::traits::{AlarmOutput, BusError, ButtonInput};
use pidash_hal::{I2cBus, I2cBusError};

/// Pin assignments on the hat
pub mod pins {
    pub const LEFT: u8 = 0x01;
    pub const UP: u8 = 0x02;
    pub const DOWN: u8 = 0x04;
    pub const RIGHT: u8 = 0x08;
    /// All four key inputs
    pub const KEYS: u8 = 0x0F;
    pub const LED: u8 = 0x10;
    pub const BUZZER: u8 = 0x80;
    /// Bits forced high when sampling the keys
    pub const NON_KEYS: u8 = 0xF0;
}

/// Decode a port byte into the pressed key
///
/// Keys pull their pin low. With several keys down, the lowest pin wins.
pub fn classify(port: u8) -> ButtonEvent {
    let value = port | pins::NON_KEYS;
    if value & pins::LEFT == 0 {
        ButtonEvent::Left
    } else if value & pins::UP == 0 {
        ButtonEvent::Up
    } else if value & pins::DOWN == 0 {
        ButtonEvent::Down
    } else if value & pins::RIGHT == 0 {
        ButtonEvent::Right
    } else {
        ButtonEvent::None
    }
}

/// PCF8574 on an I2C bus
pub struct Pcf8574<B> {
    bus: B,
    address: u8,
}

impl<B> Pcf8574<B>
where
    B: I2cBus,
    B::Error: Into<I2cBusError>,
{
    pub fn new(bus: B, address: u8) -> Self {
        Self { bus, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Read the current pin levels
    pub fn read_port(&mut self) -> Result<u8, BusError> {
        let mut buf = [0u8; 1];
        self.bus
            .read(self.address, &mut buf)
            .map_err(BusError::port_expander)?;
        Ok(buf[0])
    }

    /// Write the output latch
    pub fn write_port(&mut self, value: u8) -> Result<(), BusError> {
        self.bus
            .write(self.address, &[value])
            .map_err(BusError::port_expander)
    }

    /// Read-modify-write; key inputs stay released
    pub fn update(&mut self, f: impl FnOnce(u8) -> u8) -> Result<u8, BusError> {
        let current = self.read_port()?;
        let next = f(current) | pins::KEYS;
        trace!("PCF8574@{:#04x}: {:#04x} -> {:#04x}", self.address, current, next);
        self.write_port(next)?;
        Ok(next)
    }

    fn drive_low_when(&mut self, mask: u8, on: bool) -> Result<(), BusError> {
        self.update(|v| if on { v & !mask } else { v | mask })
            .map(|_| ())
    }

    pub fn release(self) -> B {
        self.bus
    }
}

impl<B> ButtonInput for Pcf8574<B>
where
    B: I2cBus,
    B::Error: Into<I2cBusError>,
{
    fn poll(&mut self) -> Result<ButtonEvent, BusError> {
        self.update(|v| v)?;
        let value = self.read_port()?;
        Ok(classify(value))
    }
}

impl<B> AlarmOutput for Pcf8574<B>
where
    B: I2cBus,
    B::Error: Into<I2cBusError>,
{
    fn set_buzzer(&mut self, on: bool) -> Result<(), BusError> {
        self.drive_low_when(pins::BUZZER, on)
    }

    fn set_led(&mut self, on: bool) -> Result<(), BusError> {
        self.drive_low_when(pins::LED, on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Op, PortBus};
    use pidash_core::traits::Device;
    use std::vec;

    const ADDR: u8 = 0x20;

    fn port(latch: u8) -> Pcf8574<PortBus> {
        Pcf8574::new(PortBus::new(latch), ADDR)
    }

    #[test]
    fn test_classify_each_key() {
        assert_eq!(classify(0xFF), ButtonEvent::None);
        assert_eq!(classify(0xFE), ButtonEvent::Left);
        assert_eq!(classify(0xFD), ButtonEvent::Up);
        assert_eq!(classify(0xFB), ButtonEvent::Down);
        assert_eq!(classify(0xF7), ButtonEvent::Right);
    }

    #[test]
    fn test_classify_ignores_upper_nibble() {
        assert_eq!(classify(0x0F), ButtonEvent::None);
        assert_eq!(classify(0x6F), ButtonEvent::None);
        assert_eq!(classify(0x7D), ButtonEvent::Up);
    }

    #[test]
    fn test_classify_precedence() {
        // Left and Right together
        assert_eq!(classify(0xF6), ButtonEvent::Left);
        // Up and Down together
        assert_eq!(classify(0xF9), ButtonEvent::Up);
        assert_eq!(classify(0xF0), ButtonEvent::Left);
    }

    #[test]
    fn test_poll_releases_keys_then_samples() {
        let mut dev = port(0xFF);
        assert_eq!(dev.poll().unwrap(), ButtonEvent::None);

        let bus = dev.release();
        assert_eq!(
            bus.log,
            vec![
                Op::Read(ADDR, 1),
                Op::Write(ADDR, vec![0xFF]),
                Op::Read(ADDR, 1),
            ]
        );
    }

    #[test]
    fn test_poll_reports_grounded_key() {
        let mut dev = port(0xFF);
        let mut bus = dev.release();
        bus.grounded = pins::DOWN;
        dev = Pcf8574::new(bus, ADDR);
        assert_eq!(dev.poll().unwrap(), ButtonEvent::Down);
    }

    #[test]
    fn test_poll_preserves_alarm_bits() {
        // Buzzer and LED currently on (low)
        let mut dev = port(0x6F);
        dev.poll().unwrap();
        let bus = dev.release();
        assert_eq!(bus.writes(), vec![0x6F]);
        assert_eq!(bus.latch, 0x6F);
    }

    #[test]
    fn test_buzzer_and_led_are_active_low() {
        let mut dev = port(0xFF);
        dev.set_buzzer(true).unwrap();
        dev.set_led(true).unwrap();
        dev.set_buzzer(false).unwrap();
        dev.set_led(false).unwrap();

        let bus = dev.release();
        assert_eq!(bus.writes(), vec![0x7F, 0x6F, 0xEF, 0xFF]);
    }

    #[test]
    fn test_alarm_write_does_not_latch_pressed_key_low() {
        let mut bus = PortBus::new(0xFF);
        bus.grounded = pins::RIGHT;
        let mut dev = Pcf8574::new(bus, ADDR);
        dev.set_led(true).unwrap();

        let bus = dev.release();
        assert_eq!(bus.latch, 0xEF);
    }

    #[test]
    fn test_errors_are_tagged_with_expander() {
        let mut bus = PortBus::new(0xFF);
        bus.fail = Some(I2cBusError::Nack);
        let mut dev = Pcf8574::new(bus, ADDR);

        let err = dev.poll().unwrap_err();
        assert_eq!(err.device, Device::PortExpander);
        assert_eq!(err.kind, I2cBusError::Nack);
        assert!(dev.set_buzzer(true).is_err());
    }
}
