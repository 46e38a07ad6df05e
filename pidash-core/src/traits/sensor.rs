//! Power monitor trait and bus error type

use core::fmt;

use pidash_hal::I2cBusError;

use crate::power::{BatteryRange, CalibrationProfile, PowerReading, RawSample};

/// Which peripheral a bus failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Device {
    /// INA219 power monitor
    SenseChip,
    /// PCF8574 port expander
    PortExpander,
}

/// A failed bus transaction with the peripheral it was addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusError {
    pub device: Device,
    pub kind: I2cBusError,
}

impl BusError {
    pub fn sense_chip(kind: impl Into<I2cBusError>) -> Self {
        Self {
            device: Device::SenseChip,
            kind: kind.into(),
        }
    }

    pub fn port_expander(kind: impl Into<I2cBusError>) -> Self {
        Self {
            device: Device::PortExpander,
            kind: kind.into(),
        }
    }
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let device = match self.device {
            Device::SenseChip => "sense chip",
            Device::PortExpander => "port expander",
        };
        write!(f, "{}: {}", device, self.kind)
    }
}

/// Trait for the power-monitoring sense chip
pub trait PowerMonitor {
    /// Program calibration and configuration registers
    ///
    /// Returns the profile that was programmed. Safe to call again after
    /// a bus fault.
    fn initialize(&mut self) -> Result<CalibrationProfile, BusError>;

    /// Read the four measurement registers
    fn sample(&mut self) -> Result<RawSample, BusError>;

    /// The calibration this monitor was programmed with
    fn calibration(&self) -> &CalibrationProfile;

    /// Sample and convert to physical units
    fn read(&mut self, battery: &BatteryRange) -> Result<PowerReading, BusError> {
        let raw = self.sample()?;
        Ok(PowerReading::from_raw(&raw, self.calibration(), battery))
    }
}
