//! INA219 high-side current/power monitor
//!
//! 16-bit big-endian registers behind a one-byte register pointer. The
//! chip only produces current and power once the calibration register is
//! programmed, and it forgets calibration on a brown-out, so the driver
//! rewrites calibration before every measurement read.

use log::debug;
use pidash_core::power::{CalibrationProfile, RawSample};
use pidash_core::traits::{BusError, PowerMonitor};
use pidash_hal::{I2cBus, I2cBusError};

/// Register map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    Config = 0x00,
    ShuntVoltage = 0x01,
    BusVoltage = 0x02,
    Power = 0x03,
    Current = 0x04,
    Calibration = 0x05,
}

/// Bus voltage full-scale range (BRNG)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum BusVoltageRange {
    V16 = 0,
    V32 = 1,
}

/// Shunt PGA gain and range (PG)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum ShuntGain {
    Div1_40mV = 0,
    Div2_80mV = 1,
    Div4_160mV = 2,
    Div8_320mV = 3,
}

/// ADC resolution or averaging (BADC / SADC)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum AdcResolution {
    Bits9 = 0x0,
    Bits10 = 0x1,
    Bits11 = 0x2,
    Bits12 = 0x3,
    Bits12Samples2 = 0x9,
    Bits12Samples4 = 0xA,
    Bits12Samples8 = 0xB,
    Bits12Samples16 = 0xC,
    Bits12Samples32 = 0xD,
    Bits12Samples64 = 0xE,
    Bits12Samples128 = 0xF,
}

/// Operating mode (MODE)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum OperatingMode {
    PowerDown = 0,
    ShuntTriggered = 1,
    BusTriggered = 2,
    ShuntAndBusTriggered = 3,
    AdcOff = 4,
    ShuntContinuous = 5,
    BusContinuous = 6,
    ShuntAndBusContinuous = 7,
}

/// Fields of the configuration register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigRegister {
    pub bus_range: BusVoltageRange,
    pub gain: ShuntGain,
    pub bus_adc: AdcResolution,
    pub shunt_adc: AdcResolution,
    pub mode: OperatingMode,
}

impl BusVoltageRange {
    /// Smallest range covering `volts`
    pub fn covering(volts: u32) -> Self {
        if volts <= 16 {
            BusVoltageRange::V16
        } else {
            BusVoltageRange::V32
        }
    }
}

impl ShuntGain {
    /// Smallest shunt range covering `millivolts`
    pub fn covering(millivolts: u32) -> Self {
        match millivolts {
            0..=40 => ShuntGain::Div1_40mV,
            41..=80 => ShuntGain::Div2_80mV,
            81..=160 => ShuntGain::Div4_160mV,
            _ => ShuntGain::Div8_320mV,
        }
    }
}

impl ConfigRegister {
    /// Ranges from the profile, 12-bit 32-sample averaging, continuous
    pub fn for_profile(profile: &CalibrationProfile) -> Self {
        Self {
            bus_range: BusVoltageRange::covering(profile.max_bus_voltage_v),
            gain: ShuntGain::covering(profile.max_shunt_voltage_mv),
            bus_adc: AdcResolution::Bits12Samples32,
            shunt_adc: AdcResolution::Bits12Samples32,
            mode: OperatingMode::ShuntAndBusContinuous,
        }
    }

    /// Pack into the register word
    pub const fn to_word(&self) -> u16 {
        (self.bus_range as u16) << 13
            | (self.gain as u16) << 11
            | (self.bus_adc as u16) << 7
            | (self.shunt_adc as u16) << 3
            | self.mode as u16
    }
}

/// INA219 on an I2C bus
pub struct Ina219<B> {
    bus: B,
    address: u8,
    calibration: CalibrationProfile,
    config: ConfigRegister,
}

impl<B> Ina219<B>
where
    B: I2cBus,
    B::Error: Into<I2cBusError>,
{
    /// Create a driver; nothing is sent until [`PowerMonitor::initialize`]
    pub fn new(bus: B, address: u8, calibration: CalibrationProfile) -> Self {
        Self {
            bus,
            address,
            calibration,
            config: ConfigRegister::for_profile(&calibration),
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn config(&self) -> &ConfigRegister {
        &self.config
    }

    /// Write a 16-bit register, MSB first
    pub fn write_register(&mut self, reg: Register, value: u16) -> Result<(), BusError> {
        let [hi, lo] = value.to_be_bytes();
        self.bus
            .write(self.address, &[reg as u8, hi, lo])
            .map_err(BusError::sense_chip)
    }

    /// Read a 16-bit register, MSB first
    pub fn read_register(&mut self, reg: Register) -> Result<u16, BusError> {
        let mut buf = [0u8; 2];
        self.bus
            .write_read(self.address, &[reg as u8], &mut buf)
            .map_err(BusError::sense_chip)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Read back the configuration word
    pub fn read_config(&mut self) -> Result<u16, BusError> {
        self.read_register(Register::Config)
    }

    fn calibrated_read(&mut self, reg: Register) -> Result<u16, BusError> {
        self.write_register(Register::Calibration, self.calibration.calibration_value)?;
        self.read_register(reg)
    }

    /// Give the bus back
    pub fn release(self) -> B {
        self.bus
    }
}

impl<B> PowerMonitor for Ina219<B>
where
    B: I2cBus,
    B::Error: Into<I2cBusError>,
{
    fn initialize(&mut self) -> Result<CalibrationProfile, BusError> {
        let word = self.config.to_word();
        debug!(
            "INA219@{:#04x}: calibration {} config {:#06x}",
            self.address, self.calibration.calibration_value, word
        );
        self.write_register(Register::Calibration, self.calibration.calibration_value)?;
        self.write_register(Register::Config, word)?;
        Ok(self.calibration)
    }

    fn sample(&mut self) -> Result<RawSample, BusError> {
        let shunt_voltage = self.calibrated_read(Register::ShuntVoltage)?;
        let bus_voltage = self.calibrated_read(Register::BusVoltage)?;
        let power = self.calibrated_read(Register::Power)?;
        let current = self.calibrated_read(Register::Current)?;

        Ok(RawSample {
            shunt_voltage,
            bus_voltage,
            current,
            power,
        })
    }

    fn calibration(&self) -> &CalibrationProfile {
        &self.calibration
    }
}
