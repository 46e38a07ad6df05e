//! Configuration type definitions
//!
//! Defaults reproduce the stock Waveshare UPS hat wiring: INA219 at 0x42
//! with a 0.1 Ω shunt, PCF8574 joystick expander at 0x20, two Li-ion
//! cells in series.

use heapless::String;

use crate::power::{BatteryRange, CalibrationError, CalibrationProfile};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum connect URL length
pub const MAX_URL_LEN: usize = 64;

/// Upper bound on alarm cycles accepted from config
pub const MAX_ALARM_CYCLES: u8 = 20;

/// Power monitor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SenseChipConfig {
    /// 7-bit I2C address
    pub address: u8,
    /// Shunt resistance (mΩ)
    pub shunt_milliohms: u32,
    /// Current register LSB (µA)
    pub current_lsb_ua: u32,
    /// Largest current the board is expected to draw (mA)
    pub max_expected_current_ma: u32,
    /// Bus voltage full scale (V)
    pub max_bus_voltage_v: u32,
    /// Shunt voltage full scale (mV)
    pub max_shunt_voltage_mv: u32,
}

impl Default for SenseChipConfig {
    fn default() -> Self {
        Self {
            address: 0x42,
            shunt_milliohms: 100,
            current_lsb_ua: 100,
            max_expected_current_ma: 2_000,
            max_bus_voltage_v: 32,
            max_shunt_voltage_mv: 320,
        }
    }
}

impl SenseChipConfig {
    /// Derive the calibration profile for this configuration
    pub fn calibration(&self) -> Result<CalibrationProfile, CalibrationError> {
        CalibrationProfile::derive(
            self.shunt_milliohms,
            self.current_lsb_ua,
            self.max_expected_current_ma,
            self.max_bus_voltage_v,
            self.max_shunt_voltage_mv,
        )
    }
}

/// Port expander configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExpanderConfig {
    /// 7-bit I2C address
    pub address: u8,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self { address: 0x20 }
    }
}

/// Loop timing (all values in milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// How long the home page stays up before inputs are checked
    pub home_refresh_ms: u32,
    /// How long a directional page is held before the port is re-read
    pub dwell_ms: u32,
    /// Pause after each re-read while a directional input stays held
    pub release_poll_ms: u32,
    /// How long the QR page is held before the center key is re-read
    pub qr_dwell_ms: u32,
    /// Longest a held input may keep the panel away from the home cycle
    pub max_hold_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            home_refresh_ms: 600,
            dwell_ms: 6_000,
            release_poll_ms: 100,
            qr_dwell_ms: 6_000,
            max_hold_ms: 60_000,
        }
    }
}

/// Low-battery shutdown configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ShutdownConfig {
    /// Battery percentage below which a discharging panel shuts down
    pub threshold_percent: f32,
    /// Number of buzzer/LED on-off cycles
    pub alarm_cycles: u8,
    /// On time per alarm cycle
    pub alarm_on_ms: u32,
    /// Off time per alarm cycle
    pub alarm_off_ms: u32,
    /// How long the warning stays visible before power-off
    pub settle_ms: u32,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            threshold_percent: 10.0,
            alarm_cycles: 5,
            alarm_on_ms: 500,
            alarm_off_ms: 500,
            settle_ms: 6_000,
        }
    }
}

/// QR connect page configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConnectConfig {
    /// URL encoded into the QR code
    pub url: String<MAX_URL_LEN>,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        let mut url = String::new();
        let _ = url.push_str("ssh://pi@192.168.81.99");
        Self { url }
    }
}

/// Complete panel configuration
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PanelConfig {
    pub sense_chip: SenseChipConfig,
    pub expander: ExpanderConfig,
    pub battery: BatteryRange,
    pub timing: TimingConfig,
    pub shutdown: ShutdownConfig,
    pub connect: ConnectConfig,
}

/// Semantic configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigValidationError {
    /// Calibration cannot be derived from the sense chip settings
    Calibration(CalibrationError),
    /// Sense chip and expander share an address
    AddressConflict,
    /// Address outside the 7-bit range
    InvalidAddress,
    /// Battery full voltage not above empty voltage
    BatteryRange,
    /// Refresh, dwell, poll or hold interval of zero
    ZeroInterval,
    /// Threshold outside 0-100 %
    Threshold,
    /// Alarm cycle count above the supported maximum
    AlarmCycles,
    /// Connect URL is empty
    EmptyUrl,
}

impl From<CalibrationError> for ConfigValidationError {
    fn from(e: CalibrationError) -> Self {
        ConfigValidationError::Calibration(e)
    }
}

impl PanelConfig {
    /// Check the configuration for values the panel cannot run with
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.sense_chip.calibration()?;

        if self.sense_chip.address > 0x7F || self.expander.address > 0x7F {
            return Err(ConfigValidationError::InvalidAddress);
        }
        if self.sense_chip.address == self.expander.address {
            return Err(ConfigValidationError::AddressConflict);
        }
        if !self.battery.is_valid() {
            return Err(ConfigValidationError::BatteryRange);
        }

        let t = &self.timing;
        if t.home_refresh_ms == 0
            || t.dwell_ms == 0
            || t.release_poll_ms == 0
            || t.qr_dwell_ms == 0
            || t.max_hold_ms == 0
        {
            return Err(ConfigValidationError::ZeroInterval);
        }

        let threshold = self.shutdown.threshold_percent;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ConfigValidationError::Threshold);
        }
        if self.shutdown.alarm_cycles > MAX_ALARM_CYCLES {
            return Err(ConfigValidationError::AlarmCycles);
        }
        if self.connect.url.is_empty() {
            return Err(ConfigValidationError::EmptyUrl);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PanelConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.sense_chip.address, 0x42);
        assert_eq!(config.expander.address, 0x20);
        assert_eq!(
            config.sense_chip.calibration().unwrap().calibration_value,
            4096
        );
    }

    #[test]
    fn test_address_conflict() {
        let mut config = PanelConfig::default();
        config.expander.address = 0x42;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::AddressConflict)
        );
    }

    #[test]
    fn test_invalid_address() {
        let mut config = PanelConfig::default();
        config.sense_chip.address = 0x90;
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidAddress));
    }

    #[test]
    fn test_bad_battery_range() {
        let mut config = PanelConfig::default();
        config.battery.full_v = 5.0;
        assert_eq!(config.validate(), Err(ConfigValidationError::BatteryRange));
    }

    #[test]
    fn test_zero_interval() {
        let mut config = PanelConfig::default();
        config.timing.release_poll_ms = 0;
        assert_eq!(config.validate(), Err(ConfigValidationError::ZeroInterval));
    }

    #[test]
    fn test_zero_home_refresh() {
        let mut config = PanelConfig::default();
        config.timing.home_refresh_ms = 0;
        assert_eq!(config.validate(), Err(ConfigValidationError::ZeroInterval));
    }

    #[test]
    fn test_zero_max_hold() {
        let mut config = PanelConfig::default();
        config.timing.max_hold_ms = 0;
        assert_eq!(config.validate(), Err(ConfigValidationError::ZeroInterval));
    }

    #[test]
    fn test_threshold_range() {
        let mut config = PanelConfig::default();
        config.shutdown.threshold_percent = 120.0;
        assert_eq!(config.validate(), Err(ConfigValidationError::Threshold));

        config.shutdown.threshold_percent = f32::NAN;
        assert_eq!(config.validate(), Err(ConfigValidationError::Threshold));
    }

    #[test]
    fn test_calibration_error_propagates() {
        let mut config = PanelConfig::default();
        config.sense_chip.shunt_milliohms = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::Calibration(CalibrationError::ZeroShunt))
        );
    }

    #[test]
    fn test_empty_url() {
        let mut config = PanelConfig::default();
        config.connect.url.clear();
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyUrl));
    }
}
