//! Calibration profile for the INA219-family sense chip
//!
//! The chip computes current and power internally once the calibration
//! register holds `trunc(0.04096 / (current_lsb * r_shunt))`. Everything is
//! kept in integer micro/milli units so the truncation is exact.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Numerator of the calibration equation scaled for µA and mΩ inputs
///
/// `0.04096 / (lsb_ua * 1e-6 * shunt_mohm * 1e-3) = 40_960_000 / (lsb_ua * shunt_mohm)`
const CAL_NUMERATOR: u64 = 40_960_000;

/// Power register LSB is a fixed multiple of the current LSB
const POWER_LSB_FACTOR: u32 = 20;

/// Largest magnitude the signed current register can hold
const CURRENT_CODE_MAX: u32 = 32_767;

/// Bus voltage full-scale settings the chip offers (V)
pub const BUS_RANGES_V: [u32; 2] = [16, 32];

/// Shunt voltage full-scale settings the chip offers (mV)
pub const SHUNT_RANGES_MV: [u32; 4] = [40, 80, 160, 320];

/// Reasons a calibration cannot be derived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    /// Shunt resistance must be non-zero
    ZeroShunt,
    /// Current LSB must be non-zero
    ZeroCurrentLsb,
    /// Derived calibration word is zero or does not fit the 16-bit register
    RegisterOverflow,
    /// The signed current register cannot represent the expected maximum
    CurrentOutOfRange,
    /// Bus voltage full scale is not one the chip offers
    BusRange,
    /// Shunt voltage full scale is not one the chip offers
    ShuntRange,
    /// Expected current drops more across the shunt than its full scale
    ShuntRangeExceeded,
}

/// Immutable constants derived once when the driver is constructed
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationProfile {
    /// Shunt resistance (mΩ)
    pub shunt_milliohms: u32,
    /// Maximum expected current (mA)
    pub max_expected_current_ma: u32,
    /// Bus voltage full scale (V), 16 or 32
    pub max_bus_voltage_v: u32,
    /// Shunt voltage full scale (mV), 40, 80, 160 or 320
    pub max_shunt_voltage_mv: u32,
    /// Current register LSB (µA per code)
    pub current_lsb_ua: u32,
    /// Current register LSB (mA per code)
    pub current_lsb_ma: f32,
    /// Power register LSB (W per code)
    pub power_lsb_w: f32,
    /// Value programmed into the calibration register
    pub calibration_value: u16,
}

impl CalibrationProfile {
    /// 32 V bus, 2 A expected, 0.1 Ω shunt, 0.1 mA current LSB
    pub const RANGE_32V_2A: Self = Self {
        shunt_milliohms: 100,
        max_expected_current_ma: 2_000,
        max_bus_voltage_v: 32,
        max_shunt_voltage_mv: 320,
        current_lsb_ua: 100,
        current_lsb_ma: 0.1,
        power_lsb_w: 0.002,
        calibration_value: 4096,
    };

    /// Derive a profile from the shunt value, the chosen current LSB and
    /// the full-scale ranges
    pub fn derive(
        shunt_milliohms: u32,
        current_lsb_ua: u32,
        max_expected_current_ma: u32,
        max_bus_voltage_v: u32,
        max_shunt_voltage_mv: u32,
    ) -> Result<Self, CalibrationError> {
        if !BUS_RANGES_V.contains(&max_bus_voltage_v) {
            return Err(CalibrationError::BusRange);
        }
        if !SHUNT_RANGES_MV.contains(&max_shunt_voltage_mv) {
            return Err(CalibrationError::ShuntRange);
        }
        if shunt_milliohms == 0 {
            return Err(CalibrationError::ZeroShunt);
        }
        if current_lsb_ua == 0 {
            return Err(CalibrationError::ZeroCurrentLsb);
        }

        let cal = CAL_NUMERATOR / (current_lsb_ua as u64 * shunt_milliohms as u64);
        if cal == 0 || cal > u16::MAX as u64 {
            return Err(CalibrationError::RegisterOverflow);
        }

        // Full-scale current in µA must cover the expected maximum
        let full_scale_ua = current_lsb_ua as u64 * CURRENT_CODE_MAX as u64;
        if full_scale_ua < max_expected_current_ma as u64 * 1000 {
            return Err(CalibrationError::CurrentOutOfRange);
        }

        // mA * mΩ = µV
        let shunt_drop_uv = max_expected_current_ma as u64 * shunt_milliohms as u64;
        if shunt_drop_uv > max_shunt_voltage_mv as u64 * 1000 {
            return Err(CalibrationError::ShuntRangeExceeded);
        }

        Ok(Self {
            shunt_milliohms,
            max_expected_current_ma,
            max_bus_voltage_v,
            max_shunt_voltage_mv,
            current_lsb_ua,
            current_lsb_ma: current_lsb_ua as f32 / 1000.0,
            power_lsb_w: (current_lsb_ua * POWER_LSB_FACTOR) as f32 / 1_000_000.0,
            calibration_value: cal as u16,
        })
    }
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self::RANGE_32V_2A
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_32v_2a_profile_derivation() {
        let profile = CalibrationProfile::derive(100, 100, 2_000, 32, 320).unwrap();
        assert_eq!(profile.calibration_value, 4096);
        assert_eq!(profile, CalibrationProfile::RANGE_32V_2A);
    }

    #[test]
    fn test_calibration_truncates() {
        // 40_960_000 / (150 * 100) = 2730.66..
        let profile = CalibrationProfile::derive(100, 150, 2_000, 32, 320).unwrap();
        assert_eq!(profile.calibration_value, 2730);
    }

    #[test]
    fn test_rejects_zero_inputs() {
        assert_eq!(
            CalibrationProfile::derive(0, 100, 2_000, 32, 320),
            Err(CalibrationError::ZeroShunt)
        );
        assert_eq!(
            CalibrationProfile::derive(100, 0, 2_000, 32, 320),
            Err(CalibrationError::ZeroCurrentLsb)
        );
    }

    #[test]
    fn test_rejects_register_overflow() {
        // 40_960_000 / (1 * 10) does not fit in 16 bits
        assert_eq!(
            CalibrationProfile::derive(10, 1, 1, 32, 320),
            Err(CalibrationError::RegisterOverflow)
        );
    }

    #[test]
    fn test_rejects_insufficient_range() {
        // 100 µA * 32767 = 3.27 A full scale
        assert_eq!(
            CalibrationProfile::derive(100, 100, 5_000, 32, 320),
            Err(CalibrationError::CurrentOutOfRange)
        );
    }

    #[test]
    fn test_rejects_unsupported_ranges() {
        assert_eq!(
            CalibrationProfile::derive(100, 100, 2_000, 24, 320),
            Err(CalibrationError::BusRange)
        );
        assert_eq!(
            CalibrationProfile::derive(100, 100, 2_000, 32, 100),
            Err(CalibrationError::ShuntRange)
        );
    }

    #[test]
    fn test_rejects_shunt_drop_above_full_scale() {
        // 2 A across 0.1 Ω is 200 mV, above the 160 mV range
        assert_eq!(
            CalibrationProfile::derive(100, 100, 2_000, 32, 160),
            Err(CalibrationError::ShuntRangeExceeded)
        );
        let low = CalibrationProfile::derive(100, 100, 400, 16, 40).unwrap();
        assert_eq!(low.max_bus_voltage_v, 16);
        assert_eq!(low.max_shunt_voltage_mv, 40);
    }
}
