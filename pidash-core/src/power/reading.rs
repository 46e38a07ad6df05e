//! Raw sample decoding and physical-unit readings

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::calibration::CalibrationProfile;

/// Bus voltage register LSB (V per code, after dropping the 3 status bits)
pub const BUS_VOLTAGE_LSB_V: f32 = 0.004;

/// Shunt voltage register LSB (mV per code)
pub const SHUNT_VOLTAGE_LSB_MV: f32 = 0.01;

/// One read of the four measurement registers, exactly as returned by the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    pub shunt_voltage: u16,
    pub bus_voltage: u16,
    pub current: u16,
    pub power: u16,
}

/// Decode a signed register word
///
/// Codes above 32767 map to `raw - 65535`, so 0xFFFF reads as 0 and
/// 0x8000 as -32767. This is one count off standard two's complement and
/// is kept so readings match the existing deployed panels.
pub fn decode_signed16(raw: u16) -> i16 {
    if raw > 32_767 {
        (raw as i32 - 65_535) as i16
    } else {
        raw as i16
    }
}

/// Bus voltage in volts; bits 0-2 are CNVR/OVF/reserved flags
pub fn bus_voltage_v(raw: u16) -> f32 {
    (raw >> 3) as f32 * BUS_VOLTAGE_LSB_V
}

/// Battery voltage window mapped linearly onto 0-100 %
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BatteryRange {
    /// Voltage reported as 0 %
    pub empty_v: f32,
    /// Voltage reported as 100 %
    pub full_v: f32,
}

impl Default for BatteryRange {
    /// Two Li-ion cells in series
    fn default() -> Self {
        Self {
            empty_v: 6.0,
            full_v: 8.4,
        }
    }
}

impl BatteryRange {
    /// Whether the window is usable (full above empty, both finite)
    pub fn is_valid(&self) -> bool {
        self.empty_v.is_finite() && self.full_v.is_finite() && self.full_v > self.empty_v
    }

    /// State of charge for a bus voltage, clamped to [0, 100]
    pub fn percent(&self, bus_voltage_v: f32) -> f32 {
        if !self.is_valid() || bus_voltage_v.is_nan() {
            return 0.0;
        }
        let span = self.full_v - self.empty_v;
        ((bus_voltage_v - self.empty_v) / span * 100.0).clamp(0.0, 100.0)
    }
}

/// Physical-unit view of one [`RawSample`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerReading {
    pub bus_voltage_v: f32,
    pub shunt_voltage_mv: f32,
    /// Negative while the battery is discharging
    pub current_ma: f32,
    pub power_w: f32,
    pub battery_percent: f32,
}

impl PowerReading {
    /// Convert a raw sample using the active calibration and battery window
    pub fn from_raw(
        raw: &RawSample,
        calibration: &CalibrationProfile,
        battery: &BatteryRange,
    ) -> Self {
        let bus_voltage_v = bus_voltage_v(raw.bus_voltage);
        Self {
            bus_voltage_v,
            shunt_voltage_mv: decode_signed16(raw.shunt_voltage) as f32 * SHUNT_VOLTAGE_LSB_MV,
            current_ma: decode_signed16(raw.current) as f32 * calibration.current_lsb_ma,
            power_w: decode_signed16(raw.power) as f32 * calibration.power_lsb_w,
            battery_percent: battery.percent(bus_voltage_v),
        }
    }

    /// Current in amps
    pub fn current_a(&self) -> f32 {
        self.current_ma / 1000.0
    }

    /// Whether current flows out of the battery
    pub fn is_discharging(&self) -> bool {
        self.current_ma < 0.0
    }
}

/// Telemetry for one home cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Telemetry {
    /// Sampled successfully this cycle
    Fresh(PowerReading),
    /// The sample failed; `last` is the most recent good reading, if any
    Stale { last: Option<PowerReading> },
}

impl Telemetry {
    /// The reading for this cycle, only if it is fresh
    pub fn fresh(&self) -> Option<&PowerReading> {
        match self {
            Telemetry::Fresh(reading) => Some(reading),
            Telemetry::Stale { .. } => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Telemetry::Stale { .. })
    }
}
