//! Power-monitor calibration and unit conversion
//!
//! Pure math shared by the sense chip driver and the panel. Nothing in
//! here touches the bus.

pub mod calibration;
pub mod reading;

pub use calibration::{CalibrationError, CalibrationProfile};
pub use reading::{
    bus_voltage_v, decode_signed16, BatteryRange, PowerReading, RawSample, Telemetry,
};
