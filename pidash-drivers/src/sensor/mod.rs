//! Power monitoring sensors

pub mod ina219;

pub use ina219::{
    AdcResolution, BusVoltageRange, ConfigRegister, Ina219, OperatingMode, Register, ShuntGain,
};
