//! Host statistics snapshot
//!
//! Display-only data gathered once per home cycle. Every value is
//! optional; collectors leave a field empty when the source is missing.

use heapless::String;

/// Timestamp text capacity
pub const TIMESTAMP_LEN: usize = 32;

/// Interface name capacity
pub const IFACE_LEN: usize = 16;

/// IP address text capacity (fits IPv6)
pub const ADDR_LEN: usize = 40;

/// Readings from an optional climate sensor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClimateReading {
    pub temperature_c: Option<f32>,
    pub humidity_percent: Option<f32>,
    pub pressure_hpa: Option<f32>,
    pub co2_ppm: Option<u16>,
}

/// One cycle's worth of host statistics
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemSnapshot {
    /// Pre-formatted local time for the home header
    pub timestamp: String<TIMESTAMP_LEN>,
    pub cpu_load_percent: Option<f32>,
    pub cpu_temp_c: Option<f32>,
    pub ram_used_mb: Option<u32>,
    pub ram_total_mb: Option<u32>,
    pub disk_free_gb: Option<f32>,
    pub disk_total_gb: Option<f32>,
    /// Interface carrying the default route
    pub interface: Option<String<IFACE_LEN>>,
    pub internal_ip: Option<String<ADDR_LEN>>,
    pub external_ip: Option<String<ADDR_LEN>>,
    pub climate: ClimateReading,
}
