//! I2C bus abstractions
//!
//! Provides the master-side operations the sense chip and port expander
//! drivers are written against.

/// I2C bus master
///
/// Register-style peripherals (power monitor, port expander) only need
/// plain writes, plain reads and a combined write-then-read.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write then read in a single transaction (repeated start)
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write_data` - Bytes to write (typically a register pointer)
    /// * `read_buf` - Buffer to read into
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;
}

/// Bus-level failure, normalized across platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cBusError {
    /// Device did not acknowledge its address or a data byte
    Nack,
    /// Lost arbitration to another master
    ArbitrationLost,
    /// Bus error (misplaced start/stop)
    Bus,
    /// Receive overrun
    Overrun,
    /// Adapter could not be opened or another OS-level failure
    Other,
}

impl core::fmt::Display for I2cBusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            I2cBusError::Nack => "no acknowledge",
            I2cBusError::ArbitrationLost => "arbitration lost",
            I2cBusError::Bus => "bus error",
            I2cBusError::Overrun => "overrun",
            I2cBusError::Other => "i2c failure",
        };
        f.write_str(text)
    }
}
