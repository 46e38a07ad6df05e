//! I2C bus on top of the Linux i2c-dev interface

use anyhow::Context;
use embedded_hal::i2c::{Error as _, ErrorKind, I2c, NoAcknowledgeSource};
use linux_embedded_hal::I2cdev;

use pidash_hal::{I2cBus, I2cBusError};

/// I2C adapter bound to one `/dev/i2c-N` node
///
/// Both the sense chip and the port expander sit on the same adapter;
/// each driver gets its own handle so they can be owned independently.
pub struct LinuxI2c {
    dev: I2cdev,
}

impl LinuxI2c {
    /// Open an adapter, e.g. `/dev/i2c-1`
    pub fn open(path: &str) -> anyhow::Result<Self> {
        let dev = I2cdev::new(path).with_context(|| format!("opening I2C adapter {}", path))?;
        log::debug!("Opened I2C adapter {}", path);
        Ok(Self { dev })
    }
}

fn map_kind(kind: ErrorKind) -> I2cBusError {
    match kind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        | ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)
        | ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown) => I2cBusError::Nack,
        ErrorKind::ArbitrationLoss => I2cBusError::ArbitrationLost,
        ErrorKind::Bus => I2cBusError::Bus,
        ErrorKind::Overrun => I2cBusError::Overrun,
        _ => I2cBusError::Other,
    }
}

impl I2cBus for LinuxI2c {
    type Error = I2cBusError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        I2c::write(&mut self.dev, address, data).map_err(|e| map_kind(e.kind()))
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        I2c::read(&mut self.dev, address, buf).map_err(|e| map_kind(e.kind()))
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        I2c::write_read(&mut self.dev, address, write_data, read_buf)
            .map_err(|e| map_kind(e.kind()))
    }
}
