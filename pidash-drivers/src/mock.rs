//! Simulated I2C peripherals for driver tests

use std::vec::Vec;

use pidash_hal::{I2cBus, I2cBusError};

/// One bus transaction as seen on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Write(u8, Vec<u8>),
    Read(u8, usize),
    WriteRead(u8, Vec<u8>),
}

/// 16-bit register file behind a pointer byte (INA219 style)
pub struct RegisterBus {
    pub registers: [u16; 8],
    pub log: Vec<Op>,
    pub fail: Option<I2cBusError>,
    pointer: usize,
}

impl RegisterBus {
    pub fn new() -> Self {
        Self {
            registers: [0; 8],
            log: Vec::new(),
            fail: None,
            pointer: 0,
        }
    }

    fn check(&self) -> Result<(), I2cBusError> {
        match self.fail {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fill(&self, buf: &mut [u8]) {
        let bytes = self.registers[self.pointer].to_be_bytes();
        for (dst, src) in buf.iter_mut().zip(bytes.iter()) {
            *dst = *src;
        }
    }
}

impl I2cBus for RegisterBus {
    type Error = I2cBusError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.log.push(Op::Write(address, data.to_vec()));
        self.check()?;
        if let Some(&reg) = data.first() {
            self.pointer = reg as usize % self.registers.len();
        }
        if let [_, hi, lo] = data {
            self.registers[self.pointer] = u16::from_be_bytes([*hi, *lo]);
        }
        Ok(())
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.log.push(Op::Read(address, buf.len()));
        self.check()?;
        self.fill(buf);
        Ok(())
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.log.push(Op::WriteRead(address, write_data.to_vec()));
        self.check()?;
        if let Some(&reg) = write_data.first() {
            self.pointer = reg as usize % self.registers.len();
        }
        self.fill(read_buf);
        Ok(())
    }
}

/// Quasi-bidirectional 8-bit port (PCF8574 style)
///
/// A read returns the output latch with any externally grounded pins
/// pulled low.
pub struct PortBus {
    pub latch: u8,
    pub grounded: u8,
    pub log: Vec<Op>,
    pub fail: Option<I2cBusError>,
}

impl PortBus {
    pub fn new(latch: u8) -> Self {
        Self {
            latch,
            grounded: 0,
            log: Vec::new(),
            fail: None,
        }
    }

    pub fn pins(&self) -> u8 {
        self.latch & !self.grounded
    }

    pub fn writes(&self) -> Vec<u8> {
        self.log
            .iter()
            .filter_map(|op| match op {
                Op::Write(_, data) => data.first().copied(),
                _ => None,
            })
            .collect()
    }
}

impl I2cBus for PortBus {
    type Error = I2cBusError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.log.push(Op::Write(address, data.to_vec()));
        if let Some(e) = self.fail {
            return Err(e);
        }
        if let Some(&byte) = data.last() {
            self.latch = byte;
        }
        Ok(())
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.log.push(Op::Read(address, buf.len()));
        if let Some(e) = self.fail {
            return Err(e);
        }
        let pins = self.pins();
        buf.iter_mut().for_each(|b| *b = pins);
        Ok(())
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.write(address, write_data)?;
        self.read(address, read_buf)
    }
}
