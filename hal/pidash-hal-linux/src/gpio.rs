//! Input lines through the gpio character device
//!
//! The pull-up for the joystick center key is configured by the board
//! overlay (`gpio=20=ip,pu` in config.txt); the v1 cdev ABI cannot set bias.

use anyhow::Context;
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::CdevPin;

use pidash_hal::InputPin;

/// One requested input line
pub struct LinuxInputPin {
    pin: CdevPin,
    offset: u32,
}

impl LinuxInputPin {
    /// Request `offset` on `chip_path` (e.g. `/dev/gpiochip0`) as an input
    pub fn request(chip_path: &str, offset: u32, consumer: &str) -> anyhow::Result<Self> {
        let mut chip = Chip::new(chip_path).with_context(|| format!("opening {}", chip_path))?;
        let line = chip
            .get_line(offset)
            .with_context(|| format!("getting line {}", offset))?;
        let handle = line
            .request(LineRequestFlags::INPUT, 0, consumer)
            .with_context(|| format!("requesting line {} as input", offset))?;
        let pin = CdevPin::new(handle).context("creating input pin")?;
        Ok(Self { pin, offset })
    }
}

impl InputPin for LinuxInputPin {
    fn is_high(&mut self) -> bool {
        match embedded_hal::digital::InputPin::is_high(&mut self.pin) {
            Ok(level) => level,
            Err(e) => {
                // Pulled-up lines idle high
                log::warn!("GPIO line {} read failed: {:?}", self.offset, e);
                true
            }
        }
    }
}
