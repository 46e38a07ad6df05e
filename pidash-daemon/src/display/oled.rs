//! SSD1306 128x64 OLED over spidev with gpio-cdev DC/RST lines

use anyhow::{anyhow, Context};
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{CdevPin, Delay, SpidevDevice};
use log::{info, warn};
use pidash_display::{DisplayBackend, DisplayError, SCREEN_COLS, SCREEN_ROWS};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::mode::DisplayConfig as _;
use ssd1306::prelude::*;
use ssd1306::Ssd1306;

use crate::config::DisplayConfig;

const CHAR_WIDTH: i32 = 6;
const LINE_HEIGHT: i32 = 10;

type Oled = Ssd1306<
    SPIInterface<SpidevDevice, CdevPin>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

/// The hat's OLED
pub struct OledBackend {
    display: Oled,
    /// Held so the line stays driven high
    _reset: CdevPin,
}

impl OledBackend {
    /// Open the SPI device, claim DC/RST, reset and initialize the panel
    pub fn open(config: &DisplayConfig, gpio_chip: &str) -> anyhow::Result<Self> {
        let mut spi = SpidevDevice::open(&config.spi_device)
            .with_context(|| format!("opening SPI device {}", config.spi_device))?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(config.spi_speed_hz)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options).context("configuring SPI")?;

        let mut chip =
            Chip::new(gpio_chip).with_context(|| format!("opening GPIO chip {}", gpio_chip))?;
        let dc = output_line(&mut chip, config.dc_line, "pidash-dc")?;
        let mut reset = output_line(&mut chip, config.reset_line, "pidash-rst")?;

        let interface = SPIInterface::new(spi, dc);
        let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();

        display
            .reset(&mut reset, &mut Delay)
            .map_err(|e| anyhow!("resetting display: {:?}", e))?;
        display
            .init()
            .map_err(|e| anyhow!("initializing display: {:?}", e))?;
        display.clear_buffer();
        display
            .flush()
            .map_err(|e| anyhow!("clearing display: {:?}", e))?;

        info!(
            "SSD1306 ready on {} (DC {}, RST {})",
            config.spi_device, config.dc_line, config.reset_line
        );

        Ok(Self {
            display,
            _reset: reset,
        })
    }
}

fn output_line(chip: &mut Chip, offset: u32, consumer: &str) -> anyhow::Result<CdevPin> {
    let line = chip
        .get_line(offset)
        .with_context(|| format!("getting line {}", offset))?;
    let handle = line
        .request(LineRequestFlags::OUTPUT, 1, consumer)
        .with_context(|| format!("requesting line {} as output", offset))?;
    CdevPin::new(handle).with_context(|| format!("creating pin for line {}", offset))
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

impl DisplayBackend for OledBackend {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.display.clear_buffer();
        Ok(())
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        if row as usize >= SCREEN_ROWS || col as usize >= SCREEN_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }
        let origin = Point::new(col as i32 * CHAR_WIDTH, row as i32 * LINE_HEIGHT);
        Text::with_baseline(text, origin, text_style(), Baseline::Top)
            .draw(&mut self.display)
            .map(|_| ())
            .map_err(|_| DisplayError::Communication)
    }

    fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16) -> Result<(), DisplayError> {
        Rectangle::new(
            Point::new(x as i32, y as i32),
            Size::new(width as u32, height as u32),
        )
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(&mut self.display)
        .map_err(|_| DisplayError::Communication)
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.display.flush().map_err(|e| {
            warn!("OLED flush failed: {:?}", e);
            DisplayError::Communication
        })
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }

    fn pixel_dimensions(&self) -> (u16, u16) {
        (128, 64)
    }

    /// Opening the backend initializes the panel
    fn is_ready(&self) -> bool {
        true
    }
}
