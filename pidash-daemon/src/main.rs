//! pidash - Status Panel Daemon
//!
//! Drives a 128x64 OLED on a UPS/joystick hat: power telemetry from the
//! INA219, page selection from the PCF8574 joystick, a QR connect code on
//! the center key, and a safe shutdown when the battery runs low.
//!
//! Usage: `pidash [--config <path>] [--console] [--check]`

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Parser;
use log::{info, warn};

use pidash_core::panel::{Panel, PanelParts};
use pidash_core::safety::GuardOutcome;
use pidash_core::traits::ActiveLow;
use pidash_display::Renderer;
use pidash_drivers::expander::Pcf8574;
use pidash_drivers::sensor::Ina219;
use pidash_hal_linux::{Delay, LinuxI2c, LinuxInputPin};

use crate::config::{DaemonConfig, DisplayBackendKind};
use crate::display::{ConsoleBackend, OledBackend, PanelDisplay};
use crate::system::{CommandPowerOff, ProcStats};

mod config;
mod display;
mod system;

/// Command-line options
#[derive(Parser, Debug)]
#[command(
    name = "pidash",
    version,
    about = "Status panel daemon for a UPS and joystick hat"
)]
struct Cli {
    /// Override file merged over the built-in defaults
    /// (default: /etc/pidash/panel.toml when present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write frames to the log instead of the OLED
    #[arg(long)]
    console: bool,

    /// Load and validate the configuration, then exit
    #[arg(long)]
    check: bool,
}

type HatPanel = Panel<
    Ina219<LinuxI2c>,
    Pcf8574<LinuxI2c>,
    ActiveLow<LinuxInputPin>,
    ProcStats,
    Renderer<PanelDisplay>,
    CommandPowerOff,
    Delay,
>;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let (mut config, source) =
        config::load(args.config.as_deref()).context("loading configuration")?;
    if args.console {
        config.display.backend = DisplayBackendKind::Console;
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();
    config::log_config_summary(&config, &source);

    if args.check {
        info!("Configuration OK");
        return Ok(());
    }

    let mut panel = build_panel(&config)?;
    info!("pidash running");

    loop {
        let report = panel.run_cycle();
        if report.guard == GuardOutcome::Triggered {
            info!("Shutdown sequence complete, waiting for the OS");
        }
    }
}

/// Open the hardware and assemble the panel
fn build_panel(config: &DaemonConfig) -> anyhow::Result<HatPanel> {
    let panel = &config.panel;
    let hardware = &config.hardware;

    let calibration = panel
        .sense_chip
        .calibration()
        .map_err(|e| anyhow!("sense chip calibration: {:?}", e))?;

    // One handle per device on the shared adapter
    let mut monitor = Ina219::new(
        LinuxI2c::open(&hardware.i2c_bus)?,
        panel.sense_chip.address,
        calibration,
    );
    match monitor.read_config() {
        Ok(word) => info!(
            "INA219@{:#04x} config register {:#06x}",
            panel.sense_chip.address, word
        ),
        Err(e) => warn!("INA219 not responding: {}", e),
    }
    let keypad = Pcf8574::new(LinuxI2c::open(&hardware.i2c_bus)?, panel.expander.address);

    let center = ActiveLow::new(LinuxInputPin::request(
        &hardware.gpio_chip,
        hardware.center_key_line,
        "pidash-center",
    )?);

    let display = match config.display.backend {
        DisplayBackendKind::Ssd1306 => {
            PanelDisplay::Oled(OledBackend::open(&config.display, &hardware.gpio_chip)?)
        }
        DisplayBackendKind::Console => PanelDisplay::Console(ConsoleBackend::new()),
    };

    let power_off = CommandPowerOff::from_argv(&config.power_off.command)
        .context("power_off.command is empty")?;

    Ok(Panel::new(
        PanelParts {
            monitor,
            keypad,
            center,
            stats: ProcStats::new(),
            sink: Renderer::new(display),
            power_off,
            delay: Delay,
        },
        panel,
    ))
}
