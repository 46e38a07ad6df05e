//! Configuration file loading
//!
//! Resolves the override file, merges it over the embedded defaults and
//! checks the result before any hardware is touched.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use heapless::String as HString;
use log::info;
use pidash_core::config::{ConfigValidationError, PanelConfig, MAX_URL_LEN};
use serde::Deserialize;
use thiserror::Error;

/// Default configuration, validated by build.rs
pub const DEFAULT_CONFIG: &str = include_str!("../../panel.toml");

/// Override file used when no `--config` is given
pub const SYSTEM_CONFIG_PATH: &str = "/etc/pidash/panel.toml";

/// Placeholder in the connect URL replaced with the login name
const USER_PLACEHOLDER: &str = "{user}";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Override file could not be read
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// TOML syntax or type mismatch
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// Panel settings the core rejects
    #[error("invalid panel settings: {0:?}")]
    Invalid(ConfigValidationError),
    /// Power-off command is empty
    #[error("power_off.command is empty")]
    EmptyCommand,
    /// Connect URL no longer fits after substitution
    #[error("connect.url exceeds {} characters", MAX_URL_LEN)]
    UrlTooLong,
}

impl From<ConfigValidationError> for ConfigError {
    fn from(e: ConfigValidationError) -> Self {
        ConfigError::Invalid(e)
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Embedded,
    File(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Embedded => f.write_str("embedded defaults"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Bus and GPIO device paths
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HardwareConfig {
    pub i2c_bus: String,
    pub gpio_chip: String,
    /// Center key line offset on `gpio_chip`
    pub center_key_line: u32,
}

/// Which display backend to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayBackendKind {
    /// SSD1306 128x64 OLED on SPI
    Ssd1306,
    /// Frames written to the log
    Console,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DisplayConfig {
    pub backend: DisplayBackendKind,
    pub spi_device: String,
    pub spi_speed_hz: u32,
    /// Data/command select line
    pub dc_line: u32,
    pub reset_line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PowerOffConfig {
    /// Program and arguments
    pub command: Vec<String>,
}

/// Complete daemon configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DaemonConfig {
    pub log_level: String,
    pub hardware: HardwareConfig,
    pub display: DisplayConfig,
    pub power_off: PowerOffConfig,
    #[serde(flatten)]
    pub panel: PanelConfig,
}

/// Load the configuration
///
/// An explicit path must be readable. Without one, the system path is
/// used when present, otherwise the embedded defaults alone.
pub fn load(path: Option<&Path>) -> Result<(DaemonConfig, ConfigSource), ConfigError> {
    let path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => Some(PathBuf::from(SYSTEM_CONFIG_PATH)).filter(|p| p.exists()),
    };

    match path {
        Some(path) => {
            let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            let config = parse(Some(&text), &login_name())?;
            Ok((config, ConfigSource::File(path)))
        }
        None => Ok((parse(None, &login_name())?, ConfigSource::Embedded)),
    }
}

/// Merge an override over the embedded defaults and validate
pub fn parse(overlay: Option<&str>, user: &str) -> Result<DaemonConfig, ConfigError> {
    let mut base: toml::Table = toml::from_str(DEFAULT_CONFIG)?;
    if let Some(text) = overlay {
        let overlay: toml::Table = toml::from_str(text)?;
        merge(&mut base, overlay);
    }

    let mut config: DaemonConfig = toml::Value::Table(base).try_into()?;
    config.panel.connect.url = expand_user(&config.panel.connect.url, user)?;

    config.panel.validate()?;
    if config.power_off.command.is_empty() {
        return Err(ConfigError::EmptyCommand);
    }

    Ok(config)
}

/// Overlay tables recursively; any other value replaces the base
fn merge(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let toml::Value::Table(incoming) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge(existing, incoming);
                continue;
            }
            base.insert(key, toml::Value::Table(incoming));
        } else {
            base.insert(key, value);
        }
    }
}

fn expand_user(url: &str, user: &str) -> Result<HString<MAX_URL_LEN>, ConfigError> {
    let expanded = url.replace(USER_PLACEHOLDER, user);
    let mut out = HString::new();
    out.push_str(&expanded)
        .map_err(|_| ConfigError::UrlTooLong)?;
    Ok(out)
}

fn login_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .unwrap_or_else(|_| "pi".to_string())
}

/// Log a summary of the loaded configuration
pub fn log_config_summary(config: &DaemonConfig, source: &ConfigSource) {
    let panel = &config.panel;
    info!("Configuration loaded from {}", source);
    info!(
        "  Sense chip: {:#04x} shunt {} mOhm, LSB {} uA, {} V / {} mV range",
        panel.sense_chip.address,
        panel.sense_chip.shunt_milliohms,
        panel.sense_chip.current_lsb_ua,
        panel.sense_chip.max_bus_voltage_v,
        panel.sense_chip.max_shunt_voltage_mv
    );
    info!("  Expander: {:#04x}", panel.expander.address);
    info!(
        "  Battery: {:.2}-{:.2} V, shutdown below {:.1}%",
        panel.battery.empty_v, panel.battery.full_v, panel.shutdown.threshold_percent
    );
    info!(
        "  Timing: home {} ms, dwell {} ms, max hold {} ms",
        panel.timing.home_refresh_ms, panel.timing.dwell_ms, panel.timing.max_hold_ms
    );
    info!(
        "  Display: {:?} on {}",
        config.display.backend, config.display.spi_device
    );
    info!("  Power-off: {}", config.power_off.command.join(" "));
    info!("  Connect: {}", panel.connect.url);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_parse() {
        let config = parse(None, "pi").unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.hardware.i2c_bus, "/dev/i2c-1");
        assert_eq!(config.hardware.center_key_line, 20);
        assert_eq!(config.display.backend, DisplayBackendKind::Ssd1306);
        assert_eq!(config.power_off.command, ["sudo", "poweroff"]);
        assert_eq!(config.panel.sense_chip.address, 0x42);
        assert_eq!(config.panel.expander.address, 0x20);
        assert_eq!(config.panel.connect.url.as_str(), "ssh://pi@192.168.81.99");
    }

    #[test]
    fn test_embedded_defaults_match_core_defaults() {
        let config = parse(None, "pi").unwrap();
        let core = PanelConfig::default();
        assert_eq!(config.panel.sense_chip, core.sense_chip);
        assert_eq!(config.panel.timing, core.timing);
        assert_eq!(config.panel.shutdown, core.shutdown);
        assert_eq!(config.panel.battery, core.battery);
        assert_eq!(config.panel.connect, core.connect);
    }

    #[test]
    fn test_overlay_replaces_only_given_keys() {
        let overlay = r#"
            log_level = "debug"

            [display]
            backend = "console"

            [shutdown]
            threshold_percent = 15.0
        "#;
        let config = parse(Some(overlay), "pi").unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.display.backend, DisplayBackendKind::Console);
        assert_eq!(config.display.spi_device, "/dev/spidev0.0");
        assert_eq!(config.panel.shutdown.threshold_percent, 15.0);
        assert_eq!(config.panel.shutdown.alarm_cycles, 5);
    }

    #[test]
    fn test_user_placeholder_expanded() {
        let config = parse(None, "alice").unwrap();
        assert_eq!(
            config.panel.connect.url.as_str(),
            "ssh://alice@192.168.81.99"
        );
    }

    #[test]
    fn test_url_too_long_after_expansion() {
        let user = "u".repeat(60);
        assert!(matches!(parse(None, &user), Err(ConfigError::UrlTooLong)));
    }

    #[test]
    fn test_semantic_errors_rejected() {
        let overlay = "[expander]\naddress = 0x42\n";
        assert!(matches!(
            parse(Some(overlay), "pi"),
            Err(ConfigError::Invalid(ConfigValidationError::AddressConflict))
        ));

        let overlay = "[power_off]\ncommand = []\n";
        assert!(matches!(
            parse(Some(overlay), "pi"),
            Err(ConfigError::EmptyCommand)
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse(Some("[display\n"), "pi"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            parse(Some("[display]\nbackend = \"hdmi\"\n"), "pi"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load(Some(Path::new("/nonexistent/pidash.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().starts_with("cannot read /nonexistent/pidash.toml: "));

        let source = std::error::Error::source(&err).unwrap();
        let io = source.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::EmptyCommand.to_string(),
            "power_off.command is empty"
        );
        assert_eq!(
            ConfigError::UrlTooLong.to_string(),
            format!("connect.url exceeds {} characters", MAX_URL_LEN)
        );
        assert_eq!(
            ConfigError::from(ConfigValidationError::EmptyUrl).to_string(),
            "invalid panel settings: EmptyUrl"
        );

        let err = parse(Some("[display\n"), "pi").unwrap_err();
        assert!(err.to_string().starts_with("invalid configuration: "));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_merge_nested_tables() {
        let mut base: toml::Table = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Table = toml::from_str("[a]\ny = 3\n[b]\nz = 4\n").unwrap();
        merge(&mut base, overlay);
        assert_eq!(base["a"]["x"].as_integer(), Some(1));
        assert_eq!(base["a"]["y"].as_integer(), Some(3));
        assert_eq!(base["b"]["z"].as_integer(), Some(4));
    }
}
