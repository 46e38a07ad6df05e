//! Build script for pidash-daemon
//!
//! Validates the embedded panel.toml at compile time so a broken default
//! never ships.

use std::fs;
use std::path::Path;

fn main() {
    validate_config();
}

/// Validate panel.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=panel.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("panel.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: panel.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The daemon embeds panel.toml as its default configuration.      ║\n\
            ║  Please restore it in the pidash-daemon directory.               ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read panel.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in panel.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    validate_required_sections(&config);

    let mut errors = Vec::new();
    validate_addresses(&config, &mut errors);
    validate_battery(&config, &mut errors);
    validate_timing(&config, &mut errors);
    validate_shutdown(&config, &mut errors);
    validate_display(&config, &mut errors);
    validate_connect(&config, &mut errors);
    report("Invalid values in panel.toml", &errors);

    println!("cargo:warning=panel.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// The default must spell out every section
fn validate_required_sections(config: &toml::Value) {
    let errors: Vec<String> = [
        "hardware",
        "display",
        "sense_chip",
        "expander",
        "battery",
        "timing",
        "shutdown",
        "power_off",
        "connect",
    ]
    .iter()
    .filter(|section| !matches!(config.get(**section), Some(toml::Value::Table(_))))
    .map(|section| format!("Missing [{}] section", section))
    .collect();

    report("Missing required sections in panel.toml", &errors);
}

fn integer(config: &toml::Value, section: &str, key: &str) -> Option<i64> {
    config.get(section)?.get(key)?.as_integer()
}

fn float(config: &toml::Value, section: &str, key: &str) -> Option<f64> {
    let value = config.get(section)?.get(key)?;
    value.as_float().or_else(|| value.as_integer().map(|i| i as f64))
}

fn validate_addresses(config: &toml::Value, errors: &mut Vec<String>) {
    let sense = integer(config, "sense_chip", "address");
    let expander = integer(config, "expander", "address");

    for (section, address) in [("sense_chip", sense), ("expander", expander)] {
        match address {
            Some(a) if (0x03..=0x77).contains(&a) => {}
            Some(a) => errors.push(format!("[{}] address {:#x} outside 0x03-0x77", section, a)),
            None => errors.push(format!("[{}] missing integer 'address'", section)),
        }
    }

    if sense.is_some() && sense == expander {
        errors.push("[sense_chip] and [expander] share an address".to_string());
    }

    for key in ["shunt_milliohms", "current_lsb_ua", "max_expected_current_ma"] {
        match integer(config, "sense_chip", key) {
            Some(v) if v > 0 => {}
            _ => errors.push(format!("[sense_chip] {} must be a positive integer", key)),
        }
    }

    match integer(config, "sense_chip", "max_bus_voltage_v") {
        Some(16) | Some(32) => {}
        _ => errors.push("[sense_chip] max_bus_voltage_v must be 16 or 32".to_string()),
    }
    match integer(config, "sense_chip", "max_shunt_voltage_mv") {
        Some(40) | Some(80) | Some(160) | Some(320) => {}
        _ => errors.push(
            "[sense_chip] max_shunt_voltage_mv must be 40, 80, 160 or 320".to_string(),
        ),
    }
}

fn validate_battery(config: &toml::Value, errors: &mut Vec<String>) {
    match (
        float(config, "battery", "empty_v"),
        float(config, "battery", "full_v"),
    ) {
        (Some(empty), Some(full)) if full > empty => {}
        (Some(_), Some(_)) => errors.push("[battery] full_v must be above empty_v".to_string()),
        _ => errors.push("[battery] needs numeric empty_v and full_v".to_string()),
    }
}

fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    for key in [
        "home_refresh_ms",
        "dwell_ms",
        "release_poll_ms",
        "qr_dwell_ms",
        "max_hold_ms",
    ] {
        match integer(config, "timing", key) {
            Some(v) if v > 0 && v <= u32::MAX as i64 => {}
            _ => errors.push(format!("[timing] {} must be a positive integer", key)),
        }
    }
}

fn validate_shutdown(config: &toml::Value, errors: &mut Vec<String>) {
    match float(config, "shutdown", "threshold_percent") {
        Some(t) if (0.0..=100.0).contains(&t) => {}
        _ => errors.push("[shutdown] threshold_percent must be 0-100".to_string()),
    }

    match integer(config, "shutdown", "alarm_cycles") {
        Some(c) if (0..=20).contains(&c) => {}
        _ => errors.push("[shutdown] alarm_cycles must be 0-20".to_string()),
    }

    match config.get("power_off").and_then(|p| p.get("command")) {
        Some(toml::Value::Array(parts))
            if !parts.is_empty() && parts.iter().all(|p| p.is_str()) => {}
        _ => errors.push("[power_off] command must be a non-empty string array".to_string()),
    }
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let backend = config
        .get("display")
        .and_then(|d| d.get("backend"))
        .and_then(|b| b.as_str());

    match backend {
        Some("ssd1306") | Some("console") => {}
        _ => errors.push("[display] backend must be 'ssd1306' or 'console'".to_string()),
    }
}

fn validate_connect(config: &toml::Value, errors: &mut Vec<String>) {
    let url = config
        .get("connect")
        .and_then(|c| c.get("url"))
        .and_then(|u| u.as_str());

    match url {
        Some(u) if !u.is_empty() && u.len() <= 64 => {}
        _ => errors.push("[connect] url must be 1-64 characters".to_string()),
    }
}
