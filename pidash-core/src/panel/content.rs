//! Structured page content
//!
//! Builds what each page says, never where it goes. Sinks decide layout.

use core::fmt::{self, Write};

use heapless::{String, Vec};

use super::snapshot::SystemSnapshot;
use crate::config::MAX_URL_LEN;
use crate::power::Telemetry;
use crate::state::Page;

/// Maximum fields or lines on a page
pub const MAX_FIELDS: usize = 4;

/// Title and free-text line capacity
pub const TEXT_LEN: usize = 32;

/// Field label capacity
pub const LABEL_LEN: usize = 12;

/// Field value capacity
pub const VALUE_LEN: usize = 24;

/// Shown when a value is unavailable
pub const PLACEHOLDER: &str = "--";

/// One "Label: value" row
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    pub label: String<LABEL_LEN>,
    pub value: String<VALUE_LEN>,
}

/// Page body below the title
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Body {
    /// Labeled values
    Fields(Vec<Field, MAX_FIELDS>),
    /// Free text lines
    Lines(Vec<String<TEXT_LEN>, MAX_FIELDS>),
    /// Payload to encode as a QR code
    Qr(String<MAX_URL_LEN>),
}

/// Everything a sink needs to draw one page
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PageContent {
    pub title: String<TEXT_LEN>,
    pub body: Body,
}

impl PageContent {
    /// Empty field page with a title
    pub fn with_fields(title: &str) -> Self {
        Self {
            title: truncated(title),
            body: Body::Fields(Vec::new()),
        }
    }

    /// Empty free-text page with a title
    pub fn with_lines(title: &str) -> Self {
        Self {
            title: truncated(title),
            body: Body::Lines(Vec::new()),
        }
    }

    /// Append a labeled value; ignored past [`MAX_FIELDS`] or on a non-field page
    pub fn push_field(&mut self, label: &str, value: fmt::Arguments<'_>) {
        if let Body::Fields(fields) = &mut self.body {
            let mut v = Cut(String::new());
            let _ = v.write_fmt(value);
            let _ = fields.push(Field {
                label: truncated(label),
                value: v.0,
            });
        }
    }

    /// Append a free-text line; ignored on a non-line page
    pub fn push_line(&mut self, text: &str) {
        if let Body::Lines(lines) = &mut self.body {
            let _ = lines.push(truncated(text));
        }
    }

    /// Look up a field value by label
    pub fn field(&self, label: &str) -> Option<&str> {
        match &self.body {
            Body::Fields(fields) => fields
                .iter()
                .find(|f| f.label.as_str() == label)
                .map(|f| f.value.as_str()),
            _ => None,
        }
    }

    /// Build the content for a navigable page
    ///
    /// All pages of one cycle are built from the same telemetry and
    /// snapshot, so paging never touches hardware.
    pub fn for_page(
        page: Page,
        snapshot: &SystemSnapshot,
        telemetry: &Telemetry,
        connect_url: &str,
    ) -> Self {
        match page {
            Page::Home => home(snapshot, telemetry),
            Page::Network => network(snapshot),
            Page::PowerStats => power_stats(telemetry),
            Page::Climate => climate(snapshot),
            Page::Surveillance => resources(snapshot),
            Page::ConnectQr => connect(connect_url),
        }
    }

    /// The fixed low-battery warning
    pub fn low_battery_warning() -> Self {
        let mut content = Self::with_lines("WARNING:");
        content.push_line("Low Battery");
        content.push_line("Shutting down");
        content
    }
}

fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Writer that keeps what fits and drops the rest
struct Cut<const N: usize>(String<N>);

impl<const N: usize> Write for Cut<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            self.0.push(c).map_err(|_| fmt::Error)?;
        }
        Ok(())
    }
}

/// Format an optional value or fall back to the placeholder
struct Opt<T>(Option<T>, fn(&T, &mut fmt::Formatter<'_>) -> fmt::Result);

impl<T> fmt::Display for Opt<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(v) => (self.1)(v, f),
            None => f.write_str(PLACEHOLDER),
        }
    }
}

fn percent_1dp(v: &f32, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:.1}%", v)
}

fn ram_usage(snapshot: &SystemSnapshot) -> Option<(u32, u32)> {
    Some((snapshot.ram_used_mb?, snapshot.ram_total_mb?))
}

fn disk_space(snapshot: &SystemSnapshot) -> Option<(f32, f32)> {
    Some((snapshot.disk_free_gb?, snapshot.disk_total_gb?))
}

fn home(snapshot: &SystemSnapshot, telemetry: &Telemetry) -> PageContent {
    let title = if snapshot.timestamp.is_empty() {
        Page::Home.title()
    } else {
        snapshot.timestamp.as_str()
    };
    let mut content = PageContent::with_fields(title);
    let reading = telemetry.fresh();

    content.push_field(
        "CPU Load",
        format_args!("{}", Opt(snapshot.cpu_load_percent, percent_1dp)),
    );
    content.push_field(
        "RAM",
        format_args!(
            "{}",
            Opt(ram_usage(snapshot), |(u, t), f| write!(f, "{}/{} MB", u, t))
        ),
    );
    content.push_field(
        "Power",
        format_args!(
            "{}",
            Opt(reading.map(|r| r.power_w), |w, f| write!(f, "{:.3} W", w))
        ),
    );
    content.push_field(
        "Battery",
        format_args!("{}", Opt(reading.map(|r| r.battery_percent), percent_1dp)),
    );
    content
}

fn network(snapshot: &SystemSnapshot) -> PageContent {
    let mut content = PageContent::with_fields(Page::Network.title());

    content.push_field(
        "Interface",
        format_args!("{}", Opt(snapshot.interface.as_ref(), |s, f| f.write_str(s))),
    );
    content.push_field(
        "Int IP",
        format_args!("{}", Opt(snapshot.internal_ip.as_ref(), |s, f| f.write_str(s))),
    );
    content.push_field(
        "Ext IP",
        format_args!("{}", Opt(snapshot.external_ip.as_ref(), |s, f| f.write_str(s))),
    );
    content
}

fn power_stats(telemetry: &Telemetry) -> PageContent {
    let title = if telemetry.is_stale() {
        "UPS Stats (stale)"
    } else {
        Page::PowerStats.title()
    };
    let mut content = PageContent::with_fields(title);
    let reading = telemetry.fresh();

    content.push_field(
        "Load Voltage",
        format_args!(
            "{}",
            Opt(reading.map(|r| r.bus_voltage_v), |v, f| write!(f, "{:.2} V", v))
        ),
    );
    content.push_field(
        "Current",
        format_args!(
            "{}",
            Opt(reading.map(|r| r.current_a()), |a, f| write!(f, "{:.4} A", a))
        ),
    );
    content.push_field(
        "Power",
        format_args!(
            "{}",
            Opt(reading.map(|r| r.power_w), |w, f| write!(f, "{:.3} W", w))
        ),
    );
    content.push_field(
        "Percent",
        format_args!("{}", Opt(reading.map(|r| r.battery_percent), percent_1dp)),
    );
    content
}

fn climate(snapshot: &SystemSnapshot) -> PageContent {
    let c = &snapshot.climate;
    let mut content = PageContent::with_fields(Page::Climate.title());

    content.push_field(
        "Temp",
        format_args!("{}", Opt(c.temperature_c, |t, f| write!(f, "{:.1} C", t))),
    );
    content.push_field(
        "Hum",
        format_args!("{}", Opt(c.humidity_percent, percent_1dp)),
    );
    content.push_field(
        "Press",
        format_args!("{}", Opt(c.pressure_hpa, |p, f| write!(f, "{:.0} hPa", p))),
    );
    content.push_field(
        "CO2",
        format_args!("{}", Opt(c.co2_ppm, |p, f| write!(f, "{} ppm", p))),
    );
    content
}

fn resources(snapshot: &SystemSnapshot) -> PageContent {
    let mut content = PageContent::with_fields(Page::Surveillance.title());

    content.push_field(
        "CPU Load",
        format_args!("{}", Opt(snapshot.cpu_load_percent, percent_1dp)),
    );
    content.push_field(
        "CPU Temp",
        format_args!(
            "{}",
            Opt(snapshot.cpu_temp_c, |t, f| write!(f, "{:.1} C", t))
        ),
    );
    content.push_field(
        "RAM",
        format_args!(
            "{}",
            Opt(ram_usage(snapshot), |(u, t), f| write!(f, "{}/{} MB", u, t))
        ),
    );
    content.push_field(
        "Disk",
        format_args!(
            "{}",
            Opt(disk_space(snapshot), |(free, t), f| write!(f, "{:.1}/{:.1} GB", free, t))
        ),
    );
    content
}

fn connect(url: &str) -> PageContent {
    PageContent {
        title: truncated(Page::ConnectQr.title()),
        body: Body::Qr(truncated(url)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::power::{BatteryRange, CalibrationProfile, PowerReading, RawSample};

    fn reading() -> PowerReading {
        PowerReading::from_raw(
            &RawSample {
                shunt_voltage: 0,
                bus_voltage: 0x32A0,
                current: 0xFC18,
                power: 0x0064,
            },
            &CalibrationProfile::RANGE_32V_2A,
            &BatteryRange::default(),
        )
    }

    fn snapshot() -> SystemSnapshot {
        let mut s = SystemSnapshot::default();
        let _ = s.timestamp.push_str("Sat, Oct 17 2026, 09:30");
        s.cpu_load_percent = Some(12.5);
        s.cpu_temp_c = Some(48.3);
        s.ram_used_mb = Some(512);
        s.ram_total_mb = Some(3906);
        s.disk_free_gb = Some(20.5);
        s.disk_total_gb = Some(29.0);
        let mut iface = String::new();
        let _ = iface.push_str("wlan0");
        s.interface = Some(iface);
        let mut ip = String::new();
        let _ = ip.push_str("192.168.81.99");
        s.internal_ip = Some(ip);
        s
    }

    #[test]
    fn test_home_fields() {
        let content = PageContent::for_page(
            Page::Home,
            &snapshot(),
            &Telemetry::Fresh(reading()),
            "ssh://pi@host",
        );
        assert_eq!(content.title.as_str(), "Sat, Oct 17 2026, 09:30");
        assert_eq!(content.field("CPU Load"), Some("12.5%"));
        assert_eq!(content.field("RAM"), Some("512/3906 MB"));
        assert_eq!(content.field("Power"), Some("0.200 W"));
        assert_eq!(content.field("Battery"), Some("20.0%"));
    }

    #[test]
    fn test_home_without_timestamp() {
        let content = PageContent::for_page(
            Page::Home,
            &SystemSnapshot::default(),
            &Telemetry::Fresh(reading()),
            "",
        );
        assert_eq!(content.title.as_str(), "Home");
        assert_eq!(content.field("CPU Load"), Some(PLACEHOLDER));
    }

    #[test]
    fn test_power_stats_fields() {
        let content = PageContent::for_page(
            Page::PowerStats,
            &snapshot(),
            &Telemetry::Fresh(reading()),
            "",
        );
        assert_eq!(content.title.as_str(), "UPS Stats:");
        assert_eq!(content.field("Load Voltage"), Some("6.48 V"));
        assert_eq!(content.field("Current"), Some("-0.0999 A"));
        assert_eq!(content.field("Power"), Some("0.200 W"));
        assert_eq!(content.field("Percent"), Some("20.0%"));
    }

    #[test]
    fn test_stale_power_shows_placeholders() {
        let telemetry = Telemetry::Stale {
            last: Some(reading()),
        };
        let content = PageContent::for_page(Page::PowerStats, &snapshot(), &telemetry, "");
        assert_eq!(content.title.as_str(), "UPS Stats (stale)");
        assert_eq!(content.field("Load Voltage"), Some(PLACEHOLDER));
        assert_eq!(content.field("Percent"), Some(PLACEHOLDER));

        let home = PageContent::for_page(Page::Home, &snapshot(), &telemetry, "");
        assert_eq!(home.field("Battery"), Some(PLACEHOLDER));
    }

    #[test]
    fn test_network_fields() {
        let content =
            PageContent::for_page(Page::Network, &snapshot(), &Telemetry::Stale { last: None }, "");
        assert_eq!(content.field("Interface"), Some("wlan0"));
        assert_eq!(content.field("Int IP"), Some("192.168.81.99"));
        assert_eq!(content.field("Ext IP"), Some(PLACEHOLDER));
    }

    #[test]
    fn test_climate_without_sensor() {
        let content =
            PageContent::for_page(Page::Climate, &snapshot(), &Telemetry::Stale { last: None }, "");
        assert_eq!(content.title.as_str(), "Climate:");
        assert_eq!(content.field("Temp"), Some(PLACEHOLDER));
        assert_eq!(content.field("CO2"), Some(PLACEHOLDER));
    }

    #[test]
    fn test_resources_fields() {
        let content = PageContent::for_page(
            Page::Surveillance,
            &snapshot(),
            &Telemetry::Stale { last: None },
            "",
        );
        assert_eq!(content.title.as_str(), "Resources:");
        assert_eq!(content.field("CPU Temp"), Some("48.3 C"));
        assert_eq!(content.field("Disk"), Some("20.5/29.0 GB"));
    }

    #[test]
    fn test_connect_page_carries_url() {
        let content = PageContent::for_page(
            Page::ConnectQr,
            &SystemSnapshot::default(),
            &Telemetry::Stale { last: None },
            "ssh://pi@192.168.81.99",
        );
        match content.body {
            Body::Qr(url) => assert_eq!(url.as_str(), "ssh://pi@192.168.81.99"),
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_warning_lines() {
        let content = PageContent::low_battery_warning();
        assert_eq!(content.title.as_str(), "WARNING:");
        match content.body {
            Body::Lines(lines) => {
                assert_eq!(lines.len(), 2);
                assert_eq!(lines[0].as_str(), "Low Battery");
                assert_eq!(lines[1].as_str(), "Shutting down");
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_long_values_are_cut() {
        let mut content = PageContent::with_fields("T");
        content.push_field("L", format_args!("{}", "0123456789abcdefghijklmnopqrstuvwxyz"));
        assert_eq!(content.field("L"), Some("0123456789abcdefghijklmn"));
    }

    #[test]
    fn test_fifth_field_ignored() {
        let mut content = PageContent::with_fields("T");
        for i in 0..6 {
            content.push_field("L", format_args!("{}", i));
        }
        match content.body {
            Body::Fields(fields) => assert_eq!(fields.len(), MAX_FIELDS),
            _ => unreachable!(),
        }
    }
}
