//! Host statistics from procfs, sysfs and a couple of shell tools
//!
//! Each source is read independently; a missing or malformed source only
//! blanks its own fields.

use std::fs;
use std::process::Command;

use heapless::String as HString;
use log::debug;
use pidash_core::panel::{ClimateReading, SystemSnapshot};
use pidash_core::traits::SystemStats;

/// Home page header format, e.g. "Tue, Mar 04 2025, 14:07"
pub const TIMESTAMP_FORMAT: &str = "%a, %b %d %Y, %H:%M";

const LOADAVG: &str = "/proc/loadavg";
const MEMINFO: &str = "/proc/meminfo";
const THERMAL: &str = "/sys/class/thermal/thermal_zone0/temp";
const ROUTE: &str = "/proc/net/route";

/// Linux statistics collector
pub struct ProcStats {
    cores: f32,
}

impl Default for ProcStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcStats {
    pub fn new() -> Self {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            cores: cores as f32,
        }
    }
}

impl SystemStats for ProcStats {
    fn snapshot(&mut self) -> SystemSnapshot {
        let mut snapshot = SystemSnapshot {
            timestamp: bounded(&chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()),
            climate: ClimateReading::default(),
            ..Default::default()
        };

        snapshot.cpu_load_percent = read(LOADAVG)
            .and_then(|t| parse_loadavg(&t))
            .map(|load| load / self.cores * 100.0);
        snapshot.cpu_temp_c = read(THERMAL).and_then(|t| parse_thermal(&t));

        if let Some((used, total)) = read(MEMINFO).and_then(|t| parse_meminfo(&t)) {
            snapshot.ram_used_mb = Some(used);
            snapshot.ram_total_mb = Some(total);
        }

        if let Some((free, total)) = run("df", &["-k", "/"]).and_then(|t| parse_df(&t)) {
            snapshot.disk_free_gb = Some(free);
            snapshot.disk_total_gb = Some(total);
        }

        snapshot.interface = read(ROUTE)
            .and_then(|t| parse_default_route(&t))
            .map(|iface| bounded(&iface));
        snapshot.internal_ip = run("hostname", &["-I"])
            .and_then(|t| t.split_whitespace().next().map(bounded));

        snapshot
    }
}

fn read(path: &str) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            debug!("{}: {}", path, e);
            None
        }
    }
}

fn run(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        debug!("{} exited with {}", program, output.status);
        return None;
    }
    String::from_utf8(output.stdout).ok()
}

/// Copy into a fixed-capacity string, cutting at capacity
fn bounded<const N: usize>(text: &str) -> HString<N> {
    let mut out = HString::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// One-minute load average
pub fn parse_loadavg(text: &str) -> Option<f32> {
    text.split_whitespace().next()?.parse().ok()
}

/// Millidegrees Celsius to degrees
pub fn parse_thermal(text: &str) -> Option<f32> {
    let milli: i32 = text.trim().parse().ok()?;
    Some(milli as f32 / 1000.0)
}

/// (used, total) MB from MemTotal and MemAvailable
pub fn parse_meminfo(text: &str) -> Option<(u32, u32)> {
    let field = |name: &str| -> Option<u64> {
        text.lines()
            .find(|l| l.starts_with(name))?
            .split_whitespace()
            .nth(1)?
            .parse()
            .ok()
    };
    let total_kb = field("MemTotal:")?;
    let available_kb = field("MemAvailable:")?;
    let used_kb = total_kb.saturating_sub(available_kb);
    Some(((used_kb / 1024) as u32, (total_kb / 1024) as u32))
}

/// (free, total) GB from the Available and 1K-blocks columns of `df -k`
pub fn parse_df(text: &str) -> Option<(f32, f32)> {
    let mut fields = text.lines().nth(1)?.split_whitespace().skip(1);
    let total_kb: u64 = fields.next()?.parse().ok()?;
    let avail_kb: u64 = fields.nth(1)?.parse().ok()?;
    let gb = |kb: u64| kb as f32 / (1024.0 * 1024.0);
    Some((gb(avail_kb), gb(total_kb)))
}

/// Interface carrying the default route
pub fn parse_default_route(text: &str) -> Option<String> {
    text.lines().skip(1).find_map(|line| {
        let mut fields = line.split_whitespace();
        let iface = fields.next()?;
        let destination = fields.next()?;
        (destination == "00000000").then(|| iface.to_string())
    })
}
