//! Configuration loading
//!
//! The embedded panel.toml supplies every default. An override file is
//! merged on top of it key by key, then the result is deserialized and
//! validated.

pub mod loader;

pub use loader::{load, log_config_summary, DaemonConfig, DisplayBackendKind, DisplayConfig};
