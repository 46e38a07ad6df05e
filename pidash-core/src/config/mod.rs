//! Configuration types
//!
//! Board-agnostic panel configuration. The daemon deserializes these from
//! TOML when the `serde` feature is enabled.

pub mod types;

pub use types::*;
