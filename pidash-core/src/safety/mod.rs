//! Low-battery safe shutdown
//!
//! Detects a critically discharged battery and powers the board down
//! exactly once.

pub mod guard;

pub use guard::{GuardOutcome, ShutdownGuard, ShutdownState};
