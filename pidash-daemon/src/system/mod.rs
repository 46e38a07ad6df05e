//! Host collaborators: statistics collection and power-off

pub mod poweroff;
pub mod stats;

pub use poweroff::CommandPowerOff;
pub use stats::ProcStats;
