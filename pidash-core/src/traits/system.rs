//! OS collaborators: host statistics and power-off

use crate::panel::SystemSnapshot;

/// Source of the display-only host statistics
pub trait SystemStats {
    /// Collect a fresh snapshot; fields that cannot be read stay `None`
    fn snapshot(&mut self) -> SystemSnapshot;
}

/// Power-off failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerOffError {
    /// The command could not be started
    Spawn,
    /// The command ran and exited non-zero
    ExitStatus(i32),
    /// Terminated by a signal or status unavailable
    Unknown,
}

/// Hands control to the OS to power the board down
pub trait PowerOff {
    fn power_off(&mut self) -> Result<(), PowerOffError>;
}
