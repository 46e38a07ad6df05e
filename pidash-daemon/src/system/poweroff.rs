//! Power-off through an external command

use std::process::Command;

use log::{info, warn};
use pidash_core::traits::{PowerOff, PowerOffError};

/// Runs a configured command (e.g. `sudo poweroff`) and waits for it
pub struct CommandPowerOff {
    program: String,
    args: Vec<String>,
}

impl CommandPowerOff {
    /// Build from `[program, args...]`; `None` when empty
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl PowerOff for CommandPowerOff {
    fn power_off(&mut self) -> Result<(), PowerOffError> {
        info!("Running {} {}", self.program, self.args.join(" "));

        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|e| {
                warn!("Cannot start {}: {}", self.program, e);
                PowerOffError::Spawn
            })?;

        if status.success() {
            return Ok(());
        }
        match status.code() {
            Some(code) => Err(PowerOffError::ExitStatus(code)),
            None => Err(PowerOffError::Unknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_argv() {
        assert!(CommandPowerOff::from_argv(&[]).is_none());
    }

    #[test]
    fn test_success() {
        let mut cmd = CommandPowerOff::from_argv(&argv(&["true"])).unwrap();
        assert_eq!(cmd.power_off(), Ok(()));
    }

    #[test]
    fn test_exit_status_reported() {
        let mut cmd = CommandPowerOff::from_argv(&argv(&["sh", "-c", "exit 3"])).unwrap();
        assert_eq!(cmd.power_off(), Err(PowerOffError::ExitStatus(3)));
    }

    #[test]
    fn test_missing_program() {
        let mut cmd = CommandPowerOff::from_argv(&argv(&["/nonexistent/poweroff"])).unwrap();
        assert_eq!(cmd.power_off(), Err(PowerOffError::Spawn));
    }
}
