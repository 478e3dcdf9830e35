//! systemd control through `systemctl`.

use super::process::{run_command, run_command_unchecked};
use crate::error::Result;

/// The process supervisor that owns the generated unit.
pub trait Supervisor {
    /// Reload unit files so Quadlet regenerates `<name>.service`.
    fn daemon_reload(&self) -> Result<()>;

    /// Start a unit.
    fn start(&self, unit: &str) -> Result<()>;

    /// Whether the unit is currently `active`.
    fn is_active(&self, unit: &str) -> Result<bool>;
}

/// [`Supervisor`] backed by the system instance of `systemctl`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Systemctl;

impl Supervisor for Systemctl {
    fn daemon_reload(&self) -> Result<()> {
        run_command("systemctl", &["daemon-reload"])?;
        Ok(())
    }

    fn start(&self, unit: &str) -> Result<()> {
        run_command("systemctl", &["start", unit])?;
        Ok(())
    }

    fn is_active(&self, unit: &str) -> Result<bool> {
        // Non-zero exit just means "not active".
        let output = run_command_unchecked("systemctl", &["is-active", unit])?;
        Ok(output.stdout == "active")
    }
}
