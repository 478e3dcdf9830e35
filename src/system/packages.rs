//! Debian package management through `dpkg-query` and `apt-get`.

use super::process::{find_on_path, run_command_env, run_command_unchecked};
use crate::error::{PodsvcError, Result};

/// Installs named packages.
pub trait PackageManager {
    /// Whether `program` is available on `PATH`.
    fn has_command(&self, program: &str) -> bool {
        find_on_path(program).is_some()
    }

    fn is_installed(&self, package: &str) -> bool;

    /// Install `package`. Failure is [`PodsvcError::DependencyMissing`].
    fn install(&self, package: &str) -> Result<()>;
}

/// [`PackageManager`] for Debian hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct Apt;

impl PackageManager for Apt {
    fn is_installed(&self, package: &str) -> bool {
        run_command_unchecked("dpkg-query", &["-W", "-f=${Status}", package])
            .map(|output| output.success() && output.stdout.contains("install ok installed"))
            .unwrap_or(false)
    }

    fn install(&self, package: &str) -> Result<()> {
        run_command_env(
            "apt-get",
            &["install", "-y", "--no-install-recommends", package],
            &[("DEBIAN_FRONTEND", "noninteractive")],
        )
        .map_err(|e| PodsvcError::DependencyMissing(format!("{} (install failed: {})", package, e)))?;
        Ok(())
    }
}
