//! Configuration types and defaults for podsvc.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/podsvc/config.yaml";

/// Mode applied to the service data directory and its volume directories.
pub const DATA_DIR_MODE: u32 = 0o750;

/// systemd `Restart=` policy for the generated service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RestartPolicy {
    /// Restart regardless of exit status (default).
    #[default]
    Always,
    /// Restart on non-zero exit, signal or timeout.
    OnFailure,
    /// Restart on signal or timeout only.
    OnAbnormal,
    /// Never restart.
    No,
}

impl RestartPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestartPolicy::Always => "always",
            RestartPolicy::OnFailure => "on-failure",
            RestartPolicy::OnAbnormal => "on-abnormal",
            RestartPolicy::No => "no",
        }
    }
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(super) fn default_quadlet_dir() -> PathBuf {
    PathBuf::from("/etc/containers/systemd")
}

pub(super) fn default_data_root() -> String {
    crate::definition::types::DEFAULT_DATA_ROOT.to_string()
}

pub(super) fn default_settle_delay_secs() -> u64 {
    crate::activation::DEFAULT_SETTLE_DELAY.as_secs()
}

pub(super) fn default_package() -> String {
    "podman".to_string()
}

pub(super) fn default_timeout_start_secs() -> u32 {
    900
}

pub(super) fn default_timezone_file() -> PathBuf {
    PathBuf::from("/etc/timezone")
}
