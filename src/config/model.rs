//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for podsvc.
///
/// This struct represents the contents of `/etc/podsvc/config.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Locations
    // =========================================================================
    /// Directory Quadlet reads `.container` files from.
    #[serde(default = "default_quadlet_dir")]
    pub quadlet_dir: PathBuf,

    /// Parent of each service's data directory (`<data_root>/<name>`).
    #[serde(default = "default_data_root")]
    pub data_root: String,

    /// Directory for summary documents (default: the service data directory).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_dir: Option<PathBuf>,

    // =========================================================================
    // Host
    // =========================================================================
    /// Package that provides podman.
    #[serde(default = "default_package")]
    pub package: String,

    /// Container timezone. When unset it is read from `timezone_file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// File holding the host timezone name.
    #[serde(default = "default_timezone_file")]
    pub timezone_file: PathBuf,

    // =========================================================================
    // Service
    // =========================================================================
    /// Seconds to wait after `systemctl start` before checking the unit state.
    #[serde(default = "default_settle_delay_secs")]
    pub settle_delay_secs: u64,

    /// `Restart=` for the generated service.
    #[serde(default)]
    pub restart_policy: RestartPolicy,

    /// `TimeoutStartSec=`; generous because the first start may pull the image.
    #[serde(default = "default_timeout_start_secs")]
    pub timeout_start_secs: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quadlet_dir: default_quadlet_dir(),
            data_root: default_data_root(),
            summary_dir: None,
            package: default_package(),
            timezone: None,
            timezone_file: default_timezone_file(),
            settle_delay_secs: default_settle_delay_secs(),
            restart_policy: RestartPolicy::default(),
            timeout_start_secs: default_timeout_start_secs(),
        }
    }
}
