//! Value types that make up a service definition.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default root under which `./relative` volume paths are placed.
pub const DEFAULT_DATA_ROOT: &str = "/var/lib";

/// Top-level directories an absolute volume host path may live under without
/// a confirmation prompt.
pub const SYSTEM_PATH_ALLOWLIST: &[&str] = &[
    "etc", "run", "dev", "sys", "proc", "usr", "var", "opt", "home", "root", "tmp", "mnt",
    "media", "boot",
];

/// Health check interval substituted when none (or a malformed one) is given.
pub const DEFAULT_HEALTH_INTERVAL: &str = "30s";

/// Health check retry count substituted when none (or a malformed one) is given.
pub const DEFAULT_HEALTH_RETRIES: u32 = 3;

/// Which identity the container process runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UserMode {
    /// A dedicated system user named after the service (default).
    #[default]
    Dedicated,
    /// Plain root inside the container.
    Root,
    /// Root inside the container, with `PUID`/`PGID` pointing at the
    /// dedicated user (linuxserver.io style images).
    RootWithPuid,
}

impl UserMode {
    /// Parse a user mode from its kebab-case name or its menu number.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "dedicated" | "1" => Some(Self::Dedicated),
            "root" | "2" => Some(Self::Root),
            "root-with-puid" | "3" => Some(Self::RootWithPuid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserMode::Dedicated => "dedicated",
            UserMode::Root => "root",
            UserMode::RootWithPuid => "root-with-puid",
        }
    }

    /// Whether this mode needs a system account on the host.
    pub fn needs_service_user(&self) -> bool {
        !matches!(self, UserMode::Root)
    }
}

impl fmt::Display for UserMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container networking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkMode {
    /// Share the host network namespace (default).
    #[default]
    Host,
    /// Podman bridge network; requires at least one port mapping.
    Bridge,
}

impl NetworkMode {
    /// Parse a network mode from its name or its menu number.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "host" | "1" => Some(Self::Host),
            "bridge" | "2" => Some(Self::Bridge),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkMode::Host => "host",
            NetworkMode::Bridge => "bridge",
        }
    }
}

impl fmt::Display for NetworkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When Podman pulls the image on service start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PullPolicy {
    /// Pull only if the image is not present locally (default).
    #[default]
    Missing,
    /// Pull on every start.
    Always,
    /// Never pull; the image must already exist.
    Never,
}

impl PullPolicy {
    /// Parse a pull policy from its name or its menu number.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "missing" | "1" => Some(Self::Missing),
            "always" | "2" => Some(Self::Always),
            "never" | "3" => Some(Self::Never),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PullPolicy::Missing => "missing",
            PullPolicy::Always => "always",
            PullPolicy::Never => "never",
        }
    }
}

impl fmt::Display for PullPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A published port, `host:container`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortMapping {
    pub host: u16,
    pub container: u16,
}

impl fmt::Display for PortMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.container)
    }
}

/// A bind mount or named volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    pub host_path: String,
    pub container_path: String,
    pub read_only: bool,
}

impl VolumeMount {
    pub fn new(
        host_path: impl Into<String>,
        container_path: impl Into<String>,
        read_only: bool,
    ) -> Self {
        Self {
            host_path: host_path.into(),
            container_path: container_path.into(),
            read_only,
        }
    }
}

impl fmt::Display for VolumeMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host_path, self.container_path)?;
        if self.read_only {
            f.write_str(":ro")?;
        }
        Ok(())
    }
}

/// One `KEY=VALUE` environment entry. Duplicated keys are kept as separate entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

impl fmt::Display for EnvVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Container health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheck {
    pub command: String,
    pub interval: String,
    pub retries: u32,
}

/// Result of expanding a volume host path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedPath {
    pub path: String,
    /// Set when the path is absolute but outside [`SYSTEM_PATH_ALLOWLIST`].
    pub warned: bool,
}
