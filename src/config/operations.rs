//! Config loading, validation, and path helpers.

use super::model::Config;
use super::types::DEFAULT_CONFIG_PATH;
use crate::quadlet::RenderContext;
use crate::system::Identity;
use crate::error::{PodsvcError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Longest settle delay accepted; anything longer is almost certainly a typo.
const MAX_SETTLE_DELAY_SECS: u64 = 300;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            PodsvcError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load an explicitly named config file, or the default file if it
    /// exists, or fall back to defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    debug!("no config file at {}, using defaults", DEFAULT_CONFIG_PATH);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty mapping.
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| PodsvcError::UserError(format!("failed to parse config YAML: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `quadlet_dir` and `data_root` must be absolute
    /// - `settle_delay_secs` must be at most 300
    /// - `timeout_start_secs` must be positive
    /// - `package` must be non-empty
    pub fn validate(&self) -> Result<()> {
        if !self.quadlet_dir.is_absolute() {
            return Err(PodsvcError::UserError(format!(
                "config validation failed: quadlet_dir must be absolute (found '{}')",
                self.quadlet_dir.display()
            )));
        }

        if !self.data_root.starts_with('/') {
            return Err(PodsvcError::UserError(format!(
                "config validation failed: data_root must be absolute (found '{}')",
                self.data_root
            )));
        }

        if self.settle_delay_secs > MAX_SETTLE_DELAY_SECS {
            return Err(PodsvcError::UserError(format!(
                "config validation failed: settle_delay_secs must be at most {}",
                MAX_SETTLE_DELAY_SECS
            )));
        }

        if self.timeout_start_secs == 0 {
            return Err(PodsvcError::UserError(
                "config validation failed: timeout_start_secs must be greater than 0".to_string(),
            ));
        }

        if self.package.trim().is_empty() {
            return Err(PodsvcError::UserError(
                "config validation failed: package must be non-empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    /// Path of the `.container` file for `name`.
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.quadlet_dir.join(format!("{}.container", name))
    }

    /// `<data_root>/<name>`.
    pub fn service_data_dir(&self, name: &str) -> PathBuf {
        Path::new(&self.data_root).join(name)
    }

    /// Where the summary document for `name` is written.
    pub fn summary_path(&self, name: &str) -> PathBuf {
        let dir = self
            .summary_dir
            .clone()
            .unwrap_or_else(|| self.service_data_dir(name));
        dir.join(format!("{}-service-info.txt", name))
    }

    /// Configured timezone, else the first line of `timezone_file`, else none.
    pub fn resolve_timezone(&self) -> Option<String> {
        if let Some(tz) = self.timezone.as_deref().map(str::trim)
            && !tz.is_empty()
        {
            return Some(tz.to_string());
        }
        std::fs::read_to_string(&self.timezone_file)
            .ok()
            .and_then(|content| content.lines().next().map(|l| l.trim().to_string()))
            .filter(|tz| !tz.is_empty())
    }

    /// Render settings for a service running as `identity`.
    pub fn render_context(&self, identity: Option<Identity>) -> RenderContext {
        RenderContext {
            identity,
            timezone: self.resolve_timezone(),
            restart_policy: self.restart_policy.to_string(),
            timeout_start_secs: self.timeout_start_secs,
        }
    }
}
