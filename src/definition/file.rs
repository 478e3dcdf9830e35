//! YAML definition files for non-interactive runs (`--from`).
//!
//! ```yaml
//! name: nginxpm
//! image: jc21/nginx-proxy-manager
//! network_mode: bridge
//! ports: ["80:80", "443:443"]
//! volumes: ["./data:/data", "./letsencrypt:/etc/letsencrypt"]
//! environment: ["TZ=Europe/Berlin"]
//! ```

use super::builder::ServiceDefinitionBuilder;
use super::normalize::{
    expand_volume_path_in, normalize_health_check, parse_env_pair, parse_port_mapping,
    parse_volume_spec, validate_name,
};
use super::types::{NetworkMode, PullPolicy, UserMode};
use crate::error::{PodsvcError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Health check section of a definition file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthCheckFile {
    pub command: String,
    #[serde(default)]
    pub interval: Option<String>,
    /// Accepts either a YAML number or a string; malformed values fall back
    /// to the default.
    #[serde(default)]
    pub retries: Option<serde_yaml::Value>,
}

/// On-disk form of a service definition. Unknown keys are rejected so typos
/// are not silently ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefinitionFile {
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub user_mode: UserMode,
    #[serde(default)]
    pub network_mode: NetworkMode,
    /// `host:container` or a single port (a bare YAML number is accepted).
    #[serde(default)]
    pub ports: Vec<serde_yaml::Value>,
    /// `host:container[:ro]`.
    #[serde(default)]
    pub volumes: Vec<String>,
    /// `KEY=VALUE`, applied in order; repeated keys are all kept.
    #[serde(default)]
    pub environment: Vec<String>,
    #[serde(default)]
    pub health_check: Option<HealthCheckFile>,
    #[serde(default)]
    pub pull_policy: PullPolicy,
    #[serde(default = "default_true")]
    pub auto_update: bool,
    #[serde(default)]
    pub security_label_disable: bool,
}

fn default_true() -> bool {
    true
}

fn scalar_text(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        _ => String::from("?"),
    }
}

/// A builder prepared from a definition file, plus non-fatal notices.
#[derive(Debug)]
pub struct LoadedDefinition {
    pub builder: ServiceDefinitionBuilder,
    pub warnings: Vec<String>,
}

impl DefinitionFile {
    /// Read and parse a definition file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PodsvcError::UserError(format!(
                "failed to read definition file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            PodsvcError::UserError(format!("failed to parse definition file: {}", e))
        })
    }

    /// Parse every list entry and prepare a builder rooted at `data_root`.
    ///
    /// Absolute volume paths outside the system allowlist are accepted, since
    /// there is nobody to confirm them, but are reported as warnings.
    pub fn into_builder(self, data_root: &str) -> Result<LoadedDefinition> {
        let mut warnings = Vec::new();
        let name = validate_name(&self.name)?;

        let ports = self
            .ports
            .iter()
            .map(|p| parse_port_mapping(&scalar_text(p)))
            .collect::<Result<Vec<_>>>()?;

        let volumes = self
            .volumes
            .iter()
            .map(|v| parse_volume_spec(v))
            .collect::<Result<Vec<_>>>()?;
        for volume in &volumes {
            if expand_volume_path_in(&volume.host_path, &name, data_root).warned {
                warnings.push(format!(
                    "volume host path '{}' is outside the usual system directories",
                    volume.host_path
                ));
            }
        }

        let environment = self
            .environment
            .iter()
            .map(|e| parse_env_pair(e))
            .collect::<Result<Vec<_>>>()?;

        let health_check = match self.health_check {
            Some(check) => {
                let retries = check.retries.as_ref().map(scalar_text).unwrap_or_default();
                let normalized = normalize_health_check(
                    &check.command,
                    check.interval.as_deref().unwrap_or(""),
                    &retries,
                )?;
                warnings.extend(normalized.warnings);
                normalized.health_check
            }
            None => None,
        };

        let builder = ServiceDefinitionBuilder::new(name, self.image)
            .data_root(data_root)
            .user_mode(self.user_mode)
            .network_mode(self.network_mode)
            .ports(ports)
            .volumes(volumes)
            .env_vars(environment)
            .health_check(health_check)
            .pull_policy(self.pull_policy)
            .auto_update(self.auto_update)
            .security_label_disable(self.security_label_disable);

        Ok(LoadedDefinition { builder, warnings })
    }
}
