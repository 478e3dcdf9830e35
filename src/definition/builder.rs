//! Builder that turns raw, possibly unvalidated input into a [`ServiceDefinition`].

use super::model::ServiceDefinition;
use super::normalize::{
    expand_volume_path_in, has_parent_component, normalize_image_name, validate_name,
};
use super::types::*;
use crate::error::{PodsvcError, Result};

/// Collects definition fields and validates them all at once in [`build`].
///
/// Defaults: dedicated user, host network, pull `missing`, auto-update on,
/// security labels left enabled.
///
/// [`build`]: ServiceDefinitionBuilder::build
#[derive(Debug, Clone)]
pub struct ServiceDefinitionBuilder {
    name: String,
    image: String,
    data_root: String,
    user_mode: UserMode,
    network_mode: NetworkMode,
    port_mappings: Vec<PortMapping>,
    volumes: Vec<VolumeMount>,
    environment: Vec<EnvVar>,
    health_check: Option<HealthCheck>,
    pull_policy: PullPolicy,
    auto_update: bool,
    security_label_disable: bool,
}

impl ServiceDefinitionBuilder {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            data_root: DEFAULT_DATA_ROOT.to_string(),
            user_mode: UserMode::default(),
            network_mode: NetworkMode::default(),
            port_mappings: Vec::new(),
            volumes: Vec::new(),
            environment: Vec::new(),
            health_check: None,
            pull_policy: PullPolicy::default(),
            auto_update: true,
            security_label_disable: false,
        }
    }

    /// Root used to expand `./relative` volume paths.
    pub fn data_root(mut self, data_root: impl Into<String>) -> Self {
        self.data_root = data_root.into();
        self
    }

    pub fn user_mode(mut self, mode: UserMode) -> Self {
        self.user_mode = mode;
        self
    }

    pub fn network_mode(mut self, mode: NetworkMode) -> Self {
        self.network_mode = mode;
        self
    }

    pub fn port(mut self, mapping: PortMapping) -> Self {
        self.port_mappings.push(mapping);
        self
    }

    pub fn ports(mut self, mappings: impl IntoIterator<Item = PortMapping>) -> Self {
        self.port_mappings.extend(mappings);
        self
    }

    pub fn volume(mut self, volume: VolumeMount) -> Self {
        self.volumes.push(volume);
        self
    }

    pub fn volumes(mut self, volumes: impl IntoIterator<Item = VolumeMount>) -> Self {
        self.volumes.extend(volumes);
        self
    }

    /// Append an environment entry. A repeated key adds another entry.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.push(EnvVar {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn env_vars(mut self, vars: impl IntoIterator<Item = EnvVar>) -> Self {
        self.environment.extend(vars);
        self
    }

    pub fn health_check(mut self, health_check: Option<HealthCheck>) -> Self {
        self.health_check = health_check;
        self
    }

    pub fn pull_policy(mut self, policy: PullPolicy) -> Self {
        self.pull_policy = policy;
        self
    }

    pub fn auto_update(mut self, enabled: bool) -> Self {
        self.auto_update = enabled;
        self
    }

    pub fn security_label_disable(mut self, disabled: bool) -> Self {
        self.security_label_disable = disabled;
        self
    }

    /// Validate every field and produce the definition.
    pub fn build(self) -> Result<ServiceDefinition> {
        let name = validate_name(&self.name)?;

        let raw_image = self.image.trim();
        if raw_image.is_empty() {
            return Err(PodsvcError::EmptyInput("image".to_string()));
        }
        if raw_image.chars().any(char::is_whitespace) {
            return Err(PodsvcError::invalid(
                "image",
                format!("'{}' must not contain whitespace", raw_image),
            ));
        }
        let image = normalize_image_name(raw_image);

        match self.network_mode {
            NetworkMode::Bridge if self.port_mappings.is_empty() => {
                return Err(PodsvcError::invalid(
                    "port mappings",
                    "bridge networking needs at least one host:container port",
                ));
            }
            NetworkMode::Host if !self.port_mappings.is_empty() => {
                return Err(PodsvcError::invalid(
                    "port mappings",
                    "ports are only published with bridge networking",
                ));
            }
            _ => {}
        }

        let volumes = self
            .volumes
            .into_iter()
            .map(|volume| {
                reject_line_breaks("volume", &volume.host_path)?;
                reject_line_breaks("volume", &volume.container_path)?;
                if has_parent_component(&volume.host_path) {
                    return Err(PodsvcError::invalid(
                        "volume",
                        format!("host path '{}' must not contain '..'", volume.host_path),
                    ));
                }
                let expanded = expand_volume_path_in(&volume.host_path, &name, &self.data_root);
                Ok(VolumeMount {
                    host_path: expanded.path,
                    ..volume
                })
            })
            .collect::<Result<Vec<_>>>()?;

        for var in &self.environment {
            if var.key.trim().is_empty() {
                return Err(PodsvcError::EmptyInput(
                    "environment variable name".to_string(),
                ));
            }
            reject_line_breaks("environment variable", &var.key)?;
            reject_line_breaks("environment variable", &var.value)?;
        }

        if let Some(check) = &self.health_check {
            if check.command.trim().is_empty() {
                return Err(PodsvcError::EmptyInput("health check command".to_string()));
            }
            reject_line_breaks("health check command", &check.command)?;
            reject_line_breaks("health check interval", &check.interval)?;
        }

        Ok(ServiceDefinition {
            name,
            image,
            user_mode: self.user_mode,
            network_mode: self.network_mode,
            port_mappings: self.port_mappings,
            volumes,
            environment: self.environment,
            health_check: self.health_check,
            pull_policy: self.pull_policy,
            auto_update: self.auto_update,
            security_label_disable: self.security_label_disable,
        })
    }
}

/// Each rendered entry is a single `Key=Value` line.
fn reject_line_breaks(field: &str, value: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        return Err(PodsvcError::invalid(
            field,
            format!("'{}' must not contain line breaks", value.escape_debug()),
        ));
    }
    Ok(())
}
