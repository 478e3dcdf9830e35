//! The validated, immutable service definition.

use super::builder::ServiceDefinitionBuilder;
use super::types::*;

/// A fully validated description of a container service.
///
/// Only [`ServiceDefinitionBuilder::build`] produces one, so every instance
/// has a valid name, a qualified image and expanded volume paths. Fields are
/// read-only; a correction means building a new definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefinition {
    pub(super) name: String,
    pub(super) image: String,
    pub(super) user_mode: UserMode,
    pub(super) network_mode: NetworkMode,
    pub(super) port_mappings: Vec<PortMapping>,
    pub(super) volumes: Vec<VolumeMount>,
    pub(super) environment: Vec<EnvVar>,
    pub(super) health_check: Option<HealthCheck>,
    pub(super) pull_policy: PullPolicy,
    pub(super) auto_update: bool,
    pub(super) security_label_disable: bool,
}

impl ServiceDefinition {
    /// Start a builder for a service called `name` running `image`.
    pub fn builder(name: impl Into<String>, image: impl Into<String>) -> ServiceDefinitionBuilder {
        ServiceDefinitionBuilder::new(name, image)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified image reference.
    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn user_mode(&self) -> UserMode {
        self.user_mode
    }

    pub fn network_mode(&self) -> NetworkMode {
        self.network_mode
    }

    pub fn port_mappings(&self) -> &[PortMapping] {
        &self.port_mappings
    }

    pub fn volumes(&self) -> &[VolumeMount] {
        &self.volumes
    }

    pub fn environment(&self) -> &[EnvVar] {
        &self.environment
    }

    pub fn health_check(&self) -> Option<&HealthCheck> {
        self.health_check.as_ref()
    }

    pub fn pull_policy(&self) -> PullPolicy {
        self.pull_policy
    }

    pub fn auto_update(&self) -> bool {
        self.auto_update
    }

    pub fn security_label_disable(&self) -> bool {
        self.security_label_disable
    }

    /// The systemd unit Quadlet generates from `<name>.container`.
    pub fn unit_name(&self) -> String {
        format!("{}.service", self.name)
    }

    /// File name of the Quadlet artifact.
    pub fn artifact_file_name(&self) -> String {
        format!("{}.container", self.name)
    }
}
