//! Rendering a [`ServiceDefinition`] into a [`QuadletFile`].

use super::file::{QuadletFile, Section};
use crate::definition::{NetworkMode, ServiceDefinition, UserMode};
use crate::system::Identity;

/// Host facts that are not part of the definition itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    /// Account the container runs as in `dedicated` and `root-with-puid`
    /// modes. `None` when the account does not exist yet (dry runs).
    pub identity: Option<Identity>,
    pub timezone: Option<String>,
    pub restart_policy: String,
    pub timeout_start_secs: u32,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            identity: None,
            timezone: None,
            restart_policy: "always".to_string(),
            timeout_start_secs: 900,
        }
    }
}

/// Build the unit file for `def`.
///
/// Sections are always `[Unit]`, `[Container]`, `[Service]`, `[Install]`.
/// Inside `[Container]` the scalar keys come first, then ports, volumes,
/// environment and health check lines, each in definition order.
pub fn render_definition(def: &ServiceDefinition, ctx: &RenderContext) -> QuadletFile {
    QuadletFile {
        header: vec![format!(
            "{} - generated by podsvc, regenerate instead of editing",
            def.artifact_file_name()
        )],
        sections: vec![
            unit_section(def),
            container_section(def, ctx),
            service_section(ctx),
            install_section(),
        ],
    }
}

/// Convenience wrapper returning the rendered text.
pub fn render_to_string(def: &ServiceDefinition, ctx: &RenderContext) -> String {
    render_definition(def, ctx).render()
}

fn unit_section(def: &ServiceDefinition) -> Section {
    let mut unit = Section::new("Unit");
    unit.push("Description", format!("{} container", def.name()));
    unit.push("Wants", "network-online.target");
    unit.push("After", "network-online.target");
    unit
}

fn container_section(def: &ServiceDefinition, ctx: &RenderContext) -> Section {
    let mut container = Section::new("Container");
    container.push("ContainerName", def.name());
    container.push("Image", def.image());

    if def.user_mode() == UserMode::Dedicated
        && let Some(identity) = &ctx.identity
    {
        container.push("User", identity.uid);
        container.push("Group", identity.gid);
    }

    container.push("Network", def.network_mode());
    container.push_opt("Timezone", ctx.timezone.as_deref());
    container.push("Pull", def.pull_policy());
    if def.auto_update() {
        container.push("AutoUpdate", "registry");
    }
    if def.security_label_disable() {
        container.push("SecurityLabelDisable", "true");
    }

    if def.network_mode() == NetworkMode::Bridge {
        for port in def.port_mappings() {
            container.push("PublishPort", port);
        }
    }

    for volume in def.volumes() {
        container.push("Volume", volume);
    }

    if def.user_mode() == UserMode::RootWithPuid
        && let Some(identity) = &ctx.identity
    {
        container.push("Environment", format!("PUID={}", identity.uid));
        container.push("Environment", format!("PGID={}", identity.gid));
    }
    for var in def.environment() {
        container.push("Environment", var);
    }

    if let Some(check) = def.health_check() {
        container.push("HealthCmd", &check.command);
        container.push("HealthInterval", &check.interval);
        container.push("HealthRetries", check.retries);
    }

    container
}

fn service_section(ctx: &RenderContext) -> Section {
    let mut service = Section::new("Service");
    service.push("Restart", &ctx.restart_policy);
    service.push("TimeoutStartSec", ctx.timeout_start_secs);
    service
}

fn install_section() -> Section {
    let mut install = Section::new("Install");
    install.push("WantedBy", "multi-user.target default.target");
    install
}
