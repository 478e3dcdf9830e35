//! Gathering a definition from the operator or from a file.

use crate::config::Config;
use crate::definition::{
    DefinitionFile, NetworkMode, PullPolicy, ServiceDefinition, UserMode, VolumeMount,
    expand_volume_path_in, normalize_health_check, normalize_image_name, parse_env_pair,
    parse_list_input, parse_port_mapping, parse_volume_spec, relative_form, validate_name,
};
use crate::error::{PodsvcError, Result};
use crate::prompt::Prompter;
use std::path::Path;
use tracing::warn;

const USER_MODES: [UserMode; 3] = [UserMode::Dedicated, UserMode::Root, UserMode::RootWithPuid];
const NETWORK_MODES: [NetworkMode; 2] = [NetworkMode::Host, NetworkMode::Bridge];
const PULL_POLICIES: [PullPolicy; 3] = [PullPolicy::Missing, PullPolicy::Always, PullPolicy::Never];

/// Ask the operator for every field and build the definition.
///
/// The name and image are validated as soon as they are entered; an invalid
/// answer ends the session with an error.
pub fn collect_definition(prompter: &mut dyn Prompter, config: &Config) -> Result<ServiceDefinition> {
    let name = validate_name(&prompter.ask("Service name (lowercase, e.g. nginxpm)", None)?)?;

    let raw_image = prompter.ask("Container image (e.g. jc21/nginx-proxy-manager)", None)?;
    if raw_image.trim().is_empty() {
        return Err(PodsvcError::EmptyInput("image".to_string()));
    }
    prompter.notice(&format!("Using image {}", normalize_image_name(&raw_image)));

    let dedicated_label = format!("dedicated user '{}' (recommended)", name);
    let user_mode = USER_MODES[prompter.choose(
        "Run the container as:",
        &[
            dedicated_label.as_str(),
            "root",
            "root with PUID/PGID of a dedicated user (linuxserver.io images)",
        ],
        0,
    )?];

    let network_mode = NETWORK_MODES[prompter.choose(
        "Network mode:",
        &["host (share the host network)", "bridge (publish selected ports)"],
        0,
    )?];

    let mut builder = ServiceDefinition::builder(name.clone(), raw_image)
        .data_root(config.data_root.clone())
        .user_mode(user_mode)
        .network_mode(network_mode);

    if network_mode == NetworkMode::Bridge {
        let answer = prompter.ask("Ports to publish, host:container, comma separated", None)?;
        for port in parse_list_input(&answer, ',') {
            builder = builder.port(parse_port_mapping(&port)?);
        }
    }

    let hint = format!(
        "Volumes, host:container[:ro], comma separated (./path = {}/{}/path)",
        config.data_root.trim_end_matches('/'),
        name
    );
    let answer = prompter.ask(&hint, Some(""))?;
    for spec in parse_list_input(&answer, ',') {
        let volume = parse_volume_spec(&spec)?;
        if let Some(volume) = confirm_volume(prompter, volume, &name, &config.data_root)? {
            builder = builder.volume(volume);
        }
    }

    let answer = prompter.ask("Extra environment variables, KEY=VALUE, comma separated", Some(""))?;
    for pair in parse_list_input(&answer, ',') {
        let var = parse_env_pair(&pair)?;
        builder = builder.env(var.key, var.value);
    }

    if prompter.confirm("Add a health check?", false)? {
        let command = prompter.ask("Health check command (e.g. curl -f http://localhost/)", None)?;
        let interval = prompter.ask("Health check interval", Some("30s"))?;
        let retries = prompter.ask("Health check retries", Some("3"))?;
        let normalized = normalize_health_check(&command, &interval, &retries)?;
        for warning in &normalized.warnings {
            prompter.notice(&format!("Warning: {}", warning));
        }
        if normalized.health_check.is_none() {
            prompter.notice("No command given, skipping the health check.");
        }
        builder = builder.health_check(normalized.health_check);
    }

    let pull_policy = PULL_POLICIES[prompter.choose(
        "Image pull policy:",
        &[
            "missing (pull only if not present)",
            "always (pull on every start)",
            "never (image must already exist)",
        ],
        0,
    )?];

    let auto_update = prompter.confirm("Enable automatic image updates (podman auto-update)?", true)?;
    let security_label_disable =
        prompter.confirm("Disable SELinux/AppArmor labelling for this container?", false)?;

    builder
        .pull_policy(pull_policy)
        .auto_update(auto_update)
        .security_label_disable(security_label_disable)
        .build()
}

/// Confirm an absolute host path outside the system allowlist.
///
/// Offers the relative form first; if that is declined the operator may keep
/// the path as-is, otherwise the volume is dropped.
fn confirm_volume(
    prompter: &mut dyn Prompter,
    volume: VolumeMount,
    name: &str,
    data_root: &str,
) -> Result<Option<VolumeMount>> {
    let expanded = expand_volume_path_in(&volume.host_path, name, data_root);
    if !expanded.warned {
        return Ok(Some(volume));
    }

    let relative = relative_form(&volume.host_path);
    let relative_expanded = expand_volume_path_in(&relative, name, data_root);
    let question = format!(
        "'{}' is outside the usual system directories. Use {} ({}) instead?",
        volume.host_path, relative, relative_expanded.path
    );
    if prompter.confirm(&question, true)? {
        return Ok(Some(VolumeMount {
            host_path: relative,
            ..volume
        }));
    }

    if prompter.confirm(&format!("Keep '{}' as-is?", volume.host_path), false)? {
        return Ok(Some(volume));
    }

    prompter.notice(&format!("Skipping volume {}", volume));
    Ok(None)
}

/// Build a definition from a YAML file, reporting non-fatal notices.
pub fn load_definition(
    path: &Path,
    prompter: &mut dyn Prompter,
    config: &Config,
) -> Result<ServiceDefinition> {
    let loaded = DefinitionFile::load(path)?.into_builder(&config.data_root)?;
    for warning in &loaded.warnings {
        warn!("{}", warning);
        prompter.notice(&format!("Warning: {}", warning));
    }
    loaded.builder.build()
}
