//! Implementation of the `podsvc create` command.
//!
//! # What `podsvc create` does
//!
//! 1. Collects a definition (prompts, or `--from` a YAML file) and validates it
//! 2. Shows a review and asks for confirmation (declining exits cleanly)
//! 3. Checks for systemctl and podman, installing podman if needed
//! 4. Pulls the image unless the pull policy is `never`
//! 5. Creates the service user and `<data_root>/<name>` with its volume
//!    directories (mode 0750)
//! 6. Writes `<quadlet_dir>/<name>.container`
//! 7. Reloads systemd, starts the unit and checks it once after the settle delay
//! 8. Writes the summary document (best effort)
//!
//! Steps 1-3 have no side effects on failure. From step 6 on, the unit file
//! is left in place whatever happens.

mod collect;


use crate::activation::{ActivationOutcome, activate, remediation_hints};
use crate::cli::CreateArgs;
use crate::config::{Config, DATA_DIR_MODE};
use crate::definition::{PullPolicy, ServiceDefinition};
use crate::error::{PodsvcError, Result};
use crate::fs::write_file_atomic;
use crate::prompt::{Prompter, TerminalPrompter};
use crate::quadlet::render_to_string;
use crate::summary::{SummaryReport, write_summary};
use crate::system::{Host, Identity};
use collect::{collect_definition, load_definition};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Mode of the generated unit file.
const ARTIFACT_MODE: u32 = 0o644;

/// How a create run ended (errors aside).
#[derive(Debug)]
pub enum CreateResult {
    /// The operator declined at the review step; nothing was changed.
    Declined,
    /// `--dry-run`: the rendered unit file, nothing was changed.
    DryRun { artifact: String },
    /// The unit file was written and handed to systemd.
    Created {
        unit: String,
        artifact_path: PathBuf,
        identity: Option<Identity>,
        outcome: ActivationOutcome,
        summary_path: Option<PathBuf>,
    },
}

/// Execute the `podsvc create` command against the real host.
pub fn cmd_create(args: CreateArgs, config: &Config) -> Result<()> {
    let stdin = io::stdin();
    let mut prompter = TerminalPrompter::new(stdin.lock(), io::stdout());
    let host = Host::system();

    let result = run_create(&args, config, &host, &mut prompter, std::thread::sleep)?;
    report(result)
}

/// The create pipeline, with every host interaction injected.
pub fn run_create<F>(
    args: &CreateArgs,
    config: &Config,
    host: &Host<'_>,
    prompter: &mut dyn Prompter,
    sleep: F,
) -> Result<CreateResult>
where
    F: FnOnce(Duration),
{
    let definition = match &args.from {
        Some(path) => load_definition(path, prompter, config)?,
        None => collect_definition(prompter, config)?,
    };

    if args.dry_run {
        let identity = if definition.user_mode().needs_service_user() {
            host.provisioner.lookup_user(definition.name())?
        } else {
            None
        };
        if identity.is_none() && definition.user_mode().needs_service_user() {
            prompter.notice(&format!(
                "Note: user '{}' does not exist yet; User/PUID lines are filled in on create.",
                definition.name()
            ));
        }
        let artifact = render_to_string(&definition, &config.render_context(identity));
        return Ok(CreateResult::DryRun { artifact });
    }

    let artifact_path = config.artifact_path(definition.name());
    prompter.notice(&review(&definition, config, &artifact_path));
    if artifact_path.exists() {
        prompter.notice(&format!(
            "{} already exists and will be regenerated.",
            artifact_path.display()
        ));
    }
    if !args.yes && !prompter.confirm("Create this service?", true)? {
        return Ok(CreateResult::Declined);
    }

    ensure_dependencies(host, config, prompter)?;

    if definition.pull_policy() != PullPolicy::Never {
        prompter.notice(&format!("Pulling {}...", definition.image()));
        host.registry.pull(definition.image())?;
    }

    let identity = provision(&definition, config, host)?;

    let artifact = render_to_string(&definition, &config.render_context(identity));
    write_file_atomic(&artifact_path, &artifact, ARTIFACT_MODE)?;
    info!(path = %artifact_path.display(), "unit file written");
    prompter.notice(&format!("Wrote {}", artifact_path.display()));

    let unit = definition.unit_name();
    let outcome = activate(host.supervisor, &unit, config.settle_delay(), sleep);
    if let ActivationOutcome::FailedToReload { reason } = &outcome {
        return Err(PodsvcError::ReloadFailed(format!(
            "{} (unit file kept at {})",
            reason,
            artifact_path.display()
        )));
    }

    let data_dir = config.service_data_dir(definition.name());
    let summary_path = config.summary_path(definition.name());
    let summary = SummaryReport::now(
        &definition,
        identity,
        &data_dir,
        &artifact_path,
        &artifact,
        &outcome,
    );
    let summary_path = match write_summary(&summary_path, &summary) {
        Ok(()) => Some(summary_path),
        Err(e) => {
            warn!("{}", e);
            prompter.notice(&format!("Warning: {}", e));
            None
        }
    };

    Ok(CreateResult::Created {
        unit,
        artifact_path,
        identity,
        outcome,
        summary_path,
    })
}

/// systemctl must exist; podman is installed through the package manager
/// when missing.
fn ensure_dependencies(host: &Host<'_>, config: &Config, prompter: &mut dyn Prompter) -> Result<()> {
    if !host.packages.has_command("systemctl") {
        return Err(PodsvcError::DependencyMissing(
            "systemctl (systemd is required to run Quadlet units)".to_string(),
        ));
    }

    if host.packages.has_command("podman") {
        return Ok(());
    }
    if host.packages.is_installed(&config.package) {
        return Err(PodsvcError::DependencyMissing(format!(
            "podman (package '{}' is installed but podman is not on PATH)",
            config.package
        )));
    }

    prompter.notice(&format!("Installing {}...", config.package));
    host.packages.install(&config.package)?;
    if !host.packages.has_command("podman") {
        return Err(PodsvcError::DependencyMissing(format!(
            "podman (still not on PATH after installing '{}')",
            config.package
        )));
    }
    Ok(())
}

/// Create the service user (when the mode needs one) and the data
/// directories. Returns the identity rendered into the unit file.
fn provision(def: &ServiceDefinition, config: &Config, host: &Host<'_>) -> Result<Option<Identity>> {
    let data_dir = config.service_data_dir(def.name());

    let identity = if def.user_mode().needs_service_user() {
        Some(host.provisioner.ensure_user(def.name(), &data_dir)?)
    } else {
        None
    };
    let owner = identity.unwrap_or(Identity::ROOT);

    host.provisioner.create_dir(&data_dir, owner, DATA_DIR_MODE)?;
    for volume in def.volumes() {
        let host_path = Path::new(&volume.host_path);
        if host_path.components().any(|c| c == Component::ParentDir) {
            return Err(PodsvcError::invalid(
                "volume",
                format!("host path '{}' must not contain '..'", volume.host_path),
            ));
        }
        if host_path != data_dir && host_path.starts_with(&data_dir) {
            host.provisioner.create_dir(host_path, owner, DATA_DIR_MODE)?;
        }
    }

    Ok(identity)
}

/// Review shown before asking for confirmation.
fn review(def: &ServiceDefinition, config: &Config, artifact_path: &Path) -> String {
    let mut lines = vec![
        String::new(),
        "Review".to_string(),
        "------".to_string(),
        format!("Name:         {}", def.name()),
        format!("Image:        {}", def.image()),
        format!("User mode:    {}", def.user_mode()),
        format!("Network:      {}", def.network_mode()),
    ];
    for port in def.port_mappings() {
        lines.push(format!("Port:         {}", port));
    }
    for volume in def.volumes() {
        lines.push(format!("Volume:       {}", volume));
    }
    for var in def.environment() {
        lines.push(format!("Environment:  {}", var));
    }
    if let Some(check) = def.health_check() {
        lines.push(format!(
            "Health check: {} (every {}, {} retries)",
            check.command, check.interval, check.retries
        ));
    }
    lines.push(format!("Pull policy:  {}", def.pull_policy()));
    lines.push(format!(
        "Auto-update:  {}",
        if def.auto_update() { "yes" } else { "no" }
    ));
    lines.push(format!(
        "Data dir:     {}",
        config.service_data_dir(def.name()).display()
    ));
    lines.push(format!("Unit file:    {}", artifact_path.display()));
    lines.push(String::new());
    lines.join("\n")
}

/// Print the final status report and turn a failed start into an error.
fn report(result: CreateResult) -> Result<()> {
    match result {
        CreateResult::Declined => {
            println!("Aborted, nothing was changed.");
            Ok(())
        }
        CreateResult::DryRun { artifact } => {
            print!("{}", artifact);
            Ok(())
        }
        CreateResult::Created {
            unit,
            artifact_path,
            identity,
            outcome,
            summary_path,
        } => {
            println!();
            if let Some(id) = identity {
                println!("Service user:  uid {}, gid {}", id.uid, id.gid);
            }
            println!("Unit file:     {}", artifact_path.display());
            if let Some(path) = &summary_path {
                println!("Summary:       {}", path.display());
            }
            println!("Status:        {}", outcome.label());

            if !outcome.is_started() {
                eprintln!();
                eprintln!("The unit file was kept for inspection. Next steps:");
                for hint in remediation_hints(&unit, &artifact_path) {
                    eprintln!("  {}", hint);
                }
                eprintln!();
            }
            outcome.into_result(&unit)
        }
    }
}
