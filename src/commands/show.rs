//! Implementation of the `podsvc show` command.
//!
//! Displays an installed service's unit file, broken down by section, with
//! the unit's current state.

use crate::cli::ShowArgs;
use crate::config::Config;
use crate::definition::validate_name;
use crate::error::{PodsvcError, Result};
use crate::quadlet::QuadletFile;
use crate::system::{Supervisor, Systemctl};
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

/// Execute the `podsvc show` command.
pub fn cmd_show(args: ShowArgs, config: &Config) -> Result<()> {
    let name = validate_name(&args.name)?;
    let path = config.artifact_path(&name);
    let file = load_artifact(&path)?;

    let unit = format!("{}.service", name);
    let state = match Systemctl.is_active(&unit) {
        Ok(active) => Some(active),
        Err(e) => {
            debug!(unit = %unit, "state unavailable: {}", e);
            None
        }
    };

    print!("{}", describe(&name, &path, &file, state, config));
    Ok(())
}

/// Read and parse a generated unit file.
pub fn load_artifact(path: &Path) -> Result<QuadletFile> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PodsvcError::UserError(format!(
            "no unit file at '{}': {}\n\n\
             Run `podsvc create` to generate one.",
            path.display(),
            e
        ))
    })?;
    QuadletFile::parse(&content)
}

/// Render the overview printed by `show`.
pub fn describe(
    name: &str,
    path: &Path,
    file: &QuadletFile,
    state: Option<bool>,
    config: &Config,
) -> String {
    let mut out = String::new();
    let rule = "=".repeat(80);

    let state = match state {
        Some(true) => "active",
        Some(false) => "inactive",
        None => "unknown",
    };

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{}.service [{}]", name, state);
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out);
    let _ = writeln!(out, "Unit file:  {}", path.display());
    let summary = config.summary_path(name);
    if summary.exists() {
        let _ = writeln!(out, "Summary:    {}", summary.display());
    }

    if let Some(container) = file.section("Container") {
        if let Some(image) = container.get("Image") {
            let _ = writeln!(out, "Image:      {}", image);
        }
        if let Some(network) = container.get("Network") {
            let _ = writeln!(out, "Network:    {}", network);
        }
        if let Some(user) = container.get("User") {
            let _ = writeln!(out, "User:       {}", user);
        }
        for volume in container.get_all("Volume") {
            let _ = writeln!(out, "Volume:     {}", volume);
        }
    }

    for section in &file.sections {
        let _ = writeln!(out);
        let _ = writeln!(out, "[{}]", section.name);
        for (key, value) in &section.entries {
            let _ = writeln!(out, "  {:<16}{}", key, value);
        }
    }

    out
}
