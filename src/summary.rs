//! Human-readable record of a generated service.
//!
//! The summary is written after everything else and never changes the result
//! of a run: callers log a [`PodsvcError::SummaryWriteFailed`] and carry on.

use crate::activation::ActivationOutcome;
use crate::definition::{ServiceDefinition, UserMode};
use crate::error::{PodsvcError, Result};
use crate::fs::write_file_atomic;
use crate::system::Identity;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write as _;
use std::path::Path;

/// Everything the summary document reports.
#[derive(Debug)]
pub struct SummaryReport<'a> {
    pub definition: &'a ServiceDefinition,
    pub identity: Option<Identity>,
    pub data_dir: &'a Path,
    pub artifact_path: &'a Path,
    pub artifact: &'a str,
    pub outcome: &'a ActivationOutcome,
    pub generated_at: DateTime<Utc>,
    pub host: String,
}

impl<'a> SummaryReport<'a> {
    /// Report stamped with the current time and host name.
    pub fn now(
        definition: &'a ServiceDefinition,
        identity: Option<Identity>,
        data_dir: &'a Path,
        artifact_path: &'a Path,
        artifact: &'a str,
        outcome: &'a ActivationOutcome,
    ) -> Self {
        Self {
            definition,
            identity,
            data_dir,
            artifact_path,
            artifact,
            outcome,
            generated_at: Utc::now(),
            host: current_host(),
        }
    }

    /// Render the document.
    pub fn render(&self) -> String {
        let def = self.definition;
        let unit = def.unit_name();
        let mut out = String::new();

        let title = format!("Service summary: {}", def.name());
        let _ = writeln!(out, "{}", title);
        let _ = writeln!(out, "{}", "=".repeat(title.len()));
        let _ = writeln!(out);
        field(&mut out, "Service", def.name());
        field(&mut out, "Unit", &unit);
        field(&mut out, "Status", self.outcome.label());
        field(
            &mut out,
            "Generated",
            &self
                .generated_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        field(&mut out, "Host", &self.host);
        let _ = writeln!(out);

        field(&mut out, "Image", def.image());
        field(&mut out, "User mode", &self.user_line());
        field(&mut out, "Network", def.network_mode().as_str());
        list(
            &mut out,
            "Ports",
            def.port_mappings().iter().map(|p| p.to_string()),
        );
        list(&mut out, "Volumes", def.volumes().iter().map(|v| v.to_string()));
        list(
            &mut out,
            "Environment",
            def.environment().iter().map(|e| e.to_string()),
        );
        let health = match def.health_check() {
            Some(check) => format!(
                "{} (every {}, {} retries)",
                check.command, check.interval, check.retries
            ),
            None => "none".to_string(),
        };
        field(&mut out, "Health check", &health);
        field(&mut out, "Pull policy", def.pull_policy().as_str());
        field(
            &mut out,
            "Auto-update",
            if def.auto_update() {
                "enabled (registry)"
            } else {
                "disabled"
            },
        );
        field(
            &mut out,
            "SELinux labels",
            if def.security_label_disable() {
                "disabled"
            } else {
                "enabled"
            },
        );
        let _ = writeln!(out);

        field(&mut out, "Data directory", &self.data_dir.display().to_string());
        field(
            &mut out,
            "Unit file",
            &self.artifact_path.display().to_string(),
        );
        let _ = writeln!(out);

        heading(&mut out, "Management");
        let _ = writeln!(out, "  systemctl status {}", unit);
        let _ = writeln!(out, "  systemctl restart {}", unit);
        let _ = writeln!(out, "  journalctl -u {} -f", unit);
        let _ = writeln!(out, "  podman logs -f {}", def.name());
        if def.auto_update() {
            let _ = writeln!(out, "  podman auto-update --dry-run");
        }
        let _ = writeln!(out);

        heading(&mut out, "Unit file contents");
        out.push_str(self.artifact);
        if !self.artifact.ends_with('\n') {
            out.push('\n');
        }
        out
    }

    fn user_line(&self) -> String {
        let mode = self.definition.user_mode();
        match (mode, self.identity) {
            (UserMode::Root, _) => mode.to_string(),
            (_, Some(id)) => format!("{} (uid {}, gid {})", mode, id.uid, id.gid),
            (_, None) => mode.to_string(),
        }
    }
}

fn field(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "{:<16}{}", format!("{}:", label), value);
}

fn list(out: &mut String, label: &str, items: impl Iterator<Item = String>) {
    let items: Vec<String> = items.collect();
    if items.is_empty() {
        field(out, label, "none");
        return;
    }
    let _ = writeln!(out, "{}:", label);
    for item in items {
        let _ = writeln!(out, "  {}", item);
    }
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "-".repeat(title.len()));
}

fn current_host() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Write the summary to `path` (mode `0640`).
pub fn write_summary(path: &Path, report: &SummaryReport<'_>) -> Result<()> {
    write_file_atomic(path, &report.render(), 0o640).map_err(|e| {
        PodsvcError::SummaryWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{NetworkMode, PortMapping, VolumeMount};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn definition() -> ServiceDefinition {
        ServiceDefinition::builder("nginxpm", "jc21/nginx-proxy-manager")
            .network_mode(NetworkMode::Bridge)
            .port(PortMapping {
                host: 81,
                container: 81,
            })
            .volume(VolumeMount::new("./data", "/data", false))
            .build()
            .unwrap()
    }

    fn report<'a>(
        def: &'a ServiceDefinition,
        outcome: &'a ActivationOutcome,
        artifact: &'a str,
    ) -> SummaryReport<'a> {
        SummaryReport {
            definition: def,
            identity: Some(Identity { uid: 999, gid: 999 }),
            data_dir: Path::new("/var/lib/nginxpm"),
            artifact_path: Path::new("/etc/containers/systemd/nginxpm.container"),
            artifact,
            outcome,
            generated_at: Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap(),
            host: "lxc-test".to_string(),
        }
    }

    #[test]
    fn test_summary_lists_resolved_fields_and_artifact() {
        let def = definition();
        let outcome = ActivationOutcome::Started;
        let artifact = "[Container]\nImage=docker.io/jc21/nginx-proxy-manager\n";
        let text = report(&def, &outcome, artifact).render();

        assert!(text.starts_with("Service summary: nginxpm\n"));
        assert!(text.contains("Status:         running\n"));
        assert!(text.contains("Generated:      2026-10-19T12:00:00Z\n"));
        assert!(text.contains("Host:           lxc-test\n"));
        assert!(text.contains("User mode:      dedicated (uid 999, gid 999)\n"));
        assert!(text.contains("Ports:\n  81:81\n"));
        assert!(text.contains("Volumes:\n  /var/lib/nginxpm/data:/data\n"));
        assert!(text.contains("Environment:    none\n"));
        assert!(text.contains("journalctl -u nginxpm.service -f"));
        assert!(text.ends_with(artifact));
    }

    #[test]
    fn test_summary_reports_failure_status() {
        let def = definition();
        let outcome = ActivationOutcome::FailedToStart {
            reason: "inactive".to_string(),
        };
        let text = report(&def, &outcome, "[Unit]").render();
        assert!(text.contains("Status:         failed to start\n"));
        assert!(text.ends_with("[Unit]\n"));
    }

    #[test]
    fn test_write_summary() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nginxpm-service-info.txt");
        let def = definition();
        let outcome = ActivationOutcome::Started;

        write_summary(&path, &report(&def, &outcome, "[Unit]\n")).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Service summary: nginxpm"));
    }

    #[test]
    fn test_write_summary_failure_is_summary_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();
        let def = definition();
        let outcome = ActivationOutcome::Started;

        let err = write_summary(&blocker.join("summary.txt"), &report(&def, &outcome, ""))
            .unwrap_err();
        assert!(matches!(err, PodsvcError::SummaryWriteFailed { .. }));
    }
}
