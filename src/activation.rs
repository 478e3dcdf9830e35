//! Handing a written unit file to systemd.
//!
//! The sequence is: `daemon-reload`, `start`, wait the settle delay, then a
//! single `is-active` check. A reload failure stops before `start`. Nothing
//! is retried and the unit file is never removed.

use crate::error::{PodsvcError, Result};
use crate::system::Supervisor;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Default wait between `start` and the `is-active` check.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(5);

/// Observable result of activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The unit was active after the settle delay.
    Started,
    /// `start` failed, or the unit was not active after the settle delay.
    FailedToStart { reason: String },
    /// `daemon-reload` failed; `start` was not attempted.
    FailedToReload { reason: String },
}

impl ActivationOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, ActivationOutcome::Started)
    }

    /// Convert to the error the command reports.
    pub fn into_result(self, unit: &str) -> Result<()> {
        match self {
            ActivationOutcome::Started => Ok(()),
            ActivationOutcome::FailedToStart { reason } => Err(PodsvcError::ActivationFailed {
                unit: unit.to_string(),
                reason,
            }),
            ActivationOutcome::FailedToReload { reason } => Err(PodsvcError::ReloadFailed(reason)),
        }
    }

    /// Short status word for reports.
    pub fn label(&self) -> &'static str {
        match self {
            ActivationOutcome::Started => "running",
            ActivationOutcome::FailedToStart { .. } => "failed to start",
            ActivationOutcome::FailedToReload { .. } => "daemon-reload failed",
        }
    }
}

/// Reload systemd, start `unit` and classify the result.
///
/// `sleep` is called exactly once, with `settle`, after a successful start.
pub fn activate<F>(
    supervisor: &dyn Supervisor,
    unit: &str,
    settle: Duration,
    sleep: F,
) -> ActivationOutcome
where
    F: FnOnce(Duration),
{
    debug!(unit, "reloading systemd");
    if let Err(e) = supervisor.daemon_reload() {
        return ActivationOutcome::FailedToReload {
            reason: e.to_string(),
        };
    }

    info!(unit, "starting unit");
    if let Err(e) = supervisor.start(unit) {
        return ActivationOutcome::FailedToStart {
            reason: e.to_string(),
        };
    }

    sleep(settle);

    match supervisor.is_active(unit) {
        Ok(true) => ActivationOutcome::Started,
        Ok(false) => ActivationOutcome::FailedToStart {
            reason: format!("not active {}s after start", settle.as_secs()),
        },
        Err(e) => ActivationOutcome::FailedToStart {
            reason: format!("could not query state: {}", e),
        },
    }
}

/// Commands an operator can run to investigate a failed start.
pub fn remediation_hints(unit: &str, artifact: &Path) -> Vec<String> {
    let artifact = artifact.display().to_string();
    vec![
        format!("systemctl status {}", unit),
        format!("journalctl -u {} -n 50 --no-pager", unit),
        format!(
            "/usr/libexec/podman/quadlet -dryrun   # validates {}",
            artifact
        ),
        format!(
            "edit {} (or re-run podsvc), then: systemctl daemon-reload && systemctl restart {}",
            artifact, unit
        ),
    ]
}
