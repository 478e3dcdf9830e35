//! Error types for the podsvc CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for podsvc operations.
///
/// Validation and dependency errors are raised before any side effect is
/// committed. Errors raised after the unit file is written never remove it.
#[derive(Error, Debug)]
pub enum PodsvcError {
    /// A required field was left empty.
    #[error("{0} must not be empty")]
    EmptyInput(String),

    /// Service name does not match `^[a-z][a-z0-9_-]{0,31}$`.
    #[error(
        "invalid service name '{0}': must start with a lowercase letter and contain only \
         lowercase letters, digits, '-' or '_' (max 32 characters)"
    )]
    InvalidName(String),

    /// A field value could not be parsed or is inconsistent with other fields.
    #[error("invalid {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// A required external tool is absent and could not be installed.
    #[error("required dependency missing: {0}")]
    DependencyMissing(String),

    /// `podman pull` failed for the given reference.
    #[error("failed to pull image '{image}': {reason}")]
    ImagePullFailed { image: String, reason: String },

    /// `systemctl daemon-reload` failed; the unit was never started.
    #[error("systemd daemon-reload failed: {0}")]
    ReloadFailed(String),

    /// The unit was written but did not start or become active.
    #[error("service '{unit}' failed to start: {reason}")]
    ActivationFailed { unit: String, reason: String },

    /// The summary document could not be written.
    #[error("failed to write service summary '{path}': {reason}")]
    SummaryWriteFailed { path: String, reason: String },

    /// An external command exited unsuccessfully.
    #[error("command failed: {0}")]
    CommandFailed(String),

    /// Any other user-actionable failure (I/O, configuration, invalid state).
    #[error("{0}")]
    UserError(String),
}

impl PodsvcError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            PodsvcError::ActivationFailed { .. } => exit_codes::ACTIVATION_FAILURE,
            PodsvcError::EmptyInput(_)
            | PodsvcError::InvalidName(_)
            | PodsvcError::InvalidValue { .. }
            | PodsvcError::DependencyMissing(_)
            | PodsvcError::ImagePullFailed { .. }
            | PodsvcError::ReloadFailed(_)
            | PodsvcError::SummaryWriteFailed { .. }
            | PodsvcError::CommandFailed(_)
            | PodsvcError::UserError(_) => exit_codes::USER_ERROR,
        }
    }

    /// Shorthand for an [`PodsvcError::InvalidValue`].
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PodsvcError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for podsvc operations.
pub type Result<T> = std::result::Result<T, PodsvcError>;
