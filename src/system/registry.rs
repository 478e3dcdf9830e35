//! Image pulls through `podman`.

use super::process::run_command;
use crate::error::{PodsvcError, Result};

/// Something that can fetch an image by fully qualified reference.
pub trait ImageRegistry {
    /// Pull `image`. Failure is [`PodsvcError::ImagePullFailed`].
    fn pull(&self, image: &str) -> Result<()>;
}

/// [`ImageRegistry`] backed by `podman pull`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Podman;

impl ImageRegistry for Podman {
    fn pull(&self, image: &str) -> Result<()> {
        run_command("podman", &["pull", image]).map_err(|e| PodsvcError::ImagePullFailed {
            image: image.to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
