//! Host collaborators: package manager, image registry, service supervisor
//! and account provisioner.
//!
//! Each collaborator is a trait so the create pipeline can be exercised
//! without root, systemd or network access. The real implementations shell
//! out through [`process`].

mod packages;
pub mod process;
mod provision;
mod registry;
mod supervisor;

pub use packages::{Apt, PackageManager};
pub use provision::{HostProvisioner, Identity, Provisioner};
pub use registry::{ImageRegistry, Podman};
pub use supervisor::{Supervisor, Systemctl};

/// The full set of host collaborators used by one run.
pub struct Host<'a> {
    pub packages: &'a dyn PackageManager,
    pub registry: &'a dyn ImageRegistry,
    pub supervisor: &'a dyn Supervisor,
    pub provisioner: &'a dyn Provisioner,
}

impl Host<'static> {
    /// Collaborators backed by the real system tools.
    pub fn system() -> Self {
        Host {
            packages: &Apt,
            registry: &Podman,
            supervisor: &Systemctl,
            provisioner: &HostProvisioner,
        }
    }
}
