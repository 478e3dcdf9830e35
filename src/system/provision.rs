//! System accounts and owned directories.

use super::process::{run_command, run_command_unchecked};
use crate::error::{PodsvcError, Result};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::debug;

/// Numeric identity of a host account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub uid: u32,
    pub gid: u32,
}

impl Identity {
    pub const ROOT: Identity = Identity { uid: 0, gid: 0 };
}

/// Creates accounts and directories on the host.
pub trait Provisioner {
    /// Identity of an existing account, `None` if there is no such user.
    fn lookup_user(&self, name: &str) -> Result<Option<Identity>>;

    /// Create a system account with `home` as its home directory, unless it
    /// already exists, and return its identity.
    fn ensure_user(&self, name: &str, home: &Path) -> Result<Identity>;

    /// Create `path` and any missing parents, applying `owner` and `mode` to
    /// `path` and to every directory created along the way.
    fn create_dir(&self, path: &Path, owner: Identity, mode: u32) -> Result<()>;
}

/// [`Provisioner`] using `id`, `useradd` and the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostProvisioner;

impl Provisioner for HostProvisioner {
    fn lookup_user(&self, name: &str) -> Result<Option<Identity>> {
        let uid = run_command_unchecked("id", &["-u", name])?;
        if !uid.success() {
            return Ok(None);
        }
        let gid = run_command("id", &["-g", name])?;
        Ok(Some(Identity {
            uid: parse_id(&uid.stdout)?,
            gid: parse_id(&gid.stdout)?,
        }))
    }

    fn ensure_user(&self, name: &str, home: &Path) -> Result<Identity> {
        if let Some(identity) = self.lookup_user(name)? {
            debug!(name, uid = identity.uid, "service user already exists");
            return Ok(identity);
        }

        let home = home.to_string_lossy();
        run_command(
            "useradd",
            &[
                "--system",
                "--user-group",
                "--home-dir",
                &home,
                "--no-create-home",
                "--shell",
                "/usr/sbin/nologin",
                name,
            ],
        )?;

        self.lookup_user(name)?.ok_or_else(|| {
            PodsvcError::UserError(format!("user '{}' not found after useradd", name))
        })
    }

    fn create_dir(&self, path: &Path, owner: Identity, mode: u32) -> Result<()> {
        // Directories missing before the call, outermost first.
        let mut created: Vec<&Path> = path.ancestors().take_while(|p| !p.exists()).collect();
        created.reverse();

        fs::create_dir_all(path).map_err(|e| {
            PodsvcError::UserError(format!(
                "failed to create directory '{}': {}",
                path.display(),
                e
            ))
        })?;

        if created.last() != Some(&path) {
            created.push(path);
        }
        for dir in created {
            apply_owner_and_mode(dir, owner, mode)?;
        }
        Ok(())
    }
}

fn apply_owner_and_mode(path: &Path, owner: Identity, mode: u32) -> Result<()> {
    std::os::unix::fs::chown(path, Some(owner.uid), Some(owner.gid)).map_err(|e| {
        PodsvcError::UserError(format!(
            "failed to set owner of '{}' to {}:{}: {}",
            path.display(),
            owner.uid,
            owner.gid,
            e
        ))
    })?;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| {
        PodsvcError::UserError(format!(
            "failed to set mode {:o} on '{}': {}",
            mode,
            path.display(),
            e
        ))
    })?;
    debug!(path = %path.display(), "directory prepared");
    Ok(())
}

fn parse_id(raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .map_err(|_| PodsvcError::UserError(format!("unexpected output from id: '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::MetadataExt;
    use tempfile::TempDir;

    fn current_identity(path: &Path) -> Identity {
        let meta = fs::metadata(path).unwrap();
        Identity {
            uid: meta.uid(),
            gid: meta.gid(),
        }
    }

    #[test]
    fn test_lookup_missing_user_is_none() {
        let result = HostProvisioner
            .lookup_user("podsvc-no-such-user-xyz")
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_lookup_root() {
        let identity = HostProvisioner.lookup_user("root").unwrap();
        assert_eq!(identity, Some(Identity::ROOT));
    }

    #[test]
    fn test_create_dir_sets_mode() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("svc").join("data");
        let me = current_identity(temp.path());

        HostProvisioner.create_dir(&path, me, 0o750).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
    }

    #[test]
    fn test_create_dir_restricts_new_intermediate_dirs() {
        let temp = TempDir::new().unwrap();
        let me = current_identity(temp.path());
        let data_dir = temp.path().join("svc");
        fs::create_dir(&data_dir).unwrap();
        fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o755)).unwrap();

        HostProvisioner
            .create_dir(&data_dir.join("config").join("db"), me, 0o750)
            .unwrap();

        for dir in [data_dir.join("config"), data_dir.join("config").join("db")] {
            let mode = fs::metadata(&dir).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o750, "{}", dir.display());
        }
        // Pre-existing parents are left alone.
        let mode = fs::metadata(temp.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("999\n").unwrap(), 999);
        assert!(parse_id("nobody").is_err());
    }
}
