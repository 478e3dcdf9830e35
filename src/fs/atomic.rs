//! Whole-file replacement for generated artifacts.
//!
//! Unit files and summaries are always rewritten in full: the content goes to
//! a hidden temporary file next to the target, is synced, given its final
//! mode, and renamed over the target. A reader (systemd's generator, an
//! operator with `cat`) sees either the old file or the new one.

use crate::error::{PodsvcError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

/// Replace `path` with `content`, creating parent directories as needed.
///
/// The final file has permission bits `mode`. On failure the temporary file
/// is removed and any previous version of `path` is left untouched.
pub fn write_file_atomic<P: AsRef<Path>>(path: P, content: &str, mode: u32) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            PodsvcError::UserError(format!(
                "failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path)?;
    if let Err(e) = write_synced(&temp_path, content.as_bytes(), mode) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        PodsvcError::UserError(format!("failed to replace '{}': {}", path.display(), e))
    })?;

    // Persist the directory entry as well.
    if let Some(parent) = path.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }

    Ok(())
}

/// `.{filename}.podsvc-tmp` in the target's directory. The hidden name keeps
/// Quadlet from picking it up.
fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            PodsvcError::UserError(format!("invalid file path '{}'", target.display()))
        })?;
    Ok(parent.join(format!(".{}.podsvc-tmp", filename)))
}

fn write_synced(path: &Path, content: &[u8], mode: u32) -> Result<()> {
    let write_err = |e: std::io::Error| {
        PodsvcError::UserError(format!(
            "failed to write temporary file '{}': {}",
            path.display(),
            e
        ))
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)
        .map_err(write_err)?;
    file.write_all(content).map_err(write_err)?;
    // The umask may have narrowed `mode` at creation.
    file.set_permissions(fs::Permissions::from_mode(mode))
        .map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_new_file_with_mode() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("web.container");

        write_file_atomic(&path, "[Unit]\n", 0o644).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[Unit]\n");
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_fully_replaces_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("web.container");
        fs::write(&path, "a much longer previous version of the file\n").unwrap();

        write_file_atomic(&path, "short\n", 0o644).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "short\n");
    }

    #[test]
    fn test_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("etc/containers/systemd/web.container");

        write_file_atomic(&path, "x", 0o600).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("web.container");

        write_file_atomic(&path, "x", 0o644).unwrap();

        let names: Vec<String> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["web.container"]);
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let temp = temp_path_for(Path::new("/etc/containers/systemd/web.container")).unwrap();
        assert_eq!(
            temp,
            Path::new("/etc/containers/systemd/.web.container.podsvc-tmp")
        );
    }

    #[test]
    fn test_failure_when_target_is_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("taken");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("inner"), "keep").unwrap();

        assert!(write_file_atomic(&path, "x", 0o644).is_err());
        assert!(!temp.path().join(".taken.podsvc-tmp").exists());
        assert!(path.join("inner").exists());
    }
}
