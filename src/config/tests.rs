//! Tests for config functionality.

use crate::config::{Config, RestartPolicy};
use crate::system::Identity;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.quadlet_dir, PathBuf::from("/etc/containers/systemd"));
    assert_eq!(config.data_root, "/var/lib");
    assert!(config.summary_dir.is_none());
    assert_eq!(config.package, "podman");
    assert!(config.timezone.is_none());
    assert_eq!(config.settle_delay_secs, 5);
    assert_eq!(config.restart_policy, RestartPolicy::Always);
    assert_eq!(config.timeout_start_secs, 900);
}

#[test]
fn test_parse_minimal_yaml() {
    let config = Config::from_yaml("").unwrap();
    assert_eq!(config.settle_delay_secs, 5);
    assert_eq!(config.data_root, "/var/lib");
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
data_root: /srv
settle_delay_secs: 10
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.data_root, "/srv");
    assert_eq!(config.settle_delay_secs, 10);
    assert_eq!(config.quadlet_dir, PathBuf::from("/etc/containers/systemd"));
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
quadlet_dir: /etc/containers/systemd/users
data_root: /srv/containers
summary_dir: /root/services
package: podman
timezone: Europe/Berlin
timezone_file: /etc/timezone
settle_delay_secs: 0
restart_policy: on-failure
timeout_start_secs: 120
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(
        config.quadlet_dir,
        PathBuf::from("/etc/containers/systemd/users")
    );
    assert_eq!(config.data_root, "/srv/containers");
    assert_eq!(config.summary_dir, Some(PathBuf::from("/root/services")));
    assert_eq!(config.timezone.as_deref(), Some("Europe/Berlin"));
    assert_eq!(config.settle_delay_secs, 0);
    assert_eq!(config.restart_policy, RestartPolicy::OnFailure);
    assert_eq!(config.timeout_start_secs, 120);
}

#[test]
fn test_unknown_fields_ignored() {
    let config = Config::from_yaml("future_option: true\npackage: podman\n").unwrap();
    assert_eq!(config.package, "podman");
}

#[test]
fn test_invalid_values_rejected() {
    assert!(Config::from_yaml("quadlet_dir: relative/dir").is_err());
    assert!(Config::from_yaml("data_root: var/lib").is_err());
    assert!(Config::from_yaml("settle_delay_secs: 3600").is_err());
    assert!(Config::from_yaml("timeout_start_secs: 0").is_err());
    assert!(Config::from_yaml("package: ''").is_err());
    assert!(Config::from_yaml("restart_policy: sometimes").is_err());
}

#[test]
fn test_load_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.yaml");
    std::fs::write(&path, "data_root: /opt/services\n").unwrap();

    let config = Config::resolve(Some(&path)).unwrap();
    assert_eq!(config.data_root, "/opt/services");

    assert!(Config::load(temp.path().join("missing.yaml")).is_err());
}

#[test]
fn test_paths() {
    let config = Config::default();
    assert_eq!(
        config.artifact_path("nginxpm"),
        Path::new("/etc/containers/systemd/nginxpm.container")
    );
    assert_eq!(config.service_data_dir("nginxpm"), Path::new("/var/lib/nginxpm"));
    assert_eq!(
        config.summary_path("nginxpm"),
        Path::new("/var/lib/nginxpm/nginxpm-service-info.txt")
    );

    let config = Config {
        summary_dir: Some(PathBuf::from("/root/services")),
        ..Config::default()
    };
    assert_eq!(
        config.summary_path("nginxpm"),
        Path::new("/root/services/nginxpm-service-info.txt")
    );
}

#[test]
fn test_resolve_timezone_prefers_config() {
    let temp = TempDir::new().unwrap();
    let tz_file = temp.path().join("timezone");
    std::fs::write(&tz_file, "America/New_York\n").unwrap();

    let config = Config {
        timezone: Some("UTC".to_string()),
        timezone_file: tz_file.clone(),
        ..Config::default()
    };
    assert_eq!(config.resolve_timezone().as_deref(), Some("UTC"));

    let config = Config {
        timezone_file: tz_file,
        ..Config::default()
    };
    assert_eq!(config.resolve_timezone().as_deref(), Some("America/New_York"));

    let config = Config {
        timezone_file: temp.path().join("missing"),
        ..Config::default()
    };
    assert_eq!(config.resolve_timezone(), None);
}

#[test]
fn test_render_context_carries_settings() {
    let temp = TempDir::new().unwrap();
    let config = Config {
        restart_policy: RestartPolicy::OnFailure,
        timeout_start_secs: 60,
        timezone_file: temp.path().join("missing"),
        ..Config::default()
    };
    let ctx = config.render_context(Some(Identity { uid: 5, gid: 6 }));
    assert_eq!(ctx.restart_policy, "on-failure");
    assert_eq!(ctx.timeout_start_secs, 60);
    assert_eq!(ctx.identity, Some(Identity { uid: 5, gid: 6 }));
    assert_eq!(ctx.timezone, None);
}
