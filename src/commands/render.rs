//! Implementation of the `podsvc render` command.
//!
//! Prints the unit file a definition file would produce. Nothing on the host
//! is changed; the service user is only looked up.

use crate::cli::RenderArgs;
use crate::config::Config;
use crate::definition::DefinitionFile;
use crate::error::Result;
use crate::quadlet::render_to_string;
use crate::system::{HostProvisioner, Provisioner};
use std::path::Path;

/// Execute the `podsvc render` command.
pub fn cmd_render(args: RenderArgs, config: &Config) -> Result<()> {
    let rendered = render_file(&args.from, config, &HostProvisioner)?;
    for warning in &rendered.warnings {
        eprintln!("Warning: {}", warning);
    }
    print!("{}", rendered.artifact);
    Ok(())
}

/// Output of [`render_file`].
#[derive(Debug)]
pub struct Rendered {
    pub artifact: String,
    pub warnings: Vec<String>,
}

/// Load, validate and render the definition at `path`.
pub fn render_file(path: &Path, config: &Config, provisioner: &dyn Provisioner) -> Result<Rendered> {
    let loaded = DefinitionFile::load(path)?.into_builder(&config.data_root)?;
    let mut warnings = loaded.warnings;
    let definition = loaded.builder.build()?;

    let identity = if definition.user_mode().needs_service_user() {
        let identity = provisioner.lookup_user(definition.name())?;
        if identity.is_none() {
            warnings.push(format!(
                "user '{}' does not exist yet, User/PUID lines omitted",
                definition.name()
            ));
        }
        identity
    } else {
        None
    };

    Ok(Rendered {
        artifact: render_to_string(&definition, &config.render_context(identity)),
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PodsvcError;
    use crate::system::Identity;
    use tempfile::TempDir;

    struct KnownUser(Option<Identity>);

    impl Provisioner for KnownUser {
        fn lookup_user(&self, _name: &str) -> Result<Option<Identity>> {
            Ok(self.0)
        }

        fn ensure_user(&self, _name: &str, _home: &Path) -> Result<Identity> {
            panic!("render must not create users")
        }

        fn create_dir(&self, _path: &Path, _owner: Identity, _mode: u32) -> Result<()> {
            panic!("render must not create directories")
        }
    }

    fn config() -> Config {
        Config {
            timezone: Some("Etc/UTC".to_string()),
            ..Config::default()
        }
    }

    fn write(temp: &TempDir, yaml: &str) -> std::path::PathBuf {
        let path = temp.path().join("svc.yaml");
        std::fs::write(&path, yaml).unwrap();
        path
    }

    #[test]
    fn test_render_with_existing_user() {
        let temp = TempDir::new().unwrap();
        let path = write(
            &temp,
            "name: nginxpm\nimage: jc21/nginx-proxy-manager\nvolumes:\n  - ./data:/data\n",
        );

        let rendered = render_file(
            &path,
            &config(),
            &KnownUser(Some(Identity { uid: 990, gid: 990 })),
        )
        .unwrap();

        assert!(rendered.warnings.is_empty());
        assert!(rendered.artifact.contains("User=990\n"));
        assert!(rendered.artifact.contains("Volume=/var/lib/nginxpm/data:/data\n"));
        assert!(rendered.artifact.contains("Timezone=Etc/UTC\n"));
    }

    #[test]
    fn test_render_without_user_warns() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "name: nginxpm\nimage: jc21/nginx-proxy-manager\n");

        let rendered = render_file(&path, &config(), &KnownUser(None)).unwrap();

        assert!(!rendered.artifact.contains("User="));
        assert_eq!(rendered.warnings.len(), 1);
        assert!(rendered.warnings[0].contains("does not exist yet"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let temp = TempDir::new().unwrap();
        let path = write(
            &temp,
            r#"
name: web
image: nginx
network_mode: bridge
ports: ["8080:80", "8443:443"]
"#,
        );
        let provisioner = KnownUser(Some(Identity { uid: 5, gid: 5 }));

        let first = render_file(&path, &config(), &provisioner).unwrap();
        let second = render_file(&path, &config(), &provisioner).unwrap();

        assert_eq!(first.artifact, second.artifact);
        assert!(first.artifact.contains("PublishPort=8080:80\nPublishPort=8443:443\n"));
    }

    #[test]
    fn test_render_rejects_invalid_name() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "name: Grafana\nimage: grafana/grafana\n");

        let result = render_file(&path, &config(), &KnownUser(None));

        assert!(matches!(result, Err(PodsvcError::InvalidName(_))));
    }
}
