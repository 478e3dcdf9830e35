//! Tests for Quadlet rendering and parsing.

use crate::definition::{
    HealthCheck, NetworkMode, PortMapping, PullPolicy, ServiceDefinition, UserMode, VolumeMount,
};
use crate::quadlet::*;
use crate::system::Identity;

fn ctx_with_identity() -> RenderContext {
    RenderContext {
        identity: Some(Identity { uid: 999, gid: 998 }),
        timezone: Some("Europe/Berlin".to_string()),
        ..RenderContext::default()
    }
}

fn homeassistant() -> ServiceDefinition {
    ServiceDefinition::builder("homeassistant", "homeassistant/home-assistant")
        .user_mode(UserMode::Dedicated)
        .network_mode(NetworkMode::Host)
        .volume(VolumeMount::new("./config", "/config", false))
        .build()
        .unwrap()
}

#[test]
fn test_render_is_byte_identical() {
    let def = homeassistant();
    let ctx = ctx_with_identity();
    let first = render_to_string(&def, &ctx);
    let second = render_to_string(&def, &ctx);
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn test_render_homeassistant_exact() {
    let rendered = render_to_string(&homeassistant(), &ctx_with_identity());
    let expected = "\
# homeassistant.container - generated by podsvc, regenerate instead of editing

[Unit]
Description=homeassistant container
Wants=network-online.target
After=network-online.target

[Container]
ContainerName=homeassistant
Image=docker.io/homeassistant/home-assistant
User=999
Group=998
Network=host
Timezone=Europe/Berlin
Pull=missing
AutoUpdate=registry
Volume=/var/lib/homeassistant/config:/config

[Service]
Restart=always
TimeoutStartSec=900

[Install]
WantedBy=multi-user.target default.target
";
    assert_eq!(rendered, expected);
}

#[test]
fn test_section_order_is_fixed() {
    let file = render_definition(&homeassistant(), &RenderContext::default());
    let names: Vec<&str> = file.sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Unit", "Container", "Service", "Install"]);
}

#[test]
fn test_optional_keys_omitted_when_absent() {
    let def = ServiceDefinition::builder("plain", "nginx")
        .user_mode(UserMode::Root)
        .auto_update(false)
        .build()
        .unwrap();
    let file = render_definition(&def, &RenderContext::default());
    let container = file.section("Container").unwrap();

    for key in [
        "User",
        "Group",
        "Timezone",
        "AutoUpdate",
        "SecurityLabelDisable",
        "PublishPort",
        "Volume",
        "Environment",
        "HealthCmd",
    ] {
        assert!(container.get(key).is_none(), "unexpected key {}", key);
    }
}

#[test]
fn test_container_entry_order() {
    let def = ServiceDefinition::builder("app", "ghcr.io/acme/app:1.2")
        .user_mode(UserMode::RootWithPuid)
        .network_mode(NetworkMode::Bridge)
        .port(PortMapping {
            host: 8080,
            container: 80,
        })
        .port(PortMapping {
            host: 8443,
            container: 443,
        })
        .volume(VolumeMount::new("./data", "/data", false))
        .volume(VolumeMount::new("/etc/localtime", "/etc/localtime", true))
        .env("TZ", "UTC")
        .env("TZ", "Europe/Berlin")
        .health_check(Some(HealthCheck {
            command: "curl -f http://localhost/health".to_string(),
            interval: "1m".to_string(),
            retries: 4,
        }))
        .pull_policy(PullPolicy::Always)
        .security_label_disable(true)
        .build()
        .unwrap();

    let file = render_definition(&def, &ctx_with_identity());
    let keys: Vec<(&str, &str)> = file
        .section("Container")
        .unwrap()
        .entries
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    assert_eq!(
        keys,
        vec![
            ("ContainerName", "app"),
            ("Image", "ghcr.io/acme/app:1.2"),
            ("Network", "bridge"),
            ("Timezone", "Europe/Berlin"),
            ("Pull", "always"),
            ("AutoUpdate", "registry"),
            ("SecurityLabelDisable", "true"),
            ("PublishPort", "8080:80"),
            ("PublishPort", "8443:443"),
            ("Volume", "/var/lib/app/data:/data"),
            ("Volume", "/etc/localtime:/etc/localtime:ro"),
            ("Environment", "PUID=999"),
            ("Environment", "PGID=998"),
            ("Environment", "TZ=UTC"),
            ("Environment", "TZ=Europe/Berlin"),
            ("HealthCmd", "curl -f http://localhost/health"),
            ("HealthInterval", "1m"),
            ("HealthRetries", "4"),
        ]
    );
}

#[test]
fn test_service_section_uses_context() {
    let ctx = RenderContext {
        restart_policy: "on-failure".to_string(),
        timeout_start_secs: 300,
        ..RenderContext::default()
    };
    let file = render_definition(&homeassistant(), &ctx);
    let service = file.section("Service").unwrap();
    assert_eq!(service.get("Restart"), Some("on-failure"));
    assert_eq!(service.get("TimeoutStartSec"), Some("300"));
}

#[test]
fn test_parse_reads_rendered_output() {
    let rendered = render_to_string(&homeassistant(), &ctx_with_identity());
    let parsed = QuadletFile::parse(&rendered).unwrap();

    assert_eq!(parsed.sections.len(), 4);
    assert_eq!(
        parsed.section("Container").unwrap().get("Image"),
        Some("docker.io/homeassistant/home-assistant")
    );
    assert_eq!(parsed.render(), rendered);
}

#[test]
fn test_parse_keeps_repeated_keys() {
    let text = "[Container]\nVolume=/a:/a\nVolume=/b:/b\n; note\nEnvironment=X=1\n";
    let parsed = QuadletFile::parse(text).unwrap();
    let container = parsed.section("Container").unwrap();

    let volumes: Vec<&str> = container.get_all("Volume").collect();
    assert_eq!(volumes, vec!["/a:/a", "/b:/b"]);
    assert_eq!(container.get("Environment"), Some("X=1"));
}

#[test]
fn test_parse_rejects_malformed_input() {
    assert!(QuadletFile::parse("Image=nginx\n").is_err());
    assert!(QuadletFile::parse("[Container\nImage=nginx\n").is_err());
    assert!(QuadletFile::parse("[Container]\njust words\n").is_err());
    assert!(QuadletFile::parse("[]\n").is_err());
}
