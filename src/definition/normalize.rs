//! Pure validation and normalization helpers.
//!
//! Nothing in here performs I/O, so the interactive collector, the definition
//! file loader and the tests all share the same rules.

use super::types::{
    DEFAULT_DATA_ROOT, DEFAULT_HEALTH_INTERVAL, DEFAULT_HEALTH_RETRIES, EnvVar, ExpandedPath,
    HealthCheck, PortMapping, SYSTEM_PATH_ALLOWLIST, VolumeMount,
};
use crate::error::{PodsvcError, Result};
use regex::Regex;
use std::sync::LazyLock;

static SERVICE_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z0-9_-]{0,31}$").expect("Invalid service name regex")
});

static ENV_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid environment key regex")
});

static DURATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(ms|s|m|h))+$").expect("Invalid duration regex"));

/// Qualify an image reference with a registry.
///
/// - first path segment contains `.` or `:`, or is `localhost`: already qualified
/// - contains a `/`: Docker Hub namespace, prefix `docker.io/`
/// - otherwise: Docker Hub official image, prefix `docker.io/library/`
pub fn normalize_image_name(raw: &str) -> String {
    let raw = raw.trim();
    match raw.split_once('/') {
        Some((first, _)) if first.contains('.') || first.contains(':') || first == "localhost" => {
            raw.to_string()
        }
        Some(_) => format!("docker.io/{}", raw),
        None => format!("docker.io/library/{}", raw),
    }
}

/// Validate a service name against `^[a-z][a-z0-9_-]{0,31}$`.
pub fn validate_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(PodsvcError::EmptyInput("service name".to_string()));
    }
    if !SERVICE_NAME_REGEX.is_match(name) {
        return Err(PodsvcError::InvalidName(name.to_string()));
    }
    Ok(name.to_string())
}

/// Expand a volume host path using the default data root (`/var/lib`).
pub fn expand_volume_path(raw: &str, service: &str) -> ExpandedPath {
    expand_volume_path_in(raw, service, DEFAULT_DATA_ROOT)
}

/// Expand a volume host path relative to `data_root`.
///
/// `./rest` becomes `<data_root>/<service>/rest`. Absolute paths are returned
/// unchanged; `warned` is set when their first component is not a known
/// system directory. Anything else (a named volume) is returned unchanged.
/// Expanding an already expanded path is a no-op.
pub fn expand_volume_path_in(raw: &str, service: &str, data_root: &str) -> ExpandedPath {
    let raw = raw.trim();

    if let Some(rest) = raw.strip_prefix("./") {
        let base = format!("{}/{}", data_root.trim_end_matches('/'), service);
        let rest = rest.trim_matches('/');
        let path = if rest.is_empty() {
            base
        } else {
            format!("{}/{}", base, rest)
        };
        return ExpandedPath {
            path,
            warned: false,
        };
    }

    if raw.starts_with('/') {
        let first = raw.trim_start_matches('/').split('/').next().unwrap_or("");
        return ExpandedPath {
            path: raw.to_string(),
            warned: !SYSTEM_PATH_ALLOWLIST.contains(&first),
        };
    }

    ExpandedPath {
        path: raw.to_string(),
        warned: false,
    }
}

/// Relative form offered for an absolute path outside the allowlist.
pub fn relative_form(absolute: &str) -> String {
    format!(".{}", absolute)
}

/// Split `raw` on `separator`, trimming tokens and dropping empty ones.
pub fn parse_list_input(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `host:container` or a bare `port` (same on both sides).
pub fn parse_port_mapping(raw: &str) -> Result<PortMapping> {
    let raw = raw.trim();
    let (host, container) = match raw.split_once(':') {
        Some((host, container)) => (host, container),
        None => (raw, raw),
    };
    Ok(PortMapping {
        host: parse_port(host, raw)?,
        container: parse_port(container, raw)?,
    })
}

fn parse_port(value: &str, whole: &str) -> Result<u16> {
    match value.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(PodsvcError::invalid(
            "port mapping",
            format!("'{}' is not a port in 1-65535 (in '{}')", value.trim(), whole),
        )),
    }
}

/// Parse `host:container[:ro|:rw]`.
///
/// The host side is returned as written; expansion happens in the builder.
pub fn parse_volume_spec(raw: &str) -> Result<VolumeMount> {
    let raw = raw.trim();
    let parts: Vec<&str> = raw.split(':').map(str::trim).collect();

    let (host, container, read_only) = match parts.as_slice() {
        [host, container] => (*host, *container, false),
        [host, container, "ro"] => (*host, *container, true),
        [host, container, "rw"] => (*host, *container, false),
        [_, _, option] => {
            return Err(PodsvcError::invalid(
                "volume",
                format!("unknown mount option '{}' in '{}' (use ro or rw)", option, raw),
            ));
        }
        _ => {
            return Err(PodsvcError::invalid(
                "volume",
                format!("'{}' is not in host:container[:ro] form", raw),
            ));
        }
    };

    if host.is_empty() {
        return Err(PodsvcError::invalid(
            "volume",
            format!("empty host path in '{}'", raw),
        ));
    }
    if has_parent_component(host) {
        return Err(PodsvcError::invalid(
            "volume",
            format!("host path '{}' must not contain '..'", host),
        ));
    }
    if !container.starts_with('/') {
        return Err(PodsvcError::invalid(
            "volume",
            format!("container path '{}' must be absolute", container),
        ));
    }

    Ok(VolumeMount::new(host, container, read_only))
}

/// Whether any `/`-separated component of `path` is `..`.
pub fn has_parent_component(path: &str) -> bool {
    path.split('/').any(|component| component.trim() == "..")
}

/// Parse `KEY=VALUE`. The value may be empty and may contain `=`.
pub fn parse_env_pair(raw: &str) -> Result<EnvVar> {
    let raw = raw.trim();
    let (key, value) = raw.split_once('=').ok_or_else(|| {
        PodsvcError::invalid("environment variable", format!("'{}' is missing '='", raw))
    })?;
    let key = key.trim();
    if !ENV_KEY_REGEX.is_match(key) {
        return Err(PodsvcError::invalid(
            "environment variable",
            format!("'{}' is not a valid variable name", key),
        ));
    }
    Ok(EnvVar {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Normalized health check together with the substitutions that were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedHealthCheck {
    pub health_check: Option<HealthCheck>,
    pub warnings: Vec<String>,
}

/// Build a health check from raw prompt answers.
///
/// An empty command disables the check. A malformed interval or retry count
/// is replaced by its default and reported in `warnings`. A command with
/// unbalanced quotes is rejected.
pub fn normalize_health_check(
    command: &str,
    interval: &str,
    retries: &str,
) -> Result<NormalizedHealthCheck> {
    let command = command.trim();
    if command.is_empty() {
        return Ok(NormalizedHealthCheck {
            health_check: None,
            warnings: Vec::new(),
        });
    }

    shell_words::split(command).map_err(|e| {
        PodsvcError::invalid("health check command", format!("'{}': {}", command, e))
    })?;

    let mut warnings = Vec::new();

    let interval = interval.trim();
    let interval = if interval.is_empty() {
        DEFAULT_HEALTH_INTERVAL.to_string()
    } else if DURATION_REGEX.is_match(interval) {
        interval.to_string()
    } else {
        warnings.push(format!(
            "health check interval '{}' is not a duration like 30s or 1m; using {}",
            interval, DEFAULT_HEALTH_INTERVAL
        ));
        DEFAULT_HEALTH_INTERVAL.to_string()
    };

    let retries = retries.trim();
    let retries = if retries.is_empty() {
        DEFAULT_HEALTH_RETRIES
    } else {
        match retries.parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => {
                warnings.push(format!(
                    "health check retries '{}' is not a positive number; using {}",
                    retries, DEFAULT_HEALTH_RETRIES
                ));
                DEFAULT_HEALTH_RETRIES
            }
        }
    };

    Ok(NormalizedHealthCheck {
        health_check: Some(HealthCheck {
            command: command.to_string(),
            interval,
            retries,
        }),
        warnings,
    })
}
