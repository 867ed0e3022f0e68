//! Semantic validation of a loaded configuration.
//!
//! Extraction only checks types. These checks catch values that would make the
//! pipeline or the server misbehave at runtime.

use crate::config::DevkitConfig;
use crate::error::{ConfigError, Result};

const LOOPBACK_HOSTS: &[&str] = &["localhost", "127.0.0.1", "[::1]", "0.0.0.0"];

impl DevkitConfig {
    /// Validate field values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        validate_prefix(&self.proxy.prefix)?;
        validate_bundle(&self.paths.bundle)?;

        if self.watch.extensions.is_empty() {
            return Err(ConfigError::invalid(
                "watch.extensions",
                "at least one extension is required",
            ));
        }
        for ext in &self.watch.extensions {
            if ext.is_empty() || ext.starts_with('.') {
                return Err(ConfigError::invalid(
                    "watch.extensions",
                    format!("'{ext}' must be a bare extension such as \"elm\""),
                ));
            }
        }

        if self.compiler.program.trim().is_empty() {
            return Err(ConfigError::invalid("compiler.program", "cannot be empty"));
        }

        let (host, port) = split_target(&self.proxy.target)?;
        let host = host.trim_end_matches('.');
        let loopback = LOOPBACK_HOSTS
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(host));
        if port == self.server.port && loopback {
            return Err(ConfigError::invalid(
                "proxy.target",
                format!(
                    "{} points back at the dev server itself (port {})",
                    self.proxy.target, self.server.port
                ),
            ));
        }

        Ok(())
    }
}

fn validate_prefix(prefix: &str) -> Result<()> {
    if !prefix.starts_with('/') {
        return Err(ConfigError::invalid(
            "proxy.prefix",
            format!("'{prefix}' must start with '/'"),
        ));
    }
    if prefix.ends_with('/') {
        return Err(ConfigError::invalid(
            "proxy.prefix",
            format!("'{prefix}' must not end with '/'"),
        ));
    }
    Ok(())
}

fn validate_bundle(bundle: &str) -> Result<()> {
    if !bundle.ends_with(".js") {
        return Err(ConfigError::invalid(
            "paths.bundle",
            format!("'{bundle}' must be a .js file name"),
        ));
    }
    if bundle.contains('/') || bundle.contains('\\') {
        return Err(ConfigError::invalid(
            "paths.bundle",
            format!("'{bundle}' must be a file name, not a path"),
        ));
    }
    Ok(())
}

/// Split `http://host[:port][/...]` into host and effective port.
/// Host and port of an `http://` target. The scheme is matched without
/// regard to case, as URLs allow.
fn split_target(target: &str) -> Result<(&str, u16)> {
    const SCHEME: &str = "http://";
    let rest = target
        .get(..SCHEME.len())
        .filter(|scheme| scheme.eq_ignore_ascii_case(SCHEME))
        .map(|_| &target[SCHEME.len()..])
        .ok_or_else(|| {
            ConfigError::invalid(
                "proxy.target",
                format!("'{target}' must be an http:// URL"),
            )
        })?;

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let authority = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    if authority.is_empty() {
        return Err(ConfigError::invalid("proxy.target", "missing host"));
    }

    match authority.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && !port.contains(']') => {
            let port = port.parse::<u16>().map_err(|_| {
                ConfigError::invalid("proxy.target", format!("invalid port '{port}'"))
            })?;
            Ok((host, port))
        }
        _ => Ok((authority, 80)),
    }
}
