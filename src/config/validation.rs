//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Upstreams must be absolute `http` URLs with a host
//! - Path prefixes must be non-empty
//! - Credentials must have both a username and a password
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before any route is registered

use axum::http::Uri;
use thiserror::Error;
use url::Url;

use crate::config::schema::{BasicAuthConfig, ProxyConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("entry {index}: path prefix must not be empty")]
    EmptyPath { index: usize },

    #[error("entry {index}: invalid upstream {upstream:?}: {reason}")]
    InvalidUpstream {
        index: usize,
        upstream: String,
        reason: String,
    },

    #[error("{scope}: username and password must be supplied")]
    EmptyCredential { scope: String },

    #[error("invalid listen address {addr:?}: {reason}")]
    InvalidAddress { addr: String, reason: String },
}

/// Parse an upstream origin into the URI requests are rewritten to.
pub fn parse_upstream(raw: &str) -> Result<Uri, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!(
            "unsupported scheme {:?}, only http upstreams are supported",
            url.scheme()
        ));
    }
    if !url.has_host() {
        return Err("upstream must include a host".to_string());
    }
    url.as_str().parse::<Uri>().map_err(|e| e.to_string())
}

/// Check the whole configuration, collecting every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(reason) = check_address(&config.bind_address()) {
        errors.push(ValidationError::InvalidAddress {
            addr: config.addr.clone(),
            reason,
        });
    }

    if let Some(auth) = &config.auth {
        check_credential(auth, "auth", &mut errors);
    }

    for (index, entry) in config.entries.iter().enumerate() {
        if entry.path.is_empty() {
            errors.push(ValidationError::EmptyPath { index });
        }

        if let Err(reason) = parse_upstream(&entry.upstream) {
            errors.push(ValidationError::InvalidUpstream {
                index,
                upstream: entry.upstream.clone(),
                reason,
            });
        }

        if let Some(auth) = &entry.auth {
            check_credential(auth, &format!("entry {index} auth"), &mut errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_credential(auth: &BasicAuthConfig, scope: &str, errors: &mut Vec<ValidationError>) {
    if auth.username.is_empty() || auth.password.is_empty() {
        errors.push(ValidationError::EmptyCredential {
            scope: scope.to_string(),
        });
    }
}

fn check_address(addr: &str) -> Result<(), String> {
    let (host, port) = addr
        .rsplit_once(':')
        .ok_or_else(|| "expected host:port".to_string())?;
    if host.is_empty() {
        return Err("missing host".to_string());
    }
    port.parse::<u16>()
        .map(|_| ())
        .map_err(|_| format!("invalid port {port:?}"))
}
