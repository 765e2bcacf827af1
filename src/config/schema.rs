//! Configuration schema definitions.
//!
//! The proxy is configured by a single JSON document. All types derive Serde
//! traits so the loader can hand the raw text straight to `serde_json`.

use serde::{Deserialize, Serialize};

/// Listen address used when the document has no `addr` field.
pub const DEFAULT_ADDR: &str = "0.0.0.0:80";

/// Root configuration for the reverse proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// Listen address (`host:port`, or `:port` for all interfaces).
    #[serde(default = "default_addr")]
    pub addr: String,

    /// Credential applied to every entry that does not carry its own.
    #[serde(default)]
    pub auth: Option<BasicAuthConfig>,

    /// Routing entries, in registration order.
    #[serde(default)]
    pub entries: Vec<EntryConfig>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            auth: None,
            entries: Vec::new(),
        }
    }
}

impl ProxyConfig {
    /// Address in a form `TcpListener::bind` accepts.
    ///
    /// An empty host (`":8080"`) binds every interface.
    pub fn bind_address(&self) -> String {
        if self.addr.starts_with(':') {
            format!("0.0.0.0{}", self.addr)
        } else {
            self.addr.clone()
        }
    }

    /// Credential in effect for `entry`: its own, else the global one.
    pub fn effective_auth<'a>(&'a self, entry: &'a EntryConfig) -> Option<&'a BasicAuthConfig> {
        entry.auth.as_ref().or(self.auth.as_ref())
    }
}

fn default_addr() -> String {
    DEFAULT_ADDR.to_string()
}

/// A single path prefix proxied to one upstream origin.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntryConfig {
    /// Absolute URL of the upstream origin.
    pub upstream: String,

    /// Request path prefix this entry is registered under.
    pub path: String,

    /// Per-entry credential, overriding the global `auth`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<BasicAuthConfig>,
}

/// HTTP Basic credential pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BasicAuthConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_document() {
        let raw = r#"{
            "addr": "127.0.0.1:8080",
            "auth": { "username": "admin", "password": "secret" },
            "entries": [
                { "upstream": "http://127.0.0.1:9000", "path": "/svc" },
                { "upstream": "http://127.0.0.1:9001", "path": "/other",
                  "auth": { "username": "u", "password": "p" } }
            ]
        }"#;
        let config: ProxyConfig = serde_json::from_str(raw).unwrap();

        assert_eq!(config.addr, "127.0.0.1:8080");
        assert_eq!(config.entries.len(), 2);
        assert_eq!(config.entries[0].path, "/svc");
        assert_eq!(config.effective_auth(&config.entries[0]).unwrap().username, "admin");
        assert_eq!(config.effective_auth(&config.entries[1]).unwrap().username, "u");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: ProxyConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.addr, DEFAULT_ADDR);
        assert!(config.auth.is_none());
        assert!(config.entries.is_empty());
    }

    #[test]
    fn port_only_address_binds_all_interfaces() {
        let config = ProxyConfig {
            addr: ":8080".into(),
            ..Default::default()
        };
        assert_eq!(config.bind_address(), "0.0.0.0:8080");

        let config = ProxyConfig {
            addr: "127.0.0.1:9".into(),
            ..Default::default()
        };
        assert_eq!(config.bind_address(), "127.0.0.1:9");
    }
}
