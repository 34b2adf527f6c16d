//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Where and how the origin is reached.
    pub origin: OriginConfig,

    /// Where the certificate-status record comes from.
    pub client_auth: ClientAuthConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Scheme of the original URL when the request target has none.
    pub scheme: String,

    /// Fixed `host:port` to connect to instead of the request's host.
    pub address: Option<String>,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            address: None,
        }
    }
}

/// Certificate-status record source.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientAuthConfig {
    /// Request header carrying the record as JSON. Empty or unset disables
    /// the header source; records then only come from request extensions.
    pub record_header: Option<String>,

    /// Remove inbound `X-SSL-Client-*` headers before overrides are merged.
    pub strip_inbound_client_headers: bool,
}

impl ClientAuthConfig {
    /// The configured record header, if the header source is enabled.
    pub fn record_header(&self) -> Option<&str> {
        self.record_header.as_deref().filter(|h| !h.is_empty())
    }
}

impl Default for ClientAuthConfig {
    fn default() -> Self {
        Self {
            record_header: Some("cf-tls-client-auth".to_string()),
            strip_inbound_client_headers: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
