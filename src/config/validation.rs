//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, schemes and header names before startup
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::header::HeaderName;
use axum::http::uri::Authority;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("listener.tls.{field} must not be empty")]
    TlsPath { field: &'static str },

    #[error("origin.scheme '{0}' must be http or https")]
    Scheme(String),

    #[error("origin.address '{0}' is not a host[:port] authority")]
    OriginAddress(String),

    #[error("client_auth.record_header '{0}' is not a valid header name")]
    RecordHeader(String),

    #[error("observability.log_level '{0}' is not a valid filter")]
    LogLevel(String),
}

/// Check a loaded configuration, collecting every error.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.is_empty() {
            errors.push(ValidationError::TlsPath { field: "cert_path" });
        }
        if tls.key_path.is_empty() {
            errors.push(ValidationError::TlsPath { field: "key_path" });
        }
    }

    if !matches!(config.origin.scheme.as_str(), "http" | "https") {
        errors.push(ValidationError::Scheme(config.origin.scheme.clone()));
    }

    if let Some(address) = &config.origin.address {
        if address.parse::<Authority>().is_err() {
            errors.push(ValidationError::OriginAddress(address.clone()));
        }
    }

    if let Some(header) = config.client_auth.record_header() {
        if HeaderName::from_bytes(header.as_bytes()).is_err() {
            errors.push(ValidationError::RecordHeader(header.to_string()));
        }
    }

    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::LogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
