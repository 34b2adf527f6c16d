//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ProxyConfig, ConfigError> {
    let config: ProxyConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "cert-header-proxy-{}-load.toml",
            std::process::id()
        ));
        fs::write(
            &path,
            r#"
            [listener]
            bind_address = "127.0.0.1:9443"

            [origin]
            scheme = "http"
            address = "127.0.0.1:3000"

            [client_auth]
            record_header = "x-client-auth"
            strip_inbound_client_headers = true
            "#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9443");
        assert_eq!(config.origin.scheme, "http");
        assert_eq!(config.client_auth.record_header(), Some("x-client-auth"));
        assert!(config.client_auth.strip_inbound_client_headers);
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/cert-header-proxy.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[listener\nbind_address =").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_message() {
        let err = parse_config(
            r#"
            [origin]
            scheme = "gopher"
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
        assert_eq!(
            err.to_string(),
            "Validation failed: origin.scheme 'gopher' must be http or https"
        );
    }
}
