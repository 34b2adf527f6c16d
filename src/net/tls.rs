//! Listener TLS configuration and certificate loading.
//!
//! Only the server certificate is loaded here. Client certificates are
//! verified by the edge in front of this proxy, never locally.

use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;

use crate::config::TlsConfig;

/// Errors loading listener TLS material.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("certificate file not found: {0}")]
    CertificateNotFound(String),

    #[error("private key file not found: {0}")]
    KeyNotFound(String),

    #[error("failed to load TLS material: {0}")]
    Load(#[from] std::io::Error),
}

/// Load the listener's certificate chain and private key (PEM files).
pub async fn load_tls_config(config: &TlsConfig) -> Result<RustlsConfig, TlsError> {
    let cert_path = Path::new(&config.cert_path);
    let key_path = Path::new(&config.key_path);

    if !cert_path.exists() {
        return Err(TlsError::CertificateNotFound(config.cert_path.clone()));
    }
    if !key_path.exists() {
        return Err(TlsError::KeyNotFound(config.key_path.clone()));
    }

    install_crypto_provider();

    let rustls = RustlsConfig::from_pem_file(cert_path, key_path).await?;
    tracing::info!(cert = %config.cert_path, "TLS certificate loaded");
    Ok(rustls)
}

/// Pin the process-wide rustls provider. More than one provider is compiled
/// in, so rustls cannot pick a default on its own.
pub fn install_crypto_provider() {
    // Err only means a provider is already installed.
    let _ = rustls::crypto::ring::default_provider().install_default();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_certificate() {
        let config = TlsConfig {
            cert_path: "/nonexistent/cert.pem".into(),
            key_path: "/nonexistent/key.pem".into(),
        };

        let err = load_tls_config(&config).await.unwrap_err();
        assert!(matches!(err, TlsError::CertificateNotFound(_)));
    }
}
