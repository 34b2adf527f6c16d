//! Startup orchestration.
//!
//! Config is validated before this point; here the forwarder is built, TLS
//! material loaded and the listener bound, in that order.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ProxyConfig;
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::Shutdown;
use crate::net::tls::{load_tls_config, TlsError};

/// Fatal startup or serving errors.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Server(#[from] ServerError),

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Build the server from `config` and serve until `shutdown` fires.
pub async fn run(config: ProxyConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let address: SocketAddr = config
        .listener
        .bind_address
        .parse()
        .map_err(|_| StartupError::BindAddress(config.listener.bind_address.clone()))?;

    tracing::info!(
        bind_address = %address,
        tls = config.listener.tls.is_some(),
        origin_scheme = %config.origin.scheme,
        origin_address = config.origin.address.as_deref().unwrap_or("<request host>"),
        record_header = config.client_auth.record_header().unwrap_or("<disabled>"),
        "Configuration loaded"
    );

    let tls = config.listener.tls.clone();
    let server = HttpServer::new(config)?;

    match tls {
        Some(tls) => {
            let rustls = load_tls_config(&tls).await?;
            server
                .run_tls(address, rustls, shutdown.subscribe())
                .await
                .map_err(StartupError::Serve)
        }
        None => {
            let listener = TcpListener::bind(address)
                .await
                .map_err(|source| StartupError::Bind { address, source })?;
            server
                .run(listener, shutdown.subscribe())
                .await
                .map_err(StartupError::Serve)
        }
    }
}
