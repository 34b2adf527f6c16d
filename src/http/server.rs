//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router dispatching every request to the handler
//! - Wire up middleware (tracing, client auth record extraction)
//! - Reconstruct the original URL of each request
//! - Bind server to a plain or TLS listener
//! - Graceful shutdown on the lifecycle broadcast

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::client_auth::ClientAuthRecord;
use crate::config::ProxyConfig;
use crate::forward::{Forwarder, InboundRequest, RequestHandler};
use crate::http::client_auth::ClientAuthLayer;

/// Errors building the server from configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid origin address '{0}'")]
    OriginAddress(String),
}

/// Application state injected into handlers.
pub struct AppState<H> {
    pub handler: Arc<H>,
    pub scheme: Arc<str>,
}

impl<H> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            scheme: self.scheme.clone(),
        }
    }
}

/// HTTP server fronting a [`RequestHandler`].
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a server forwarding to the origin described by `config`.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let forwarder = build_forwarder(&config)?;
        Ok(Self::with_handler(config, forwarder))
    }

    /// Create a server dispatching to a custom handler.
    pub fn with_handler<H: RequestHandler>(config: ProxyConfig, handler: H) -> Self {
        let state = AppState {
            handler: Arc::new(handler),
            scheme: Arc::from(config.origin.scheme.as_str()),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router<H: RequestHandler>(config: &ProxyConfig, state: AppState<H>) -> Router {
        Router::new()
            .fallback(dispatch::<H>)
            .with_state(state)
            .layer(ClientAuthLayer::from_config(&config.client_auth))
            .layer(TraceLayer::new_for_http())
    }

    /// The assembled router, for embedding or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Serve plain HTTP on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS on `addr` until `shutdown` fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let signal = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            signal.graceful_shutdown(None);
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Build the forwarder described by the origin and client auth settings.
pub fn build_forwarder(config: &ProxyConfig) -> Result<Forwarder, ServerError> {
    let mut forwarder = Forwarder::new()?
        .strip_inbound_client_headers(config.client_auth.strip_inbound_client_headers);

    if let Some(address) = &config.origin.address {
        let authority = address
            .parse()
            .map_err(|_| ServerError::OriginAddress(address.clone()))?;
        forwarder = forwarder.with_connect_to(authority)?;
    }

    Ok(forwarder)
}

/// Hands every request, with its record, to the handler.
async fn dispatch<H: RequestHandler>(
    State(state): State<AppState<H>>,
    request: Request<Body>,
) -> Response {
    let record = request.extensions().get::<ClientAuthRecord>().cloned();

    let inbound = match InboundRequest::from_http(request, &state.scheme) {
        Ok(inbound) => inbound,
        Err(e) => {
            tracing::warn!(error = %e, "Cannot reconstruct request URL");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    match state.handler.handle(inbound, record).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}
