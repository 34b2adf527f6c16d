//! Static origin address.
//!
//! Every name the upstream client looks up resolves to the configured
//! origin, so the request URL (and with it SNI, certificate verification
//! and the derived `Host`) keeps the inbound host.

use std::error::Error;
use std::net::SocketAddr;

use axum::http::uri::Authority;
use reqwest::dns::{Addrs, Name, Resolve, Resolving};

/// Resolver answering every lookup with the origin address.
///
/// A port of `0` lets the connector fall back to the URL's port.
#[derive(Debug, Clone)]
pub struct OriginResolver {
    host: String,
    port: u16,
}

impl OriginResolver {
    pub fn new(authority: &Authority) -> Self {
        let host = authority.host();
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        Self {
            host: host.to_string(),
            port: authority.port_u16().unwrap_or(0),
        }
    }

    /// Addresses of the origin.
    pub async fn lookup(&self) -> std::io::Result<Vec<SocketAddr>> {
        let addrs = tokio::net::lookup_host((self.host.as_str(), self.port)).await?;
        Ok(addrs.collect())
    }
}

impl Resolve for OriginResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let resolver = self.clone();
        Box::pin(async move {
            tracing::trace!(name = name.as_str(), origin = %resolver.host, "Resolving to origin");
            let addrs = resolver.lookup().await?;
            Ok::<Addrs, Box<dyn Error + Send + Sync>>(Box::new(addrs.into_iter()))
        })
    }
}
