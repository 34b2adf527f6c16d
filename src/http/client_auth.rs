//! Attaches the certificate-status record to inbound requests.
//!
//! A record already present in the request extensions wins; otherwise the
//! configured header (the edge's JSON rendition of the record) is parsed.
//! The header is left in place.

use std::task::{Context, Poll};

use axum::http::header::{HeaderMap, HeaderName};
use axum::http::Request;
use tower::{Layer, Service};

use crate::client_auth::ClientAuthRecord;
use crate::config::ClientAuthConfig;

/// Layer that resolves a [`ClientAuthRecord`] into request extensions.
#[derive(Debug, Clone, Default)]
pub struct ClientAuthLayer {
    header: Option<HeaderName>,
}

impl ClientAuthLayer {
    /// Read records from `header`, or only from extensions when `None`.
    pub fn new(header: Option<HeaderName>) -> Self {
        Self { header }
    }

    pub fn from_config(config: &ClientAuthConfig) -> Self {
        let header = config.record_header().and_then(|name| {
            HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| {
                    tracing::warn!(header = %name, error = %e, "Invalid record header, header source disabled");
                })
                .ok()
        });
        Self::new(header)
    }
}

impl<S> Layer<S> for ClientAuthLayer {
    type Service = ClientAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ClientAuthService {
            inner,
            header: self.header.clone(),
        }
    }
}

/// Service produced by [`ClientAuthLayer`].
#[derive(Debug, Clone)]
pub struct ClientAuthService<S> {
    inner: S,
    header: Option<HeaderName>,
}

impl<S, B> Service<Request<B>> for ClientAuthService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        if request.extensions().get::<ClientAuthRecord>().is_none() {
            let record = self
                .header
                .as_ref()
                .and_then(|name| record_from_header(request.headers(), name));
            if let Some(record) = record {
                request.extensions_mut().insert(record);
            }
        }
        self.inner.call(request)
    }
}

/// Parse the record carried in `name`. Missing or malformed means no record.
pub fn record_from_header(headers: &HeaderMap, name: &HeaderName) -> Option<ClientAuthRecord> {
    let value = headers.get(name)?;

    let raw = match std::str::from_utf8(value.as_bytes()) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(header = %name, error = %e, "Client auth record is not UTF-8, ignoring");
            return None;
        }
    };

    match ClientAuthRecord::from_json(raw) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(header = %name, error = %e, "Malformed client auth record, ignoring");
            None
        }
    }
}
