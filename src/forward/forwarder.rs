//! Outbound forwarding to the origin.
//!
//! One request per call, same method and URL as inbound, header overrides
//! merged onto a copy of the inbound headers. The origin response is handed
//! back as-is with its body streamed.

use std::sync::Arc;

use axum::body::{Body, HttpBody};
use axum::http::header::{HeaderMap, HeaderName, HeaderValue, CONNECTION, HOST};
use axum::http::uri::Authority;
use axum::http::Response;
use reqwest::redirect::Policy;
use url::{Host, Position, Url};

use crate::client_auth::headers::{X_SSL_CLIENT_PREFIX, X_SSL_CLIENT_VERIFY};
use crate::client_auth::{translate, ClientAuthRecord, HeaderOverrideSet};
use crate::forward::error::{ForwardError, ForwardResult};
use crate::forward::origin::OriginResolver;
use crate::forward::request::InboundRequest;
use crate::forward::RequestHandler;

/// Maximum redirect hops followed for one request.
pub const MAX_REDIRECTS: usize = 10;

/// Forwards inbound requests to the origin with certificate headers set.
///
/// Holds no per-request state; the pooled client is safe to share across
/// concurrent calls.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    connect_to: Option<Authority>,
    strip_inbound_client_headers: bool,
}

impl Forwarder {
    /// Create a forwarder that connects to the host named in each URL.
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(None)?,
            connect_to: None,
            strip_inbound_client_headers: false,
        })
    }

    /// Connect to a fixed origin authority instead of resolving the URL's
    /// host. Host names in the URL are kept, so TLS and `Host` still name
    /// the requested site.
    pub fn with_connect_to(mut self, authority: Authority) -> Result<Self, reqwest::Error> {
        self.client = build_client(Some(OriginResolver::new(&authority)))?;
        self.connect_to = Some(authority);
        Ok(self)
    }

    /// Drop inbound `X-SSL-Client-*` headers before merging overrides.
    pub fn strip_inbound_client_headers(mut self, strip: bool) -> Self {
        self.strip_inbound_client_headers = strip;
        self
    }

    /// Forward one request to the origin and return its response.
    pub async fn forward(
        &self,
        mut request: InboundRequest,
        record: Option<&ClientAuthRecord>,
    ) -> ForwardResult<Response<Body>> {
        let body = request.take_body().ok_or(ForwardError::StreamConsumed)?;

        let overrides = translate(record);
        let mut headers = self.outbound_headers(request.headers(), &overrides);
        let target = self.target_url(request.url());

        // `Host` is derived from the URL on every hop unless the authority
        // had to be rewritten.
        if !same_authority(&target, request.url()) {
            if let Ok(host) = HeaderValue::from_str(authority_of(request.url())) {
                headers.insert(HOST, host);
            }
        }

        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            target = %target,
            verify = overrides.get(&X_SSL_CLIENT_VERIFY).unwrap_or_default(),
            overrides = overrides.len(),
            "Forwarding request"
        );

        let mut outbound = self
            .client
            .request(request.method().clone(), target)
            .headers(headers);

        if body.size_hint().exact() != Some(0) {
            outbound = outbound.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        let upstream = outbound.send().await.map_err(|e| {
            tracing::error!(url = %request.url(), error = %e, "Upstream request failed");
            ForwardError::UpstreamUnavailable(e)
        })?;

        tracing::debug!(
            url = %request.url(),
            status = %upstream.status(),
            "Origin responded"
        );

        Ok(into_response(upstream))
    }

    /// Copy of the inbound headers with the overrides applied.
    ///
    /// `Host`, hop-by-hop headers and any header the inbound `Connection`
    /// names are left out.
    fn outbound_headers(&self, inbound: &HeaderMap, overrides: &HeaderOverrideSet) -> HeaderMap {
        let connection_scoped = connection_tokens(inbound);
        let mut headers = HeaderMap::with_capacity(inbound.len() + overrides.len());

        for (name, value) in inbound {
            if *name == HOST
                || is_hop_by_hop_header(name.as_str())
                || connection_scoped.contains(name)
            {
                continue;
            }
            if self.strip_inbound_client_headers && name.as_str().starts_with(X_SSL_CLIENT_PREFIX) {
                continue;
            }
            headers.append(name.clone(), value.clone());
        }

        overrides.apply_to(&mut headers);
        headers
    }

    /// URL the upstream client is given.
    ///
    /// Domain hosts are kept and pinned by the resolver, with the port
    /// moved to the origin's when the URL names one explicitly. IP-literal
    /// hosts bypass resolution and are replaced by the origin authority.
    fn target_url(&self, url: &Url) -> Url {
        let Some(authority) = &self.connect_to else {
            return url.clone();
        };

        let mut target = url.clone();
        let applied = match url.host() {
            Some(Host::Domain(_)) => match (url.port(), authority.port_u16()) {
                (Some(_), Some(port)) => target.set_port(Some(port)).is_ok(),
                _ => true,
            },
            _ => {
                target.set_host(Some(authority.host())).is_ok()
                    && target.set_port(authority.port_u16()).is_ok()
            }
        };

        if !applied {
            tracing::warn!(origin = %authority, url = %url, "Cannot apply origin address");
            return url.clone();
        }
        target
    }
}

fn build_client(resolver: Option<OriginResolver>) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder()
        .redirect(Policy::limited(MAX_REDIRECTS))
        .no_proxy();

    if let Some(resolver) = resolver {
        builder = builder.dns_resolver(Arc::new(resolver));
    }

    builder.build()
}

fn authority_of(url: &Url) -> &str {
    &url[Position::BeforeHost..Position::AfterPort]
}

fn same_authority(a: &Url, b: &Url) -> bool {
    a.host() == b.host() && a.port_or_known_default() == b.port_or_known_default()
}

/// Header names listed in the inbound `Connection` header.
fn connection_tokens(headers: &HeaderMap) -> Vec<HeaderName> {
    headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect()
}

impl RequestHandler for Forwarder {
    async fn handle(
        &self,
        request: InboundRequest,
        record: Option<ClientAuthRecord>,
    ) -> ForwardResult<Response<Body>> {
        self.forward(request, record.as_ref()).await
    }
}

fn into_response(upstream: reqwest::Response) -> Response<Body> {
    let status = upstream.status();
    let headers = upstream.headers().clone();

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Check if header is hop-by-hop (should not be forwarded)
fn is_hop_by_hop_header(name: &str) -> bool {
    matches!(
        name,
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailers"
            | "transfer-encoding"
            | "upgrade"
    )
}
