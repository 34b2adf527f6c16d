//! Inbound request as seen by the forwarder.

use std::fmt;

use axum::body::Body;
use axum::http::header::{HeaderMap, HOST};
use axum::http::uri::{Authority, Uri};
use axum::http::{Method, Request};
use thiserror::Error;
use url::Url;

/// Errors reconstructing the original URL of a request.
#[derive(Debug, Error)]
pub enum RequestUrlError {
    #[error("request has no Host header")]
    MissingHost,

    #[error("invalid Host header: {0}")]
    InvalidHost(String),

    #[error("invalid request URL: {0}")]
    Invalid(#[from] url::ParseError),
}

/// An inbound request: method, original URL, headers and a one-shot body.
///
/// Headers are only ever read; the forwarder works on its own copy. The
/// body can be taken once, after which [`InboundRequest::body_used`] is true.
pub struct InboundRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Body>,
}

impl InboundRequest {
    pub fn new(method: Method, url: Url, headers: HeaderMap, body: Body) -> Self {
        Self {
            method,
            url,
            headers,
            body: Some(body),
        }
    }

    /// Build from a server-side request, reconstructing the original URL.
    ///
    /// Absolute-form targets are used as-is. Origin-form targets are joined
    /// with the `Host` header under `scheme`.
    pub fn from_http(request: Request<Body>, scheme: &str) -> Result<Self, RequestUrlError> {
        let (parts, body) = request.into_parts();
        let url = original_url(&parts.uri, &parts.headers, scheme)?;
        Ok(Self::new(parts.method, url, parts.headers, body))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// True once the body stream has been taken.
    pub fn body_used(&self) -> bool {
        self.body.is_none()
    }

    /// Take the body stream. Returns `None` if it was already taken.
    pub fn take_body(&mut self) -> Option<Body> {
        self.body.take()
    }
}

impl fmt::Debug for InboundRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InboundRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &self.headers.len())
            .field("body_used", &self.body_used())
            .finish()
    }
}

fn original_url(uri: &Uri, headers: &HeaderMap, scheme: &str) -> Result<Url, RequestUrlError> {
    if uri.scheme().is_some() && uri.authority().is_some() {
        return Ok(Url::parse(&uri.to_string())?);
    }

    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty())
        .ok_or(RequestUrlError::MissingHost)?;

    let authority: Authority = host
        .parse()
        .map_err(|_| RequestUrlError::InvalidHost(host.to_string()))?;

    let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");

    Ok(Url::parse(&format!("{}://{}{}", scheme, authority, path))?)
}
