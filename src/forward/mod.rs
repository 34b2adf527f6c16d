//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest + Option<ClientAuthRecord>
//!     → client_auth::translate (header overrides)
//!     → forwarder.rs (merge onto header copy, one outbound request)
//!     → origin response streamed back untouched
//! ```
//!
//! # Design Decisions
//! - Exactly one upstream attempt; failures surface as `ForwardError`
//! - Bodies are streamed both ways, never buffered
//! - Redirects are followed by the upstream client
//! - Dropping the returned future cancels the upstream request

use std::future::Future;

use axum::body::Body;
use axum::http::Response;

pub mod error;
pub mod forwarder;
pub mod origin;
pub mod request;

pub use error::ForwardError;
pub use forwarder::Forwarder;
pub use request::InboundRequest;

use crate::client_auth::ClientAuthRecord;

/// Entry point invoked once per inbound request by a dispatcher.
///
/// The bundled HTTP server is one dispatcher; embedders can drive any
/// implementation directly.
pub trait RequestHandler: Send + Sync + 'static {
    fn handle(
        &self,
        request: InboundRequest,
        record: Option<ClientAuthRecord>,
    ) -> impl Future<Output = Result<Response<Body>, ForwardError>> + Send;
}
