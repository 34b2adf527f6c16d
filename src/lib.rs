//! mTLS client-certificate header proxy.
//!
//! Sits behind an edge that has already terminated mutual TLS, turns the
//! edge's certificate-status record into nginx-style `X-SSL-Client-*`
//! request headers and forwards the request to the origin unchanged
//! otherwise.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──mTLS──▶ Edge ──HTTP + record──▶ ┌──────────────────────────────┐
//!                                            │ http     (listener, record   │
//!                                            │           extraction)        │
//!                                            │   ▼                          │
//!                                            │ forward  (one upstream call) │──▶ Origin
//!                                            │   ▲                          │
//!                                            │ client_auth (record → headers│
//!                                            │              decision logic) │
//!                                            └──────────────────────────────┘
//! ```

// Core
pub mod client_auth;
pub mod forward;

// Hosting shell
pub mod config;
pub mod http;
pub mod net;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use client_auth::{translate, ClientAuthRecord, HeaderOverrideSet};
pub use config::ProxyConfig;
pub use forward::{ForwardError, Forwarder, InboundRequest, RequestHandler};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
