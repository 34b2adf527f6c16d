//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, graceful shutdown)
//!     → client_auth.rs (attach certificate-status record)
//!     → server.rs dispatch (reconstruct original URL)
//!     → RequestHandler (forward to origin)
//!     → response.rs (only for failed forwarding)
//!     → Send to client
//! ```

pub mod client_auth;
pub mod response;
pub mod server;

pub use client_auth::{ClientAuthLayer, ClientAuthService};
pub use server::{AppState, HttpServer, ServerError};
