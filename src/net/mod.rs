//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → tls.rs (optional TLS handshake, server certificate only)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - TLS is optional; in typical deployments the edge terminates mTLS and
//!   this listener speaks plain HTTP on a private network

pub mod tls;
