//! Client certificate status translation.
//!
//! # Data Flow
//! ```text
//! ClientAuthRecord (from the TLS terminator, trusted)
//!     → translate.rs (decision logic, pure)
//!     → HeaderOverrideSet (ordered name → value)
//!     → headers.rs (insert-or-replace onto a header copy)
//! ```
//!
//! # Design Decisions
//! - The record is never re-validated; it is the edge's verdict
//! - Translation is total: a missing or partial record still yields exactly
//!   one `X-SSL-Client-Verify` value
//! - Detail headers are only emitted when their source field is non-empty

pub mod headers;
pub mod record;
pub mod translate;

pub use headers::HeaderOverrideSet;
pub use record::ClientAuthRecord;
pub use translate::translate;
