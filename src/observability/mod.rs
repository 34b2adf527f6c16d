//! Observability subsystem.
//!
//! Structured logging only: every subsystem emits `tracing` events, and
//! `tower-http`'s trace layer adds a span per request.

pub mod logging;

pub use logging::init_logging;
