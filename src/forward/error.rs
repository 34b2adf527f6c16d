//! Forwarding errors.

use thiserror::Error;

/// Errors surfaced by a forwarding attempt. Never retried.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The inbound body was taken before forwarding.
    #[error("inbound body stream already consumed")]
    StreamConsumed,

    /// Network or origin failure on the single upstream attempt.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(#[source] reqwest::Error),
}

/// Result type for forwarding operations.
pub type ForwardResult<T> = Result<T, ForwardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ForwardError::StreamConsumed;
        assert_eq!(err.to_string(), "inbound body stream already consumed");
    }
}
