//! Mapping of forwarding failures to client responses.
//!
//! Successful origin responses are never touched; only a failed forwarding
//! attempt produces a response of our own.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::forward::ForwardError;

impl ForwardError {
    /// Status reported to the client for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ForwardError::StreamConsumed => StatusCode::INTERNAL_SERVER_ERROR,
            ForwardError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let message = match &self {
            ForwardError::StreamConsumed => "Request body already consumed",
            ForwardError::UpstreamUnavailable(_) => "Upstream request failed",
        };
        (self.status_code(), message).into_response()
    }
}
