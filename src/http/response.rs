//! Error responses.
//!
//! # Responsibilities
//! - Map forwarding failures to HTTP status codes
//! - Render a small JSON body so the browser sees a normal error response
//!
//! # Design Decisions
//! - Connection/TLS failures → 502 Bad Gateway
//! - Upstream timeouts → 504 Gateway Timeout
//! - Successful upstream responses are never rewritten here

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::upstream::ForwardError;

/// JSON error response, optionally naming the upstream involved.
pub fn error_response(status: StatusCode, message: &str, upstream: Option<&str>) -> Response {
    let body = match upstream {
        Some(name) => json!({ "error": message, "upstream": name }),
        None => json!({ "error": message }),
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let message = match &self {
            ForwardError::UpstreamUnavailable { .. } => "Upstream request failed",
            ForwardError::UpstreamTimeout { .. } => "Upstream timed out",
            ForwardError::InvalidRequest { .. } => "Invalid request target",
        };
        error_response(self.status(), message, self.upstream())
    }
}
