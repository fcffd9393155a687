//! Upstream forwarding.
//!
//! # Responsibilities
//! - Relay one request to its upstream target
//! - Rewrite headers (hop-by-hop removal, per-target overrides)
//! - Stream request and response bodies without buffering
//! - Classify upstream failures
//!
//! # Design Decisions
//! - One connection pool per target, each with its own TLS connector
//! - The request target is sent as received: no path normalization
//! - Redirects are relayed to the caller, never followed
//! - No retries: a failed request fails once
//! - Dropping the returned response body closes the upstream connection

use std::error::Error as _;
use std::io;
use std::sync::Arc;

use axum::body::Body;
use axum::http::uri::PathAndQuery;
use axum::http::{Request, Response, StatusCode, Version};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use thiserror::Error;

use crate::upstream::target::UpstreamTarget;
use crate::upstream::{headers, tls, BuildError};

type UpstreamClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Per-request forwarding failure.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Connection refused, DNS or TLS failure, or the exchange broke off.
    #[error("upstream '{target}' unavailable: {source}")]
    UpstreamUnavailable {
        target: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    /// No connection or no response headers within the configured deadline.
    #[error("upstream '{target}' timed out")]
    UpstreamTimeout { target: String },

    /// The incoming request target cannot be joined onto the upstream origin.
    #[error("cannot build upstream URI for '{path}': {source}")]
    InvalidRequest {
        path: String,
        #[source]
        source: axum::http::Error,
    },
}

impl ForwardError {
    /// Status returned to the caller for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            ForwardError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ForwardError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Name of the upstream involved, when there is one.
    pub fn upstream(&self) -> Option<&str> {
        match self {
            ForwardError::UpstreamUnavailable { target, .. }
            | ForwardError::UpstreamTimeout { target } => Some(target),
            ForwardError::InvalidRequest { .. } => None,
        }
    }
}

/// Relays requests to a single upstream target.
#[derive(Debug, Clone)]
pub struct Forwarder {
    target: Arc<UpstreamTarget>,
    client: UpstreamClient,
}

impl Forwarder {
    /// Create a forwarder with a connection pool configured for the target.
    pub fn new(target: Arc<UpstreamTarget>) -> Result<Self, BuildError> {
        let mut http = HttpConnector::new();
        http.enforce_http(false);
        http.set_connect_timeout(target.connect_timeout);

        let tls = tls::client_config(target.tls_verify).map_err(|source| BuildError::Tls {
            name: target.name.clone(),
            source,
        })?;

        if !target.tls_verify && target.is_https() {
            tracing::warn!(
                upstream = %target.name,
                origin = %target.origin,
                "TLS certificate verification disabled for upstream"
            );
        }

        let connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls)
            .https_or_http()
            .enable_http1()
            .wrap_connector(http);
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self { target, client })
    }

    /// The target this forwarder relays to.
    pub fn target(&self) -> &Arc<UpstreamTarget> {
        &self.target
    }

    /// Forward the request and return the upstream response with a streaming body.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response<Body>, ForwardError> {
        let (mut parts, body) = request.into_parts();

        let path_and_query = parts
            .uri
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));
        let path = path_and_query.as_str().to_string();
        parts.uri = self
            .target
            .uri_for(path_and_query)
            .map_err(|source| ForwardError::InvalidRequest { path, source })?;
        parts.version = Version::HTTP_11;

        headers::strip_hop_by_hop(&mut parts.headers);
        headers::apply_overrides(&mut parts.headers, &self.target.header_overrides);

        tracing::debug!(
            upstream = %self.target.name,
            method = %parts.method,
            uri = %parts.uri,
            "Forwarding request"
        );

        let pending = self.client.request(Request::from_parts(parts, body));
        let result = match self.target.response_timeout {
            Some(limit) => tokio::time::timeout(limit, pending)
                .await
                .map_err(|_| ForwardError::UpstreamTimeout {
                    target: self.target.name.clone(),
                })?,
            None => pending.await,
        };
        let upstream_response = result.map_err(|source| self.classify(source))?;

        let (mut upstream_parts, upstream_body) = upstream_response.into_parts();
        headers::strip_hop_by_hop(&mut upstream_parts.headers);
        Ok(Response::from_parts(upstream_parts, Body::new(upstream_body)))
    }

    fn classify(&self, source: hyper_util::client::legacy::Error) -> ForwardError {
        let target = self.target.name.clone();
        if source.is_connect() && timed_out(&source) {
            ForwardError::UpstreamTimeout { target }
        } else {
            ForwardError::UpstreamUnavailable { target, source }
        }
    }
}

/// Whether an I/O timeout sits anywhere in the error chain.
fn timed_out(error: &hyper_util::client::legacy::Error) -> bool {
    let mut cause = error.source();
    while let Some(err) = cause {
        if let Some(io) = err.downcast_ref::<io::Error>() {
            if io.kind() == io::ErrorKind::TimedOut {
                return true;
            }
        }
        cause = err.source();
    }
    false
}
