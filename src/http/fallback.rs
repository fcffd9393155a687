//! Handling for requests that match no route.
//!
//! # Responsibilities
//! - Serve the built UI bundle from disk (default)
//! - Or relay unmatched traffic to a configured upstream (e.g., a dev server)
//!
//! # Design Decisions
//! - Static serving is a thin wrapper over `tower_http::services::ServeDir`
//! - Missing files produce 404; the proxy never synthesises index pages

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::config::FallbackConfig;
use crate::upstream::{BuildError, UpstreamManager};

/// Static file tree served for unmatched paths.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    service: ServeDir,
}

impl StaticFiles {
    pub fn new(dir: impl Into<PathBuf>, index: bool) -> Self {
        let dir = dir.into();
        if !dir.is_dir() {
            tracing::warn!(dir = %dir.display(), "Static directory does not exist; unmatched paths will 404");
        }
        let service = ServeDir::new(&dir).append_index_html_on_directories(index);
        Self { service }
    }

    /// Serve the request from disk.
    pub async fn serve(&self, request: Request<Body>) -> Response {
        let path = request.uri().path().to_string();
        let response = match self.service.clone().oneshot(request).await {
            Ok(response) => response.map(Body::new),
            Err(never) => match never {},
        };
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(path = %path, "Static asset not found");
        }
        response
    }
}

/// Default handler for requests no route claims.
#[derive(Debug, Clone)]
pub enum Fallback {
    Static(StaticFiles),
    /// Name of the upstream receiving unmatched requests.
    Upstream(String),
}

impl Fallback {
    pub fn from_config(config: &FallbackConfig, upstreams: &UpstreamManager) -> Result<Self, BuildError> {
        match config {
            FallbackConfig::Static { dir, index } => Ok(Fallback::Static(StaticFiles::new(dir, *index))),
            FallbackConfig::Upstream { upstream } => {
                if upstreams.forwarder(upstream).is_none() {
                    return Err(BuildError::UnknownUpstream(upstream.clone()));
                }
                Ok(Fallback::Upstream(upstream.clone()))
            }
        }
    }

    /// Label used in logs and metrics.
    pub fn label(&self) -> &str {
        match self {
            Fallback::Static(_) => "static",
            Fallback::Upstream(name) => name,
        }
    }
}
