//! Upstream target abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream origin
//! - Hold the compiled header overrides for forwarded requests
//! - Build outbound URIs from the incoming request target
//!
//! # Design Decisions
//! - The incoming path and query are reused byte for byte; dot segments and
//!   percent escapes are never normalized on the way out

use std::time::Duration;

use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Uri};

use crate::config::validation::check_origin;
use crate::config::UpstreamConfig;
use crate::upstream::BuildError;

/// A remote HTTP origin that matched requests are forwarded to.
///
/// Built once at startup and shared read-only between request handlers.
#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    /// Name referenced by route rules.
    pub name: String,
    /// Serialized origin without trailing slash, e.g. `https://orders.example.com`.
    pub origin: String,
    scheme: Scheme,
    authority: Authority,
    /// Headers set on every forwarded request.
    pub header_overrides: HeaderMap,
    /// Whether the upstream certificate is verified.
    pub tls_verify: bool,
    pub connect_timeout: Option<Duration>,
    pub response_timeout: Option<Duration>,
}

impl UpstreamTarget {
    /// Compile an upstream from its configuration.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, BuildError> {
        let invalid = |reason: String| BuildError::InvalidTarget {
            name: config.name.clone(),
            reason,
        };

        let url = check_origin(&config.base_url).map_err(invalid)?;
        let origin = url.origin().ascii_serialization();
        let parsed: Uri = origin
            .parse()
            .map_err(|e| invalid(format!("origin '{}': {}", origin, e)))?;
        let (Some(scheme), Some(authority)) = (parsed.scheme(), parsed.authority()) else {
            return Err(invalid(format!("origin '{}' has no scheme or authority", origin)));
        };
        let (scheme, authority) = (scheme.clone(), authority.clone());

        let mut header_overrides = HeaderMap::with_capacity(config.header_overrides.len());
        for (name, value) in &config.header_overrides {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| invalid(format!("header '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| invalid(format!("header '{}': {}", name, e)))?;
            header_overrides.insert(name, value);
        }

        Ok(Self {
            name: config.name.clone(),
            origin,
            scheme,
            authority,
            header_overrides,
            tls_verify: config.tls_verify,
            connect_timeout: config.connect_timeout_ms.map(Duration::from_millis),
            response_timeout: config.response_timeout_ms.map(Duration::from_millis),
        })
    }

    /// Whether connections to this target use TLS.
    pub fn is_https(&self) -> bool {
        self.scheme == Scheme::HTTPS
    }

    /// Outbound URI for a request target (path plus optional query).
    pub fn uri_for(&self, path_and_query: PathAndQuery) -> Result<Uri, axum::http::Error> {
        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
    }
}
