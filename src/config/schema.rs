//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the dev proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream origins that matched requests are forwarded to.
    pub upstreams: Vec<UpstreamConfig>,

    /// Ordered route rules. Earlier entries win over later ones.
    pub routes: Vec<RouteConfig>,

    /// Where requests matching no route go.
    pub fallback: FallbackConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:4000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:4000".to_string(),
        }
    }
}

/// An upstream origin.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Unique name referenced by routes.
    pub name: String,

    /// Origin only: scheme, host and optional port (e.g., "https://orders.example.com").
    pub base_url: String,

    /// Headers set on every forwarded request, replacing incoming values.
    #[serde(default)]
    pub header_overrides: BTreeMap<String, String>,

    /// Verify the upstream's TLS certificate. Turning this off is insecure.
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// TCP/TLS connect timeout. No timeout when unset.
    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,

    /// Deadline for the upstream's response headers. No timeout when unset.
    #[serde(default)]
    pub response_timeout_ms: Option<u64>,
}

fn default_tls_verify() -> bool {
    true
}

/// How a route pattern is compared with the request target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Pattern appears anywhere in path + query.
    #[default]
    Substring,
    /// Path starts with the pattern.
    Prefix,
}

/// Route rule mapping requests to an upstream.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Pattern tested against the request target.
    pub pattern: String,

    /// Upstream name to forward to.
    pub upstream: String,

    #[serde(default)]
    pub match_kind: MatchKind,
}

/// Handler for requests that match no route.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackConfig {
    /// Serve files from a local directory (the built UI bundle).
    Static {
        dir: String,
        /// Append `index.html` when a directory is requested.
        #[serde(default = "default_index")]
        index: bool,
    },
    /// Forward to a configured upstream (e.g., a dev server).
    Upstream { upstream: String },
}

fn default_index() -> bool {
    true
}

impl Default for FallbackConfig {
    fn default() -> Self {
        FallbackConfig::Static {
            dir: "build".to_string(),
            index: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Tag requests with `x-request-id` and echo it on responses. Off by default
    /// so forwarded requests carry only the caller's headers and the overrides.
    pub request_id: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            request_id: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
