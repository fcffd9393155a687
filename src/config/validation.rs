//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (routes reference existing upstreams)
//! - Validate upstream origins and header overrides
//! - Validate listener and metrics addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;
use url::Url;

use crate::config::schema::{FallbackConfig, ProxyConfig, UpstreamConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("upstream name must not be empty")]
    EmptyUpstreamName,

    #[error("duplicate upstream '{0}'")]
    DuplicateUpstream(String),

    #[error("upstream '{name}': invalid base_url '{url}': {reason}")]
    BaseUrl { name: String, url: String, reason: String },

    #[error("upstream '{name}': invalid header override '{header}'")]
    HeaderOverride { name: String, header: String },

    #[error("route #{index}: pattern must not be empty")]
    EmptyPattern { index: usize },

    #[error("route #{index} ('{pattern}') references unknown upstream '{upstream}'")]
    UnknownRouteUpstream { index: usize, pattern: String, upstream: String },

    #[error("fallback references unknown upstream '{0}'")]
    UnknownFallbackUpstream(String),

    #[error("static fallback directory must not be empty")]
    EmptyStaticDir,
}

/// Check the configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let mut names = HashSet::new();
    for upstream in &config.upstreams {
        if upstream.name.is_empty() {
            errors.push(ValidationError::EmptyUpstreamName);
        } else if !names.insert(upstream.name.as_str()) {
            errors.push(ValidationError::DuplicateUpstream(upstream.name.clone()));
        }
        validate_upstream(upstream, &mut errors);
    }

    for (index, route) in config.routes.iter().enumerate() {
        if route.pattern.is_empty() {
            errors.push(ValidationError::EmptyPattern { index });
        }
        if !names.contains(route.upstream.as_str()) {
            errors.push(ValidationError::UnknownRouteUpstream {
                index,
                pattern: route.pattern.clone(),
                upstream: route.upstream.clone(),
            });
        }
    }

    match &config.fallback {
        FallbackConfig::Static { dir, .. } if dir.is_empty() => {
            errors.push(ValidationError::EmptyStaticDir);
        }
        FallbackConfig::Upstream { upstream } if !names.contains(upstream.as_str()) => {
            errors.push(ValidationError::UnknownFallbackUpstream(upstream.clone()));
        }
        _ => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_upstream(upstream: &UpstreamConfig, errors: &mut Vec<ValidationError>) {
    if let Err(reason) = check_origin(&upstream.base_url) {
        errors.push(ValidationError::BaseUrl {
            name: upstream.name.clone(),
            url: upstream.base_url.clone(),
            reason,
        });
    }

    for (header, value) in &upstream.header_overrides {
        if HeaderName::from_bytes(header.as_bytes()).is_err()
            || HeaderValue::from_str(value).is_err()
        {
            errors.push(ValidationError::HeaderOverride {
                name: upstream.name.clone(),
                header: header.clone(),
            });
        }
    }
}

/// An origin is scheme + host + optional port; nothing else.
pub(crate) fn check_origin(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err("must be an origin without path, query or fragment".to_string());
    }
    Ok(url)
}
