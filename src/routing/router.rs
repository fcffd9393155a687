//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes in configured order
//! - Look up the upstream target for a request target
//! - Return the matched target or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in declaration order; first match wins
//! - No match is not an error: the caller falls back to its default handler

use std::sync::Arc;

use crate::config::RouteConfig;
use crate::routing::matcher::{build_matcher, Matcher};
use crate::upstream::{BuildError, UpstreamManager, UpstreamTarget};

/// A compiled route rule.
#[derive(Debug)]
pub struct Route {
    matcher: Box<dyn Matcher>,
    target: Arc<UpstreamTarget>,
}

impl Route {
    pub fn pattern(&self) -> &str {
        self.matcher.pattern()
    }

    pub fn target(&self) -> &Arc<UpstreamTarget> {
        &self.target
    }
}

/// Ordered route rules, fixed for the process lifetime.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Compile route configuration against the known upstreams.
    pub fn from_config(
        configs: &[RouteConfig],
        upstreams: &UpstreamManager,
    ) -> Result<Self, BuildError> {
        let routes = configs
            .iter()
            .map(|config| -> Result<Route, BuildError> {
                let target = upstreams
                    .target(&config.upstream)
                    .ok_or_else(|| BuildError::UnknownUpstream(config.upstream.clone()))?;
                Ok(Route {
                    matcher: build_matcher(config.match_kind, &config.pattern),
                    target: Arc::clone(target),
                })
            })
            .collect::<Result<Vec<_>, BuildError>>()?;

        for (priority, route) in routes.iter().enumerate() {
            tracing::debug!(
                priority,
                pattern = %route.pattern(),
                upstream = %route.target.name,
                "Route compiled"
            );
        }

        Ok(Self { routes })
    }

    /// Upstream target of the first route matching `request_target`.
    pub fn match_target(&self, request_target: &str) -> Option<&Arc<UpstreamTarget>> {
        self.match_route(request_target).map(Route::target)
    }

    /// First route matching `request_target`.
    pub fn match_route(&self, request_target: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.matcher.matches(request_target))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
