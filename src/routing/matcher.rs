//! Route matching logic.
//!
//! # Responsibilities
//! - Test a route pattern against the request target (path + query)
//!
//! # Design Decisions
//! - Substring matching is the default: a pattern matches wherever it appears,
//!   so `/order_times` also matches `/order_timestamp` and `/x?next=/order_times`
//! - Prefix matching is opt-in per route and only looks at the path
//! - Matching is case-sensitive
//! - No regex to guarantee O(n) matching

use crate::config::MatchKind;

/// Trait for matching a request target against a pattern.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request target matches this condition.
    ///
    /// `target` is the path plus query string, exactly as received.
    fn matches(&self, target: &str) -> bool;

    /// The configured pattern, for logging.
    fn pattern(&self) -> &str;
}

/// Matches when the pattern occurs anywhere in the request target.
#[derive(Debug, Clone)]
pub struct SubstringMatcher {
    pattern: String,
}

impl SubstringMatcher {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}

impl Matcher for SubstringMatcher {
    fn matches(&self, target: &str) -> bool {
        target.contains(&self.pattern)
    }

    fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, target: &str) -> bool {
        let path = target.split_once('?').map_or(target, |(path, _)| path);
        path.starts_with(&self.prefix)
    }

    fn pattern(&self) -> &str {
        &self.prefix
    }
}

/// Build the matcher for a configured route.
pub fn build_matcher(kind: MatchKind, pattern: &str) -> Box<dyn Matcher> {
    match kind {
        MatchKind::Substring => Box::new(SubstringMatcher::new(pattern)),
        MatchKind::Prefix => Box::new(PathPrefixMatcher::new(pattern)),
    }
}
