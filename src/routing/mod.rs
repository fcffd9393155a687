//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request target (path + query)
//!     → router.rs (ordered route scan)
//!     → matcher.rs (evaluate pattern)
//!     → Return: matched UpstreamTarget or NoMatch
//!
//! Route Compilation (at startup):
//!     RouteConfig[] (declaration order = priority)
//!     → Build matchers, resolve upstream names
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (substring/prefix only)
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order)

pub mod matcher;
pub mod router;

pub use matcher::{Matcher, PathPrefixMatcher, SubstringMatcher};
pub use router::{Route, RouteTable};
