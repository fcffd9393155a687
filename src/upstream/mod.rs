//! Upstream forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Route matched → upstream name identified
//!     → pool.rs (look up forwarder)
//!     → headers.rs (strip hop-by-hop, apply overrides)
//!     → forwarder.rs (outbound request over tls.rs connector, streamed response)
//!     → Response or ForwardError
//! ```
//!
//! # Design Decisions
//! - Targets are built once at startup and never mutated
//! - Header rewriting is declarative (per-target override map)
//! - Upstream failures are per-request and never fatal

pub mod forwarder;
pub mod headers;
pub mod pool;
pub mod target;
pub mod tls;

use thiserror::Error;

pub use forwarder::{ForwardError, Forwarder};
pub use pool::UpstreamManager;
pub use target::UpstreamTarget;

/// Failure compiling configuration into runtime upstreams and routes.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("upstream '{name}': {reason}")]
    InvalidTarget { name: String, reason: String },

    #[error("upstream '{name}': failed to build TLS config: {source}")]
    Tls {
        name: String,
        #[source]
        source: rustls::Error,
    },

    #[error("unknown upstream '{0}'")]
    UnknownUpstream(String),
}
