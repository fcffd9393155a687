//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → routing (match request target)
//!     → upstream forwarder  |  fallback.rs (static files or default upstream)
//!     → response.rs (error mapping when forwarding fails)
//!     → Send to client
//! ```

pub mod fallback;
pub mod response;
pub mod server;

pub use fallback::{Fallback, StaticFiles};
pub use server::HttpServer;
