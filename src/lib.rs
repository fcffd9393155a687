//! Bazaar development proxy.
//!
//! Routes `/api`, `/order_times` and `/monthly_cost` style request targets to
//! configured upstream origins by ordered substring rules, and serves the built
//! UI bundle (or a dev server) for everything else.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::{Shutdown, ShutdownSignal};
