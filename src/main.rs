//! Bazaar development proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!   Browser request     │                 BAZAAR PROXY                 │
//!   ────────────────────┼─▶ http server ─▶ routing ──┬─▶ forwarder ────┼──▶ upstream A
//!                       │   (axum)        (ordered   │   (per target)  │     (orders API)
//!                       │                 substring) ├─▶ forwarder ────┼──▶ upstream B
//!                       │                            │                 │     (cost backend)
//!   Response            │                            └─▶ fallback ─────┼──▶ static bundle
//!   ◀───────────────────┼── streamed back unmodified                   │     or dev server
//!                       └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use bazaar_proxy::config::{load_config, ProxyConfig};
use bazaar_proxy::lifecycle::{bind_listener, signals, Shutdown};
use bazaar_proxy::observability::{init_logging, metrics};
use bazaar_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "bazaar-proxy")]
#[command(about = "Development proxy for the Bazaar UI", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    init_logging(&config.observability);

    if cli.check {
        println!(
            "configuration OK: {} upstream(s), {} route(s)",
            config.upstreams.len(),
            config.routes.len()
        );
        return Ok(());
    }

    tracing::info!("bazaar-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstreams = config.upstreams.len(),
        routes = config.routes.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = match bind_listener(&bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "Cannot start listener");
            return Err(e.into());
        }
    };

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
