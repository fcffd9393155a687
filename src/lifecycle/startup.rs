//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind the listening socket
//! - Report the one fatal startup condition (address unusable) clearly
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

/// Fatal startup failure.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid bind address '{0}'")]
    InvalidAddress(String),

    #[error("address {0} is already in use")]
    AddrInUse(SocketAddr),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Bind the proxy's listening socket.
pub async fn bind_listener(bind_address: &str) -> Result<TcpListener, StartupError> {
    let addr: SocketAddr = bind_address
        .parse()
        .map_err(|_| StartupError::InvalidAddress(bind_address.to_string()))?;

    let listener = TcpListener::bind(addr).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::AddrInUse {
            StartupError::AddrInUse(addr)
        } else {
            StartupError::Bind { addr, source }
        }
    })?;

    tracing::info!(address = %listener.local_addr().unwrap_or(addr), "Listening for connections");
    Ok(listener)
}
