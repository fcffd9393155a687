//! Stop coordination between the signal listener and the HTTP server.
//!
//! # Responsibilities
//! - Carry a single "stop accepting" flag from whoever decides to stop
//!   (signal listener, tests) to the server's drain loop
//!
//! # Design Decisions
//! - Backed by a `watch` flag: a subscriber created after `trigger` still
//!   observes the stop
//! - Dropping every `Shutdown` handle counts as a stop request
//! - The flag only ever goes from running to stopping

use std::sync::Arc;

use tokio::sync::watch;

/// Handle that requests the proxy to stop.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

/// Receiving side held by the server.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Ask every subscriber to stop. Repeated calls are no-ops.
    pub fn trigger(&self) {
        self.tx.send_if_modified(|stopping| !std::mem::replace(stopping, true));
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Resolve once a stop was requested, including one requested before this call.
    pub async fn stopped(mut self) {
        // Err means every handle is gone, which is also a stop.
        let _ = self.rx.wait_for(|stopping| *stopping).await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn trigger_reaches_every_subscriber() {
        let shutdown = Shutdown::new();
        let a = shutdown.subscribe();
        let b = shutdown.clone().subscribe();

        shutdown.trigger();
        shutdown.trigger();
        assert!(shutdown.is_triggered());

        tokio::time::timeout(Duration::from_secs(1), async {
            a.stopped().await;
            b.stopped().await;
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn late_subscriber_sees_earlier_trigger() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        tokio::time::timeout(Duration::from_secs(1), shutdown.subscribe().stopped())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn pending_until_triggered() {
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        assert!(!shutdown.is_triggered());

        let waited = tokio::time::timeout(Duration::from_millis(50), signal.clone().stopped()).await;
        assert!(waited.is_err());

        drop(shutdown);
        tokio::time::timeout(Duration::from_secs(1), signal.stopped())
            .await
            .unwrap();
    }
}
