//! Upstream registry.
//!
//! # Responsibilities
//! - Compile every configured upstream into a target and its forwarder
//! - Look up targets and forwarders by name

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::UpstreamConfig;
use crate::upstream::forwarder::Forwarder;
use crate::upstream::target::UpstreamTarget;
use crate::upstream::BuildError;

/// All upstreams known to the process, keyed by name.
#[derive(Debug, Default)]
pub struct UpstreamManager {
    forwarders: HashMap<String, Forwarder>,
}

impl UpstreamManager {
    /// Build targets and forwarders from configuration.
    pub fn from_config(configs: &[UpstreamConfig]) -> Result<Self, BuildError> {
        let mut forwarders = HashMap::with_capacity(configs.len());
        for config in configs {
            let target = Arc::new(UpstreamTarget::from_config(config)?);
            tracing::info!(
                upstream = %target.name,
                origin = %target.origin,
                overrides = target.header_overrides.len(),
                "Upstream configured"
            );
            forwarders.insert(config.name.clone(), Forwarder::new(target)?);
        }
        Ok(Self { forwarders })
    }

    /// Target registered under `name`.
    pub fn target(&self, name: &str) -> Option<&Arc<UpstreamTarget>> {
        self.forwarders.get(name).map(Forwarder::target)
    }

    /// Forwarder for the target registered under `name`.
    pub fn forwarder(&self, name: &str) -> Option<&Forwarder> {
        self.forwarders.get(name)
    }

    pub fn len(&self) -> usize {
        self.forwarders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forwarders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_by_name() {
        let manager = UpstreamManager::from_config(&[UpstreamConfig {
            name: "orders".into(),
            base_url: "https://orders.example.com".into(),
            header_overrides: Default::default(),
            tls_verify: true,
            connect_timeout_ms: None,
            response_timeout_ms: None,
        }])
        .unwrap();

        assert_eq!(manager.len(), 1);
        assert_eq!(manager.target("orders").unwrap().origin, "https://orders.example.com");
        assert!(manager.forwarder("orders").is_some());
        assert!(manager.target("costs").is_none());
    }
}
