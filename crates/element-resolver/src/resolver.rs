//! Resolver with fixed fallback chain

use crate::errors::ResolveError;
use async_trait::async_trait;
use driver_port::{BrowserDriver, ElementHandle, FindStrategy};
use plan_core::TargetSpec;
use std::sync::Arc;
use tracing::debug;

/// A successful resolution, recording which probe matched.
#[derive(Debug, Clone)]
pub struct ResolvedElement {
    /// Live handle for driver interaction
    pub handle: ElementHandle,

    /// Strategy that produced the match
    pub strategy: FindStrategy,

    /// Probe value handed to the driver
    pub matched: String,
}

/// Element resolver contract.
#[async_trait]
pub trait ElementResolver: Send + Sync {
    /// Resolve a step target. `Ok(None)` means every strategy exhausted.
    async fn resolve(&self, target: &TargetSpec) -> Result<Option<ResolvedElement>, ResolveError>;

    /// Resolve a single form field by its literal name.
    async fn resolve_field(&self, field: &str) -> Result<Option<ResolvedElement>, ResolveError>;
}

/// Default resolver over a browser driver.
pub struct DefaultElementResolver {
    driver: Arc<dyn BrowserDriver>,
}

impl DefaultElementResolver {
    pub fn new(driver: Arc<dyn BrowserDriver>) -> Self {
        Self { driver }
    }

    /// Run the probe chain, first match wins.
    async fn try_chain(
        &self,
        probes: &[(FindStrategy, &str)],
    ) -> Result<Option<ResolvedElement>, ResolveError> {
        for (strategy, value) in probes {
            debug!(strategy = strategy.name(), value, "trying strategy");
            if let Some(handle) = self.driver.find_element(*strategy, value).await? {
                debug!(
                    strategy = strategy.name(),
                    node = %handle.node_id,
                    "element resolved"
                );
                return Ok(Some(ResolvedElement {
                    handle,
                    strategy: *strategy,
                    matched: (*value).to_string(),
                }));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl ElementResolver for DefaultElementResolver {
    async fn resolve(&self, target: &TargetSpec) -> Result<Option<ResolvedElement>, ResolveError> {
        let mut probes: Vec<(FindStrategy, &str)> = Vec::new();

        if let Some(selector) = target.selector.as_deref() {
            probes.push((FindStrategy::Selector, selector));
        }
        if let Some(text) = target.text.as_deref() {
            // The text field doubles as a literal identifier before it is
            // tried as label, placeholder, or visible text.
            probes.push((FindStrategy::IdOrName, text));
            probes.push((FindStrategy::Label, text));
            probes.push((FindStrategy::Placeholder, text));
            probes.push((FindStrategy::VisibleText, text));
        }

        if probes.is_empty() {
            return Ok(None);
        }
        self.try_chain(&probes).await
    }

    async fn resolve_field(&self, field: &str) -> Result<Option<ResolvedElement>, ResolveError> {
        self.try_chain(&[
            (FindStrategy::IdOrName, field),
            (FindStrategy::Label, field),
            (FindStrategy::Placeholder, field),
        ])
        .await
    }
}
