//! Ports consumed by the dispatcher

use async_trait::async_trait;
use driver_port::DriverError;

/// Sink for plan-requested screenshots.
///
/// The screenshot action captures outside the executor's before/after
/// points; the concrete collector lives with the executor, so the
/// dispatcher reaches it through this port.
#[async_trait]
pub trait EvidenceSink: Send + Sync {
    /// Capture a screenshot for the given step; returns its stable label.
    async fn capture_requested(&self, step_number: u32) -> Result<String, DriverError>;
}
