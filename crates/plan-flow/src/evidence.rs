//! Evidence capture
//!
//! Pure side-effect recorder: screenshots at the defined capture points,
//! written under the configured directory with stable, step-indexed names.
//! No decision logic lives here, and a failed capture never fails the step
//! it documents.

use action_dispatch::EvidenceSink;
use async_trait::async_trait;
use driver_port::{BrowserDriver, DriverError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Where in a step's lifecycle a capture happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePoint {
    /// Before any browser interaction for the step
    Before,

    /// After the action, before verification
    After,

    /// After a step failed
    Error,

    /// Explicit plan-requested capture
    Requested,
}

impl CapturePoint {
    fn suffix(&self) -> &'static str {
        match self {
            CapturePoint::Before => "before",
            CapturePoint::After => "after",
            CapturePoint::Error => "error",
            CapturePoint::Requested => "capture",
        }
    }
}

/// Stable reference to a captured screenshot.
///
/// Reports carry these references; the bytes stay on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRef {
    /// Stable step-indexed name, e.g. `step_3_before`
    pub label: String,

    /// File the bytes were written to
    pub path: PathBuf,
}

/// Screenshot collector over the run's browser session.
pub struct EvidenceCollector {
    driver: Arc<dyn BrowserDriver>,
    dir: PathBuf,
}

impl EvidenceCollector {
    pub fn new(driver: Arc<dyn BrowserDriver>, dir: PathBuf) -> Self {
        Self { driver, dir }
    }

    /// Stable label for a capture point of a step.
    pub fn label_for(step_number: u32, point: CapturePoint) -> String {
        format!("step_{}_{}", step_number, point.suffix())
    }

    /// Capture and persist a screenshot; tolerant of failure.
    ///
    /// Returns `None` when the capture could not be taken or written; the
    /// step carries on either way.
    pub async fn capture(&self, step_number: u32, point: CapturePoint) -> Option<EvidenceRef> {
        match self.try_capture(step_number, point).await {
            Ok(evidence) => Some(evidence),
            Err(err) => {
                warn!(step = step_number, point = point.suffix(), %err, "screenshot capture failed");
                None
            }
        }
    }

    async fn try_capture(
        &self,
        step_number: u32,
        point: CapturePoint,
    ) -> Result<EvidenceRef, DriverError> {
        let bytes = self.driver.screenshot().await?;
        let label = Self::label_for(step_number, point);
        let path = self.dir.join(format!("{label}.png"));

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| DriverError::Protocol(format!("evidence dir: {err}")))?;
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|err| DriverError::Protocol(format!("evidence write: {err}")))?;

        debug!(label = %label, bytes = bytes.len(), "evidence captured");
        Ok(EvidenceRef { label, path })
    }
}

#[async_trait]
impl EvidenceSink for EvidenceCollector {
    async fn capture_requested(&self, step_number: u32) -> Result<String, DriverError> {
        self.try_capture(step_number, CapturePoint::Requested)
            .await
            .map(|evidence| evidence.label)
    }
}
