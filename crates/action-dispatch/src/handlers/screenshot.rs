//! Plan-requested screenshot handler

use crate::errors::{ErrorInfo, FailureKind};
use crate::ports::EvidenceSink;
use crate::types::{ActionData, ActionResult};
use plan_core::Step;
use tracing::info;

/// Delegate an explicit capture to the evidence sink.
///
/// This runs outside the executor's before/after capture points; the sink
/// owns naming and persistence.
pub(crate) async fn execute_screenshot(evidence: &dyn EvidenceSink, step: &Step) -> ActionResult {
    match evidence.capture_requested(step.step_number).await {
        Ok(label) => {
            info!(step = step.step_number, label = %label, "screenshot captured");
            ActionResult::success(ActionData::Screenshot { label: Some(label) })
        }
        Err(err) => ActionResult::failure(
            ActionData::Screenshot { label: None },
            ErrorInfo::from_driver(err, FailureKind::Timeout),
        ),
    }
}
