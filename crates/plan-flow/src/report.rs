//! Execution report assembly
//!
//! The report is a self-contained, serde-serializable value: the plan it
//! ran, one result per executed step in strict step-number order, the steps
//! that never ran, and every recorded failure. Persisting it verbatim is
//! enough to audit or replay the run; screenshot bytes stay on disk and are
//! referenced by stable names.

use crate::evidence::EvidenceRef;
use action_dispatch::{ActionResult, ErrorInfo};
use chrono::{DateTime, Utc};
use plan_core::{ActionKind, Plan, Step};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;
use verify_gate::VerificationResult;

/// Terminal state of an executed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Action succeeded and verification passed
    Succeeded,

    /// Failed with recoverable severity; the run continued
    FailedRecoverable,

    /// Failed with fatal severity; the run halted here
    FailedFatal,
}

/// Result of one executed step. Owned exclusively by the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub step: Step,
    pub status: StepStatus,
    pub action_result: ActionResult,
    pub verification: VerificationResult,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_before: Option<EvidenceRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_after: Option<EvidenceRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_error: Option<EvidenceRef>,

    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,

    /// The failure recorded for this step, when it failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl StepResult {
    pub fn succeeded(&self) -> bool {
        self.status == StepStatus::Succeeded
    }
}

/// Why steps after a halt were never dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// An earlier step failed fatally
    FatalFailure,

    /// External cancellation observed at a step boundary
    Cancelled,
}

/// A step that was never dispatched; carries no action result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedStep {
    pub step_number: u32,

    #[serde(rename = "action_type")]
    pub kind: ActionKind,

    pub description: String,
    pub reason: SkipReason,
}

/// One recorded failure, tied to its step when it has one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<ActionKind>,

    #[serde(flatten)]
    pub info: ErrorInfo,
}

/// Auditable, replayable record of one `execute(plan)` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub run_id: Uuid,
    pub plan: Plan,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,

    /// True iff every step was dispatched and succeeded
    pub success: bool,

    /// Steps that were dispatched (equals `step_results.len()`)
    pub steps_executed: usize,

    pub steps_total: usize,

    /// Executed steps in strict step-number order
    pub step_results: Vec<StepResult>,

    /// Steps that never ran, recorded with no action result
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_steps: Vec<SkippedStep>,

    /// Every recorded failure, recoverable and fatal alike
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ReportError>,
}

impl ExecutionReport {
    /// Persist the report as pretty JSON with a timestamped, task-slugged
    /// file name; returns the path written.
    pub fn save(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let slug: String = self
            .plan
            .task_description
            .chars()
            .take(50)
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        let stamp = self.started_at.format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("execution_{slug}_{stamp}.json"));

        let json = serde_json::to_string_pretty(self)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    /// Human-readable run summary for console output.
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        let push = |out: &mut String, line: String| {
            out.push_str(&line);
            out.push('\n');
        };

        push(&mut out, format!("Task:   {}", self.plan.task_description));
        push(
            &mut out,
            format!(
                "Status: {}",
                if self.success { "SUCCESS" } else { "FAILED" }
            ),
        );
        push(
            &mut out,
            format!("Steps:  {}/{}", self.steps_executed, self.steps_total),
        );
        push(
            &mut out,
            format!("Window: {} .. {}", self.started_at, self.completed_at),
        );

        for result in &self.step_results {
            let mark = match result.status {
                StepStatus::Succeeded => "ok  ",
                StepStatus::FailedRecoverable => "FAIL",
                StepStatus::FailedFatal => "HALT",
            };
            push(
                &mut out,
                format!(
                    "  [{mark}] step {} {} - {}",
                    result.step.step_number, result.step.kind, result.step.description
                ),
            );
            if let Some(error) = &result.error {
                push(&mut out, format!("         {error}"));
            }
            for check in result
                .verification
                .checks
                .iter()
                .filter(|check| !check.passed)
            {
                push(
                    &mut out,
                    format!("         check {:?} failed: {}", check.kind, check.detail),
                );
            }
        }

        for skipped in &self.skipped_steps {
            push(
                &mut out,
                format!(
                    "  [skip] step {} {} - {:?}",
                    skipped.step_number, skipped.kind, skipped.reason
                ),
            );
        }

        out
    }
}
