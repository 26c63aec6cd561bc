//! Plan executor

use crate::config::ExecutorConfig;
use crate::evidence::{CapturePoint, EvidenceCollector};
use crate::report::{
    ExecutionReport, ReportError, SkipReason, SkippedStep, StepResult, StepStatus,
};
use action_dispatch::{
    ActionData, ActionDispatcher, ActionResult, DispatchCtx, ErrorInfo, FailureKind, Severity,
};
use chrono::Utc;
use driver_port::{BrowserDriver, DriverSessionFactory};
use element_resolver::DefaultElementResolver;
use plan_core::{validate_plan, Plan, Step};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;
use verify_gate::{DefaultVerificationEngine, VerificationEngine};

/// Grace added to the outer step timeout so cooperative handlers can finish
/// converting an exhausted budget into a recorded failure themselves.
const STEP_TIMEOUT_GRACE: Duration = Duration::from_millis(100);

/// Orchestrates one plan run against one browser session.
///
/// Per-step lifecycle: `Pending → Dispatching → Verifying →
/// { Succeeded | FailedRecoverable | FailedFatal }`; remaining steps become
/// `Skipped` after a fatal failure or cancellation. Verification always
/// runs once dispatch returns, success flag or not, so every step leaves
/// diagnostic evidence.
pub struct PlanExecutor {
    factory: Arc<dyn DriverSessionFactory>,
    config: ExecutorConfig,
    cancel: CancellationToken,
}

impl PlanExecutor {
    pub fn new(factory: Arc<dyn DriverSessionFactory>, config: ExecutorConfig) -> Self {
        Self {
            factory,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Token for cancelling the run externally.
    ///
    /// Cancellation is observed at step boundaries, never mid-action.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Execute the plan and assemble the report.
    ///
    /// Never returns an error: every failure, fatal included, is folded
    /// into the report. The plan itself is only borrowed; the report keeps
    /// its own verbatim copy.
    pub async fn execute(&self, plan: &Plan) -> ExecutionReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, task = %plan.task_description, steps = plan.steps.len(), "executing plan");

        if let Err(schema_err) = validate_plan(plan) {
            warn!(%run_id, error = %schema_err, "plan rejected before execution");
            return self.finalize(
                run_id,
                plan,
                started_at,
                Vec::new(),
                Vec::new(),
                vec![ReportError {
                    step: None,
                    action_type: None,
                    info: ErrorInfo::new(FailureKind::Schema, schema_err.to_string()),
                }],
            );
        }

        let session = match self.factory.acquire().await {
            Ok(session) => session,
            Err(err) => {
                warn!(%run_id, error = %err, "browser session acquisition failed");
                return self.finalize(
                    run_id,
                    plan,
                    started_at,
                    Vec::new(),
                    plan.steps
                        .iter()
                        .map(|step| skipped(step, SkipReason::FatalFailure))
                        .collect(),
                    vec![ReportError {
                        step: None,
                        action_type: None,
                        info: ErrorInfo::from_driver(err, FailureKind::SessionLoss),
                    }],
                );
            }
        };

        let driver: Arc<dyn BrowserDriver> = Arc::from(session);
        let resolver = Arc::new(DefaultElementResolver::new(driver.clone()));
        let evidence = Arc::new(EvidenceCollector::new(
            driver.clone(),
            self.config.screenshot_dir.clone(),
        ));
        let dispatcher =
            ActionDispatcher::new(driver.clone(), resolver.clone(), evidence.clone());
        let verifier = DefaultVerificationEngine::new(driver.clone(), resolver.clone());

        let plan_deadline = Instant::now() + self.config.plan_timeout;
        let mut step_results: Vec<StepResult> = Vec::new();
        let mut skipped_steps: Vec<SkippedStep> = Vec::new();
        let mut errors: Vec<ReportError> = Vec::new();
        let mut halted: Option<SkipReason> = None;

        for (index, step) in plan.steps.iter().enumerate() {
            if let Some(reason) = halted {
                skipped_steps.push(skipped(step, reason));
                continue;
            }

            // Cancellation is only observable here, between steps.
            if self.cancel.is_cancelled() {
                info!(%run_id, step = step.step_number, "cancellation observed at step boundary");
                errors.push(ReportError {
                    step: None,
                    action_type: None,
                    info: ErrorInfo::new(
                        FailureKind::Cancelled,
                        format!("run cancelled before step {}", step.step_number),
                    ),
                });
                halted = Some(SkipReason::Cancelled);
                skipped_steps.push(skipped(step, SkipReason::Cancelled));
                continue;
            }

            let result = self
                .run_step(step, &dispatcher, &verifier, &evidence, plan_deadline)
                .await;

            if let Some(error) = &result.error {
                errors.push(ReportError {
                    step: Some(step.step_number),
                    action_type: Some(step.kind),
                    info: error.clone(),
                });
            }
            if result.status == StepStatus::FailedFatal {
                warn!(%run_id, step = step.step_number, "fatal failure; halting run");
                halted = Some(SkipReason::FatalFailure);
            }
            step_results.push(result);

            let is_last = index + 1 == plan.steps.len();
            if halted.is_none() && !is_last && !self.config.inter_action_delay.is_zero() {
                tokio::time::sleep(self.config.inter_action_delay).await;
            }
        }

        // Scoped session: released on every exit path, fatal ones included.
        if let Err(err) = driver.close().await {
            warn!(%run_id, error = %err, "session release failed");
        }

        self.finalize(run_id, plan, started_at, step_results, skipped_steps, errors)
    }

    /// One pass of the step state machine: evidence → dispatch → evidence →
    /// verify → classify.
    async fn run_step(
        &self,
        step: &Step,
        dispatcher: &ActionDispatcher,
        verifier: &DefaultVerificationEngine,
        evidence: &EvidenceCollector,
        plan_deadline: Instant,
    ) -> StepResult {
        let step_started = Utc::now();
        info!(step = step.step_number, kind = %step.kind, description = %step.description, "step dispatching");

        let screenshot_before = evidence.capture(step.step_number, CapturePoint::Before).await;

        // Step budget, clamped against the remaining plan budget.
        let budget = self
            .config
            .step_timeout
            .min(plan_deadline.saturating_duration_since(Instant::now()));
        let ctx = DispatchCtx::new(Instant::now() + budget, self.config.keystroke_delay);

        let action_result = match tokio::time::timeout(
            budget + STEP_TIMEOUT_GRACE,
            dispatcher.execute(step, &ctx),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => ActionResult::failure(
                ActionData::Empty,
                ErrorInfo::new(
                    FailureKind::Timeout,
                    format!("step {} exceeded its budget", step.step_number),
                ),
            ),
        };

        let screenshot_after = evidence.capture(step.step_number, CapturePoint::After).await;

        // Verification always runs, even on action failure.
        let verification = verifier.verify(step, &action_result).await;

        let (status, error) = classify(&action_result, &verification);
        let screenshot_error = if status == StepStatus::Succeeded {
            None
        } else {
            evidence.capture(step.step_number, CapturePoint::Error).await
        };

        info!(
            step = step.step_number,
            status = ?status,
            action_ok = action_result.success,
            verified = verification.passed,
            "step complete"
        );

        StepResult {
            step: step.clone(),
            status,
            action_result,
            verification,
            screenshot_before,
            screenshot_after,
            screenshot_error,
            started_at: step_started,
            completed_at: Utc::now(),
            error,
        }
    }

    fn finalize(
        &self,
        run_id: Uuid,
        plan: &Plan,
        started_at: chrono::DateTime<Utc>,
        step_results: Vec<StepResult>,
        skipped_steps: Vec<SkippedStep>,
        errors: Vec<ReportError>,
    ) -> ExecutionReport {
        let steps_total = plan.steps.len();
        let steps_executed = step_results.len();
        let success = skipped_steps.is_empty()
            && errors.is_empty()
            && steps_executed == steps_total
            && step_results.iter().all(StepResult::succeeded);

        info!(
            %run_id,
            success,
            steps_executed,
            steps_total,
            errors = errors.len(),
            "run finalized"
        );

        ExecutionReport {
            run_id,
            plan: plan.clone(),
            started_at,
            completed_at: Utc::now(),
            success,
            steps_executed,
            steps_total,
            step_results,
            skipped_steps,
            errors,
        }
    }
}

/// Terminal status and recorded failure for one dispatched step.
///
/// Succeeded iff the action succeeded and verification passed. Failure
/// severity comes from the action's own classification; a pure
/// verification miss is always a recoverable mismatch.
fn classify(
    action: &ActionResult,
    verification: &verify_gate::VerificationResult,
) -> (StepStatus, Option<ErrorInfo>) {
    if action.success && verification.passed {
        return (StepStatus::Succeeded, None);
    }

    let error = match &action.error {
        Some(error) => error.clone(),
        None => {
            let failed: Vec<String> = verification
                .checks
                .iter()
                .filter(|check| !check.passed)
                .map(|check| check.detail.clone())
                .collect();
            ErrorInfo::new(FailureKind::VerificationMismatch, failed.join("; "))
        }
    };

    let status = match error.severity() {
        Severity::Recoverable => StepStatus::FailedRecoverable,
        Severity::Fatal => StepStatus::FailedFatal,
    };
    (status, Some(error))
}

fn skipped(step: &Step, reason: SkipReason) -> SkippedStep {
    SkippedStep {
        step_number: step.step_number,
        kind: step.kind,
        description: step.description.clone(),
        reason,
    }
}
