//! Step-to-handler dispatch

use crate::errors::{ErrorInfo, FailureKind};
use crate::handlers;
use crate::ports::EvidenceSink;
use crate::types::{ActionData, ActionResult, DispatchCtx};
use driver_port::BrowserDriver;
use element_resolver::ElementResolver;
use plan_core::{ActionKind, Step};
use std::sync::Arc;
use tracing::debug;

/// Maps a step's action kind to its handler.
///
/// The match below is exhaustive over [`ActionKind`]; adding an action is a
/// single point of change here plus its handler module.
pub struct ActionDispatcher {
    driver: Arc<dyn BrowserDriver>,
    resolver: Arc<dyn ElementResolver>,
    evidence: Arc<dyn EvidenceSink>,
}

impl ActionDispatcher {
    pub fn new(
        driver: Arc<dyn BrowserDriver>,
        resolver: Arc<dyn ElementResolver>,
        evidence: Arc<dyn EvidenceSink>,
    ) -> Self {
        Self {
            driver,
            resolver,
            evidence,
        }
    }

    /// Execute one step's action.
    ///
    /// Never panics and never returns an `Err`: failures are folded into
    /// the result. An exhausted budget fails before any browser work.
    pub async fn execute(&self, step: &Step, ctx: &DispatchCtx) -> ActionResult {
        if ctx.is_timeout() {
            return ActionResult::failure(
                ActionData::Empty,
                ErrorInfo::new(
                    FailureKind::Timeout,
                    format!("no budget left before step {}", step.step_number),
                ),
            );
        }

        debug!(step = step.step_number, kind = %step.kind, "dispatching");
        let driver = self.driver.as_ref();
        let resolver = self.resolver.as_ref();

        match step.kind {
            ActionKind::Navigate => handlers::navigate::execute_navigate(driver, step).await,
            ActionKind::Click => handlers::click::execute_click(driver, resolver, step, ctx).await,
            ActionKind::FillForm => {
                handlers::fill_form::execute_fill_form(driver, resolver, step).await
            }
            ActionKind::Submit => {
                handlers::submit::execute_submit(driver, resolver, step, ctx).await
            }
            ActionKind::Wait => handlers::wait::execute_wait(driver, step, ctx).await,
            // No side effects: the verification engine owns the checking.
            ActionKind::Verify => ActionResult::success(ActionData::Verify),
            ActionKind::TypeText => {
                handlers::type_text::execute_type_text(driver, resolver, step, ctx).await
            }
            ActionKind::Screenshot => {
                handlers::screenshot::execute_screenshot(self.evidence.as_ref(), step).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use driver_port::{DriverError, PageFixture, ScriptedDriver, ScriptedSite};
    use element_resolver::DefaultElementResolver;
    use std::time::{Duration, Instant};

    struct NullSink;

    #[async_trait]
    impl EvidenceSink for NullSink {
        async fn capture_requested(&self, step_number: u32) -> Result<String, DriverError> {
            Ok(format!("step_{step_number}_capture"))
        }
    }

    fn dispatcher_on(site: ScriptedSite) -> (ActionDispatcher, Arc<ScriptedDriver>) {
        let driver = Arc::new(ScriptedDriver::new(site));
        let resolver = Arc::new(DefaultElementResolver::new(driver.clone()));
        (
            ActionDispatcher::new(driver.clone(), resolver, Arc::new(NullSink)),
            driver,
        )
    }

    #[tokio::test]
    async fn verify_steps_are_a_no_op() {
        let (dispatcher, _driver) = dispatcher_on(ScriptedSite::default());
        let step = Step::new(1, ActionKind::Verify);
        let ctx = DispatchCtx::new(Instant::now() + Duration::from_secs(5), Duration::ZERO);
        let result = dispatcher.execute(&step, &ctx).await;
        assert!(result.success);
        assert!(matches!(result.data, ActionData::Verify));
    }

    #[tokio::test]
    async fn screenshot_steps_go_through_the_sink() {
        let (dispatcher, driver) = dispatcher_on(ScriptedSite::new(vec![PageFixture::new(
            "https://app.test",
        )]));
        driver.navigate("https://app.test").await.unwrap();
        let step = Step::new(3, ActionKind::Screenshot);
        let ctx = DispatchCtx::new(Instant::now() + Duration::from_secs(5), Duration::ZERO);
        let result = dispatcher.execute(&step, &ctx).await;
        assert!(result.success);
        assert!(matches!(
            result.data,
            ActionData::Screenshot { label: Some(ref label) } if label == "step_3_capture"
        ));
    }

    #[tokio::test]
    async fn exhausted_budget_fails_before_browser_work() {
        let (dispatcher, _driver) = dispatcher_on(ScriptedSite::default());
        let step = Step::new(1, ActionKind::Navigate)
            .with_target(plan_core::TargetSpec::url("https://app.test"));
        let ctx = DispatchCtx::new(Instant::now() - Duration::from_secs(1), Duration::ZERO);
        let result = dispatcher.execute(&step, &ctx).await;
        assert!(!result.success);
        assert_eq!(result.error.unwrap().kind, FailureKind::Timeout);
    }
}
