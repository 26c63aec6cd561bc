//! Wait handler

use crate::errors::{ErrorInfo, FailureKind};
use crate::types::{ActionData, ActionResult, DispatchCtx};
use driver_port::{BrowserDriver, WaitFor};
use plan_core::Step;
use std::time::Duration;
use tracing::debug;

/// Sleep for a fixed duration or poll an element condition.
///
/// Expiry of the poll, or a fixed wait that cannot fit in the remaining
/// step budget, is a recoverable `Timeout`; a wait never fails fatally.
pub(crate) async fn execute_wait(
    driver: &dyn BrowserDriver,
    step: &Step,
    ctx: &DispatchCtx,
) -> ActionResult {
    let target = &step.target;

    if let (Some(condition), Some(selector)) = (target.condition, target.selector.as_deref()) {
        debug!(step = step.step_number, selector, %condition, "waiting for element state");
        let wait = WaitFor::ElementState {
            selector: selector.to_string(),
            state: condition,
        };
        return match driver.wait_for(&wait, ctx.remaining()).await {
            Ok(true) => ActionResult::success(ActionData::Wait {
                waited_ms: None,
                condition_met: Some(true),
            }),
            Ok(false) => ActionResult::failure(
                ActionData::Wait {
                    waited_ms: None,
                    condition_met: Some(false),
                },
                ErrorInfo::new(
                    FailureKind::Timeout,
                    format!("element '{selector}' did not become {condition}"),
                ),
            ),
            Err(err) => ActionResult::failure(
                ActionData::Empty,
                ErrorInfo::from_driver(err, FailureKind::Timeout),
            ),
        };
    }

    let wait_ms = target.wait_ms.unwrap_or(0);
    let requested = Duration::from_millis(wait_ms);
    let budget = ctx.remaining();

    if requested > budget {
        tokio::time::sleep(budget).await;
        return ActionResult::failure(
            ActionData::Wait {
                waited_ms: Some(budget.as_millis() as u64),
                condition_met: None,
            },
            ErrorInfo::new(
                FailureKind::Timeout,
                format!("wait of {wait_ms}ms exceeds the remaining step budget"),
            ),
        );
    }

    debug!(step = step.step_number, wait_ms, "sleeping");
    tokio::time::sleep(requested).await;
    ActionResult::success(ActionData::Wait {
        waited_ms: Some(wait_ms),
        condition_met: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use driver_port::{ElementFixture, PageFixture, ScriptedDriver, ScriptedSite};
    use plan_core::{ActionKind, ElementState, TargetSpec};
    use std::time::Instant;

    fn ctx_with_budget(budget: Duration) -> DispatchCtx {
        DispatchCtx::new(Instant::now() + budget, Duration::from_millis(0))
    }

    async fn driver_on(page: PageFixture) -> ScriptedDriver {
        let url = page.url.clone();
        let driver = ScriptedDriver::new(ScriptedSite::new(vec![page]));
        driver.navigate(&url).await.unwrap();
        driver
    }

    #[tokio::test]
    async fn fixed_wait_succeeds_within_budget() {
        let driver = driver_on(PageFixture::new("https://app.test")).await;
        let step = Step::new(1, ActionKind::Wait)
            .with_target(TargetSpec::default().with_wait_ms(10));
        let result = execute_wait(&driver, &step, &ctx_with_budget(Duration::from_secs(5))).await;
        assert!(result.success);
        assert!(matches!(
            result.data,
            ActionData::Wait {
                waited_ms: Some(10),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn oversized_wait_is_a_recoverable_timeout() {
        let driver = driver_on(PageFixture::new("https://app.test")).await;
        let step = Step::new(1, ActionKind::Wait)
            .with_target(TargetSpec::default().with_wait_ms(60_000));
        let result =
            execute_wait(&driver, &step, &ctx_with_budget(Duration::from_millis(20))).await;
        assert!(!result.success);
        let error = result.error.unwrap();
        assert_eq!(error.kind, FailureKind::Timeout);
        assert_eq!(error.severity(), crate::Severity::Recoverable);
    }

    #[tokio::test]
    async fn condition_wait_reports_met_and_unmet() {
        let page = PageFixture::new("https://app.test")
            .with_element(ElementFixture::default().with_selector("#spinner").hidden());
        let driver = driver_on(page).await;

        let mut target = TargetSpec::selector("#spinner");
        target.condition = Some(ElementState::Hidden);
        let step = Step::new(1, ActionKind::Wait).with_target(target);
        let result = execute_wait(&driver, &step, &ctx_with_budget(Duration::from_secs(5))).await;
        assert!(result.success);

        let mut target = TargetSpec::selector("#spinner");
        target.condition = Some(ElementState::Visible);
        let step = Step::new(1, ActionKind::Wait).with_target(target);
        let result = execute_wait(&driver, &step, &ctx_with_budget(Duration::from_secs(5))).await;
        assert!(!result.success);
        assert_eq!(result.error.unwrap().kind, FailureKind::Timeout);
    }
}
