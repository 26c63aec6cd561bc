//! Submit handler

use crate::errors::{ErrorInfo, FailureKind};
use crate::handlers::DEFAULT_SUBMIT_SELECTOR;
use crate::types::{ActionData, ActionResult, DispatchCtx, SubmitMode};
use driver_port::{BrowserDriver, WaitFor};
use element_resolver::ElementResolver;
use plan_core::{Step, TargetSpec};
use tracing::{debug, info};

/// Trigger form submission through the submit control.
///
/// Uses the step's own target when it names a control, otherwise the
/// default submit selector. Distinguishes a submission that navigates from
/// an in-page (asynchronous) one by watching for a URL change within the
/// step budget.
pub(crate) async fn execute_submit(
    driver: &dyn BrowserDriver,
    resolver: &dyn ElementResolver,
    step: &Step,
    ctx: &DispatchCtx,
) -> ActionResult {
    let target = if step.target.selector.is_some() || step.target.text.is_some() {
        step.target.clone()
    } else {
        TargetSpec::selector(DEFAULT_SUBMIT_SELECTOR)
    };

    let resolved = match resolver.resolve(&target).await {
        Ok(Some(resolved)) => resolved,
        Ok(None) => {
            return ActionResult::failure(
                ActionData::Empty,
                ErrorInfo::new(
                    FailureKind::ElementNotFound,
                    "no submit control could be resolved",
                ),
            )
        }
        Err(err) => {
            let element_resolver::ResolveError::Driver(driver_err) = err;
            return ActionResult::failure(
                ActionData::Empty,
                ErrorInfo::from_driver(driver_err, FailureKind::ElementNotFound),
            );
        }
    };

    let url_before = match driver.current_url().await {
        Ok(url) => url,
        Err(err) => {
            return ActionResult::failure(
                ActionData::Empty,
                ErrorInfo::from_driver(err, FailureKind::ElementNotFound),
            )
        }
    };

    match driver
        .wait_for(
            &WaitFor::ElementInteractable(resolved.handle.clone()),
            ctx.remaining(),
        )
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return ActionResult::failure(
                ActionData::Empty,
                ErrorInfo::new(
                    FailureKind::Timeout,
                    format!("submit control '{}' not interactable", resolved.matched),
                ),
            )
        }
        Err(err) => {
            return ActionResult::failure(
                ActionData::Empty,
                ErrorInfo::from_driver(err, FailureKind::ElementNotFound),
            )
        }
    }

    if let Err(err) = driver.click(&resolved.handle).await {
        return ActionResult::failure(
            ActionData::Empty,
            ErrorInfo::from_driver(err, FailureKind::ElementNotFound),
        );
    }

    // A submission that does not navigate within the budget is an in-page
    // (asynchronous) one, not a failure.
    debug!(step = step.step_number, "watching for post-submit navigation");
    let navigated = match driver
        .wait_for(&WaitFor::UrlChangedFrom(url_before.clone()), ctx.remaining())
        .await
    {
        Ok(changed) => changed,
        Err(err) => {
            return ActionResult::failure(
                ActionData::Empty,
                ErrorInfo::from_driver(err, FailureKind::NavigationFailure),
            )
        }
    };

    let url_after = match driver.current_url().await {
        Ok(url) => url,
        Err(err) => {
            return ActionResult::failure(
                ActionData::Empty,
                ErrorInfo::from_driver(err, FailureKind::NavigationFailure),
            )
        }
    };

    let mode = if navigated {
        SubmitMode::Navigated
    } else {
        SubmitMode::InPage
    };
    info!(step = step.step_number, ?mode, url_after = %url_after, "form submitted");
    ActionResult::success(ActionData::Submit { mode, url_after })
}
