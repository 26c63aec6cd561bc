//! Click handler

use crate::errors::{ErrorInfo, FailureKind};
use crate::types::{ActionData, ActionResult, DispatchCtx};
use driver_port::{BrowserDriver, WaitFor};
use element_resolver::ElementResolver;
use plan_core::Step;
use tracing::{debug, info};

/// Resolve the target, wait until it is interactable, then click.
///
/// Resolution failure is a recoverable `ElementNotFound`; an element that
/// never becomes interactable within the step budget is a `Timeout`.
pub(crate) async fn execute_click(
    driver: &dyn BrowserDriver,
    resolver: &dyn ElementResolver,
    step: &Step,
    ctx: &DispatchCtx,
) -> ActionResult {
    let resolved = match resolver.resolve(&step.target).await {
        Ok(Some(resolved)) => resolved,
        Ok(None) => {
            return ActionResult::failure(
                ActionData::Empty,
                ErrorInfo::new(
                    FailureKind::ElementNotFound,
                    format!("no element matched click target of step {}", step.step_number),
                ),
            )
        }
        Err(err) => return ActionResult::failure(ActionData::Empty, resolve_error(err)),
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

    debug!(step = step.step_number, matched = %resolved.matched, "waiting for interactability");
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
                    format!("element '{}' did not become interactable", resolved.matched),
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

    let url_after = match driver.current_url().await {
        Ok(url) => url,
        Err(err) => {
            return ActionResult::failure(
                ActionData::Empty,
                ErrorInfo::from_driver(err, FailureKind::ElementNotFound),
            )
        }
    };

    let navigated = url_after != url_before;
    info!(step = step.step_number, matched = %resolved.matched, navigated, "clicked");
    ActionResult::success(ActionData::Click {
        matched: resolved.matched,
        url_before,
        url_after,
        navigated,
    })
}

fn resolve_error(err: element_resolver::ResolveError) -> ErrorInfo {
    let element_resolver::ResolveError::Driver(driver_err) = err;
    ErrorInfo::from_driver(driver_err, FailureKind::ElementNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use driver_port::{ElementFixture, PageFixture, ScriptedDriver, ScriptedSite};
    use element_resolver::DefaultElementResolver;
    use plan_core::{ActionKind, TargetSpec};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn ctx() -> DispatchCtx {
        DispatchCtx::new(
            Instant::now() + Duration::from_secs(5),
            Duration::from_millis(0),
        )
    }

    async fn setup(page: PageFixture) -> (Arc<ScriptedDriver>, DefaultElementResolver) {
        let url = page.url.clone();
        let driver = Arc::new(ScriptedDriver::new(ScriptedSite::new(vec![page])));
        driver.navigate(&url).await.unwrap();
        let resolver = DefaultElementResolver::new(driver.clone());
        (driver, resolver)
    }

    #[tokio::test]
    async fn clicking_a_link_records_the_navigation() {
        let page = PageFixture::new("https://app.test")
            .with_element(ElementFixture::button("Open settings").goto_on_click("https://app.test"));
        let (driver, resolver) = setup(page).await;

        let step = Step::new(1, ActionKind::Click).with_target(TargetSpec::text("Open settings"));
        let result = execute_click(driver.as_ref(), &resolver, &step, &ctx()).await;
        assert!(result.success);
        match result.data {
            ActionData::Click {
                navigated, matched, ..
            } => {
                assert!(!navigated); // same URL round trip
                assert_eq!(matched, "Open settings");
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_element_is_element_not_found() {
        let (driver, resolver) = setup(PageFixture::new("https://app.test")).await;
        let step = Step::new(1, ActionKind::Click).with_target(TargetSpec::text("Ghost"));
        let result = execute_click(driver.as_ref(), &resolver, &step, &ctx()).await;
        assert!(!result.success);
        assert_eq!(result.error.unwrap().kind, FailureKind::ElementNotFound);
    }

    #[tokio::test]
    async fn disabled_element_times_out_waiting_for_interactability() {
        let page = PageFixture::new("https://app.test")
            .with_element(ElementFixture::button("Save").disabled());
        let (driver, resolver) = setup(page).await;

        let step = Step::new(1, ActionKind::Click).with_target(TargetSpec::text("Save"));
        let result = execute_click(driver.as_ref(), &resolver, &step, &ctx()).await;
        assert!(!result.success);
        assert_eq!(result.error.unwrap().kind, FailureKind::Timeout);
    }
}
