//! Character-by-character text entry handler

use crate::errors::{ErrorInfo, FailureKind};
use crate::types::{ActionData, ActionResult, DispatchCtx};
use driver_port::{BrowserDriver, WaitFor};
use element_resolver::ElementResolver;
use plan_core::Step;
use tracing::{debug, info};

/// Type into a single field one character at a time.
///
/// Each keystroke sets the grown prefix through the driver, producing one
/// discrete input event per character for frameworks that ignore bulk
/// value writes; the configured delay separates keystrokes. Running out of
/// step budget mid-text is a recoverable `Timeout` with the typed count
/// recorded.
pub(crate) async fn execute_type_text(
    driver: &dyn BrowserDriver,
    resolver: &dyn ElementResolver,
    step: &Step,
    ctx: &DispatchCtx,
) -> ActionResult {
    let text = step.target.text.clone().unwrap_or_default();

    let resolved = match resolver
        .resolve(&plan_core::TargetSpec::selector(
            step.target.selector.clone().unwrap_or_default(),
        ))
        .await
    {
        Ok(Some(resolved)) => resolved,
        Ok(None) => {
            return ActionResult::failure(
                ActionData::Empty,
                ErrorInfo::new(
                    FailureKind::ElementNotFound,
                    format!(
                        "no element matched type_text target of step {}",
                        step.step_number
                    ),
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
                    format!("field '{}' not interactable", resolved.matched),
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

    // Clear before typing.
    if let Err(err) = driver.set_value(&resolved.handle, "").await {
        return ActionResult::failure(
            ActionData::Empty,
            ErrorInfo::from_driver(err, FailureKind::ElementNotFound),
        );
    }

    let mut typed = 0usize;
    let mut upto = 0usize;
    for ch in text.chars() {
        if ctx.is_timeout() {
            return ActionResult::failure(
                ActionData::TypeText {
                    matched: resolved.matched,
                    chars_typed: typed,
                },
                ErrorInfo::new(
                    FailureKind::Timeout,
                    format!("step budget exhausted after {typed} keystrokes"),
                ),
            );
        }

        upto += ch.len_utf8();
        if let Err(err) = driver.set_value(&resolved.handle, &text[..upto]).await {
            return ActionResult::failure(
                ActionData::TypeText {
                    matched: resolved.matched,
                    chars_typed: typed,
                },
                ErrorInfo::from_driver(err, FailureKind::ElementNotFound),
            );
        }
        typed += 1;
        debug!(typed, "keystroke applied");

        if !ctx.keystroke_delay.is_zero() {
            tokio::time::sleep(ctx.keystroke_delay).await;
        }
    }

    info!(step = step.step_number, matched = %resolved.matched, typed, "text typed");
    ActionResult::success(ActionData::TypeText {
        matched: resolved.matched,
        chars_typed: typed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use driver_port::{ElementFixture, PageFixture, ReadScope, ScriptedDriver, ScriptedSite};
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

    #[tokio::test]
    async fn types_the_full_text_through_discrete_events() {
        let page = PageFixture::new("https://app.test")
            .with_element(ElementFixture::input("q").with_id("search"));
        let driver = Arc::new(ScriptedDriver::new(ScriptedSite::new(vec![page])));
        driver.navigate("https://app.test").await.unwrap();
        let resolver = DefaultElementResolver::new(driver.clone());

        let step = Step::new(1, ActionKind::TypeText)
            .with_target(TargetSpec::selector("#search").with_text("héllo"));
        let result = execute_type_text(driver.as_ref(), &resolver, &step, &ctx()).await;

        assert!(result.success);
        match result.data {
            ActionData::TypeText { chars_typed, .. } => assert_eq!(chars_typed, 5),
            other => panic!("unexpected payload: {other:?}"),
        }

        let handle = driver
            .find_element(driver_port::FindStrategy::Selector, "#search")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            driver.read_text(ReadScope::Element(&handle)).await.unwrap(),
            "héllo"
        );
    }

    #[tokio::test]
    async fn missing_field_is_element_not_found() {
        let driver = Arc::new(ScriptedDriver::new(ScriptedSite::new(vec![
            PageFixture::new("https://app.test"),
        ])));
        driver.navigate("https://app.test").await.unwrap();
        let resolver = DefaultElementResolver::new(driver.clone());

        let step = Step::new(1, ActionKind::TypeText)
            .with_target(TargetSpec::selector("#ghost").with_text("x"));
        let result = execute_type_text(driver.as_ref(), &resolver, &step, &ctx()).await;
        assert!(!result.success);
        assert_eq!(result.error.unwrap().kind, FailureKind::ElementNotFound);
    }
}
