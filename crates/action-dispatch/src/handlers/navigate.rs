//! Navigate handler

use crate::errors::{ErrorInfo, FailureKind};
use crate::types::{ActionData, ActionResult};
use driver_port::BrowserDriver;
use plan_core::Step;
use tracing::{info, warn};

/// Navigate to the step's target URL.
///
/// Success requires a terminal navigation state and, when the driver reports
/// one, a non-error HTTP status. An error status is a recoverable
/// `NavigationFailure`; the resulting URL and status land in the payload
/// either way.
pub(crate) async fn execute_navigate(driver: &dyn BrowserDriver, step: &Step) -> ActionResult {
    let Some(url) = step.target.url.as_deref() else {
        return ActionResult::failure(
            ActionData::Empty,
            ErrorInfo::new(FailureKind::Schema, "navigate step without target.url"),
        );
    };

    if !url.starts_with("http://") && !url.starts_with("https://") && !url.starts_with("file://") {
        return ActionResult::failure(
            ActionData::Empty,
            ErrorInfo::new(
                FailureKind::NavigationFailure,
                format!("unsupported URL scheme: {url}"),
            ),
        );
    }

    info!(step = step.step_number, url, "navigating");
    match driver.navigate(url).await {
        Ok(outcome) => {
            let data = ActionData::Navigate {
                final_url: outcome.final_url.clone(),
                status: outcome.status,
            };
            if outcome.is_error_status() {
                warn!(
                    step = step.step_number,
                    status = ?outcome.status,
                    "navigation reached an error page"
                );
                ActionResult::failure(
                    data,
                    ErrorInfo::new(
                        FailureKind::NavigationFailure,
                        format!("HTTP error status {:?} for {url}", outcome.status),
                    ),
                )
            } else {
                ActionResult::success(data)
            }
        }
        Err(err) => {
            // A navigation that takes the whole session down is not a page
            // we can back out of.
            let error = match err {
                driver_port::DriverError::SessionLost(detail) => ErrorInfo::new(
                    FailureKind::NavigationUnrecoverable,
                    format!("session lost during navigation: {detail}"),
                ),
                other => ErrorInfo::from_driver(other, FailureKind::NavigationFailure),
            };
            ActionResult::failure(ActionData::Empty, error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driver_port::{PageFixture, ScriptedDriver, ScriptedSite};
    use plan_core::{ActionKind, TargetSpec};

    fn step(url: &str) -> Step {
        Step::new(1, ActionKind::Navigate).with_target(TargetSpec::url(url))
    }

    #[tokio::test]
    async fn successful_navigation_records_url_and_status() {
        let driver = ScriptedDriver::new(ScriptedSite::new(vec![PageFixture::new(
            "https://app.test",
        )]));
        let result = execute_navigate(&driver, &step("https://app.test")).await;
        assert!(result.success);
        match result.data {
            ActionData::Navigate { final_url, status } => {
                assert_eq!(final_url, "https://app.test");
                assert_eq!(status, Some(200));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_500_is_a_recoverable_navigation_failure() {
        let driver = ScriptedDriver::new(ScriptedSite::new(vec![
            PageFixture::new("https://app.test/broken").with_status(500),
        ]));
        let result = execute_navigate(&driver, &step("https://app.test/broken")).await;
        assert!(!result.success);
        let error = result.error.unwrap();
        assert_eq!(error.kind, FailureKind::NavigationFailure);
        assert_eq!(error.severity(), crate::Severity::Recoverable);
        assert!(matches!(
            result.data,
            ActionData::Navigate {
                status: Some(500),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn unroutable_url_is_a_navigation_failure() {
        let driver = ScriptedDriver::new(ScriptedSite::default());
        let result = execute_navigate(&driver, &step("https://nowhere.test")).await;
        assert!(!result.success);
        assert_eq!(result.error.unwrap().kind, FailureKind::NavigationFailure);
    }

    #[tokio::test]
    async fn bad_scheme_fails_without_touching_the_driver() {
        let driver = ScriptedDriver::new(ScriptedSite::default());
        let result = execute_navigate(&driver, &step("ftp://files.test")).await;
        assert!(!result.success);
        assert_eq!(result.error.unwrap().kind, FailureKind::NavigationFailure);
    }

    #[tokio::test]
    async fn session_loss_during_navigation_is_unrecoverable() {
        let driver = ScriptedDriver::new(ScriptedSite::new(vec![
            PageFixture::new("https://app.test/crash").crashes_session(),
        ]));
        let result = execute_navigate(&driver, &step("https://app.test/crash")).await;
        assert!(!result.success);
        let error = result.error.unwrap();
        assert_eq!(error.kind, FailureKind::NavigationUnrecoverable);
        assert_eq!(error.severity(), crate::Severity::Fatal);
    }
}
