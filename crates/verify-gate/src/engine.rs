//! Verification engine with per-kind check batteries

use crate::types::{Check, CheckKind, VerificationResult};
use action_dispatch::handlers::{is_truthy, value_to_string};
use action_dispatch::{ActionData, ActionResult};
use async_trait::async_trait;
use driver_port::{BrowserDriver, ControlKind, DriverError, ReadScope};
use element_resolver::ElementResolver;
use plan_core::{ActionKind, Step, TargetSpec};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Phrases whose presence in the page text downgrades an otherwise-passing
/// interaction step to failed.
const ERROR_INDICATORS: &[&str] = &["error", "invalid", "failed", "wrong"];

/// Verification engine contract.
#[async_trait]
pub trait VerificationEngine: Send + Sync {
    /// Run the battery for one step.
    ///
    /// Always produces a result, even when the action failed; the checks
    /// are diagnostic evidence either way.
    async fn verify(&self, step: &Step, action: &ActionResult) -> VerificationResult;
}

/// Default engine reading live page state through the driver.
pub struct DefaultVerificationEngine {
    driver: Arc<dyn BrowserDriver>,
    resolver: Arc<dyn ElementResolver>,
}

impl DefaultVerificationEngine {
    pub fn new(driver: Arc<dyn BrowserDriver>, resolver: Arc<dyn ElementResolver>) -> Self {
        Self { driver, resolver }
    }

    async fn page_text(&self) -> Result<String, DriverError> {
        self.driver.read_text(ReadScope::Page).await
    }

    /// URL match, prefix policy: scheme, host and port must be equal and the
    /// live path must extend the target path (trailing slashes ignored).
    /// This is the single documented policy; exact equality is just the
    /// degenerate prefix.
    fn url_check(&self, current: &str, target: &str) -> Check {
        let matched = match (Url::parse(current), Url::parse(target)) {
            (Ok(live), Ok(wanted)) => {
                live.scheme() == wanted.scheme()
                    && live.host_str() == wanted.host_str()
                    && live.port_or_known_default() == wanted.port_or_known_default()
                    && live
                        .path()
                        .trim_end_matches('/')
                        .starts_with(wanted.path().trim_end_matches('/'))
            }
            _ => current
                .trim_end_matches('/')
                .starts_with(target.trim_end_matches('/')),
        };
        Check::from_bool(
            CheckKind::UrlMatch,
            matched,
            format!("expected prefix '{target}', live '{current}'"),
        )
    }

    async fn current_url_check(&self, target_url: &str) -> Check {
        match self.driver.current_url().await {
            Ok(current) => self.url_check(&current, target_url),
            Err(err) => Check::fail(
                CheckKind::UrlMatch,
                format!("current URL unavailable: {err}"),
            ),
        }
    }

    fn status_check(action: &ActionResult) -> Option<Check> {
        match &action.data {
            ActionData::Navigate {
                status: Some(status),
                ..
            } => Some(Check::from_bool(
                CheckKind::HttpStatus,
                (200..400).contains(status),
                format!("HTTP status {status}"),
            )),
            _ => None,
        }
    }

    /// Case-insensitive substring search of expected-outcome keywords
    /// (length > 3) against the full rendered text.
    fn keyword_check(expected: &str, page_text: &Result<String, DriverError>) -> Option<Check> {
        let lowered = expected.to_lowercase();
        let keywords: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| word.len() > 3)
            .collect();
        if keywords.is_empty() {
            return None;
        }

        Some(match page_text {
            Ok(text) => {
                let haystack = text.to_lowercase();
                let found: Vec<&&str> = keywords
                    .iter()
                    .filter(|keyword| haystack.contains(**keyword))
                    .collect();
                Check::from_bool(
                    CheckKind::TextSearch,
                    !found.is_empty(),
                    format!("keywords {found:?} of expected outcome '{expected}' found"),
                )
            }
            Err(err) => Check::fail(CheckKind::TextSearch, format!("page text unavailable: {err}")),
        })
    }

    /// Literal substring search for a verify step's `target.text`.
    fn literal_text_check(text: &str, page_text: &Result<String, DriverError>) -> Check {
        match page_text {
            Ok(page) => Check::from_bool(
                CheckKind::TextSearch,
                page.to_lowercase().contains(&text.to_lowercase()),
                format!("literal text '{text}'"),
            ),
            Err(err) => Check::fail(CheckKind::TextSearch, format!("page text unavailable: {err}")),
        }
    }

    fn indicator_check(page_text: &Result<String, DriverError>) -> Check {
        match page_text {
            Ok(text) => {
                let haystack = text.to_lowercase();
                let found: Vec<&&str> = ERROR_INDICATORS
                    .iter()
                    .filter(|phrase| haystack.contains(**phrase))
                    .collect();
                if found.is_empty() {
                    Check::pass(CheckKind::ErrorIndicator, "no error indicators in page text")
                } else {
                    Check::fail(
                        CheckKind::ErrorIndicator,
                        format!("error indicators present: {found:?}"),
                    )
                }
            }
            Err(err) => Check::fail(
                CheckKind::ErrorIndicator,
                format!("page text unavailable: {err}"),
            ),
        }
    }

    async fn presence_check(&self, selector: &str) -> Check {
        match self.resolver.resolve(&TargetSpec::selector(selector)).await {
            Ok(Some(_)) => Check::pass(
                CheckKind::ElementPresence,
                format!("element '{selector}' present"),
            ),
            Ok(None) => Check::fail(
                CheckKind::ElementPresence,
                format!("element '{selector}' not found"),
            ),
            Err(err) => Check::fail(
                CheckKind::ElementPresence,
                format!("probe for '{selector}' failed: {err}"),
            ),
        }
    }

    /// Re-read each targeted field's live value and compare with what was
    /// set.
    async fn echo_checks(&self, step: &Step, checks: &mut Vec<Check>) {
        for (name, value) in &step.target.form_data {
            let check = match self.resolver.resolve_field(name).await {
                Ok(Some(resolved)) => {
                    let expected = match resolved.handle.control_kind() {
                        ControlKind::Checkbox | ControlKind::Radio => is_truthy(value).to_string(),
                        _ => value_to_string(value),
                    };
                    match self
                        .driver
                        .read_text(ReadScope::Element(&resolved.handle))
                        .await
                    {
                        Ok(live) => Check::from_bool(
                            CheckKind::FieldEcho,
                            live == expected,
                            format!("{name}: expected '{expected}', live '{live}'"),
                        ),
                        Err(err) => Check::fail(
                            CheckKind::FieldEcho,
                            format!("{name}: live value unavailable: {err}"),
                        ),
                    }
                }
                Ok(None) => Check::fail(
                    CheckKind::FieldEcho,
                    format!("{name}: field no longer resolvable"),
                ),
                Err(err) => Check::fail(CheckKind::FieldEcho, format!("{name}: {err}")),
            };
            checks.push(check);
        }
    }
}

#[async_trait]
impl VerificationEngine for DefaultVerificationEngine {
    async fn verify(&self, step: &Step, action: &ActionResult) -> VerificationResult {
        let mut checks: Vec<Check> = Vec::new();
        let page_text = self.page_text().await;
        if let Err(err) = &page_text {
            warn!(step = step.step_number, %err, "page text read failed during verification");
        }

        match step.kind {
            ActionKind::Navigate => {
                if let Some(target_url) = step.target.url.as_deref() {
                    checks.push(self.current_url_check(target_url).await);
                }
                if let Some(check) = Self::status_check(action) {
                    checks.push(check);
                }
            }
            ActionKind::Click => {
                checks.push(Self::indicator_check(&page_text));
            }
            ActionKind::FillForm | ActionKind::Submit => {
                self.echo_checks(step, &mut checks).await;
                checks.push(Self::indicator_check(&page_text));
            }
            ActionKind::Verify => {
                if let Some(selector) = step.target.selector.as_deref() {
                    checks.push(self.presence_check(selector).await);
                }
                if let Some(text) = step.target.text.as_deref() {
                    checks.push(Self::literal_text_check(text, &page_text));
                }
                if let Some(target_url) = step.target.url.as_deref() {
                    checks.push(self.current_url_check(target_url).await);
                }
            }
            ActionKind::Wait | ActionKind::TypeText | ActionKind::Screenshot => {}
        }

        // Generic expectation search applies to every kind that states one.
        if let Some(check) = Self::keyword_check(&step.expected_outcome, &page_text) {
            checks.push(check);
        }

        let result = VerificationResult::from_checks(checks);
        debug!(
            step = step.step_number,
            passed = result.passed,
            checks = result.checks.len(),
            "verification complete"
        );
        result
    }
}
