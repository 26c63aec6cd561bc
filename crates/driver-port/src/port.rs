//! Driver capability traits

use crate::errors::DriverError;
use crate::types::{ElementHandle, FindStrategy, NavigationOutcome, ReadScope, WaitFor};
use async_trait::async_trait;
use std::time::Duration;

/// Fixed capability surface the engine drives a browser through.
///
/// Contract notes:
/// - `find_element` returns the FIRST matching element in document order when
///   a strategy matches more than one node; ambiguity is resolved
///   deterministically, never reported as an error.
/// - `click` brings the element into view before dispatching the event.
/// - `set_value` applies the kind-appropriate operation: clear-then-set for
///   text controls, select-by-value for selects, checked-state ("true" /
///   "false") for checkboxes and radios.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigate to a URL and wait for a terminal navigation state.
    async fn navigate(&self, url: &str) -> Result<NavigationOutcome, DriverError>;

    /// Find at most one element; `Ok(None)` means not found.
    async fn find_element(
        &self,
        strategy: FindStrategy,
        value: &str,
    ) -> Result<Option<ElementHandle>, DriverError>;

    /// Click a previously resolved element.
    async fn click(&self, handle: &ElementHandle) -> Result<(), DriverError>;

    /// Set an element's value, kind-appropriately.
    async fn set_value(&self, handle: &ElementHandle, value: &str) -> Result<(), DriverError>;

    /// Read rendered text for the given scope.
    async fn read_text(&self, scope: ReadScope<'_>) -> Result<String, DriverError>;

    /// URL the browser is currently on.
    async fn current_url(&self) -> Result<String, DriverError>;

    /// Wait until the condition holds or the timeout elapses.
    ///
    /// `Ok(false)` means the condition was not met in time.
    async fn wait_for(&self, condition: &WaitFor, timeout: Duration) -> Result<bool, DriverError>;

    /// Capture a screenshot of the current viewport.
    async fn screenshot(&self) -> Result<Vec<u8>, DriverError>;

    /// Release the session. Further calls fail with `SessionLost`.
    async fn close(&self) -> Result<(), DriverError>;
}

/// Source of exclusively-owned browser sessions.
///
/// The executor acquires one session per `execute(plan)` call and closes it
/// on every exit path, including fatal failure and cancellation.
#[async_trait]
pub trait DriverSessionFactory: Send + Sync {
    /// Acquire a fresh session.
    async fn acquire(&self) -> Result<Box<dyn BrowserDriver>, DriverError>;
}
