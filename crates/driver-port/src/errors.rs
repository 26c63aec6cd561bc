//! Error types for the driver boundary

use thiserror::Error;

/// Failures reported by a browser driver.
#[derive(Debug, Error, Clone)]
pub enum DriverError {
    /// Navigation could not reach a terminal state
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// Driver-side operation exceeded its deadline
    #[error("driver operation timed out: {0}")]
    Timeout(String),

    /// The browser session is gone; nothing further can run
    #[error("browser session lost: {0}")]
    SessionLost(String),

    /// Protocol-level failure (stale handle, malformed response)
    #[error("driver protocol error: {0}")]
    Protocol(String),
}

impl DriverError {
    /// Session loss is the only driver failure the run cannot survive.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DriverError::SessionLost(_))
    }
}
