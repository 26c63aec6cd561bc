//! Engine failure taxonomy
//!
//! Every recorded failure carries exactly one [`FailureKind`]; the kind
//! alone decides whether the run continues or halts.

use driver_port::DriverError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure classification shared by action results, verification and the
/// execution report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Plan violated the schema; raised before any browser interaction
    Schema,

    /// Target element could not be resolved
    ElementNotFound,

    /// An operation exceeded its step or plan budget
    Timeout,

    /// Navigation did not reach a usable page
    NavigationFailure,

    /// Navigation left the session in an unrecoverable state
    NavigationUnrecoverable,

    /// Expected outcome did not hold after the action
    VerificationMismatch,

    /// The browser session is gone
    SessionLoss,

    /// External cancellation observed at a step boundary
    Cancelled,
}

impl FailureKind {
    /// Severity drives the continue/abort decision.
    pub fn severity(&self) -> Severity {
        match self {
            FailureKind::ElementNotFound
            | FailureKind::Timeout
            | FailureKind::NavigationFailure
            | FailureKind::VerificationMismatch => Severity::Recoverable,
            FailureKind::Schema
            | FailureKind::NavigationUnrecoverable
            | FailureKind::SessionLoss
            | FailureKind::Cancelled => Severity::Fatal,
        }
    }

    /// Stable taxonomy tag for reports
    pub fn tag(&self) -> &'static str {
        match self {
            FailureKind::Schema => "schema_error",
            FailureKind::ElementNotFound => "element_not_found",
            FailureKind::Timeout => "timeout",
            FailureKind::NavigationFailure => "navigation_failure",
            FailureKind::NavigationUnrecoverable => "navigation_unrecoverable",
            FailureKind::VerificationMismatch => "verification_mismatch",
            FailureKind::SessionLoss => "session_loss",
            FailureKind::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Failure severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Recorded; the run continues with the next step
    Recoverable,

    /// The run halts and remaining steps are skipped
    Fatal,
}

/// One recorded failure.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct ErrorInfo {
    pub kind: FailureKind,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Classify a driver failure; `fallback` covers protocol-level errors
    /// whose meaning depends on what the caller was doing.
    pub fn from_driver(err: DriverError, fallback: FailureKind) -> Self {
        let kind = match &err {
            DriverError::Timeout(_) => FailureKind::Timeout,
            DriverError::SessionLost(_) => FailureKind::SessionLoss,
            DriverError::Navigation(_) => FailureKind::NavigationFailure,
            DriverError::Protocol(_) => fallback,
        };
        Self::new(kind, err.to_string())
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_split_matches_the_taxonomy() {
        assert_eq!(
            FailureKind::ElementNotFound.severity(),
            Severity::Recoverable
        );
        assert_eq!(FailureKind::Timeout.severity(), Severity::Recoverable);
        assert_eq!(
            FailureKind::NavigationFailure.severity(),
            Severity::Recoverable
        );
        assert_eq!(
            FailureKind::VerificationMismatch.severity(),
            Severity::Recoverable
        );
        assert_eq!(FailureKind::Schema.severity(), Severity::Fatal);
        assert_eq!(FailureKind::SessionLoss.severity(), Severity::Fatal);
        assert_eq!(FailureKind::Cancelled.severity(), Severity::Fatal);
        assert_eq!(
            FailureKind::NavigationUnrecoverable.severity(),
            Severity::Fatal
        );
    }

    #[test]
    fn driver_errors_map_onto_the_taxonomy() {
        let err = ErrorInfo::from_driver(
            DriverError::Timeout("wait".into()),
            FailureKind::ElementNotFound,
        );
        assert_eq!(err.kind, FailureKind::Timeout);

        let err = ErrorInfo::from_driver(
            DriverError::Protocol("stale".into()),
            FailureKind::ElementNotFound,
        );
        assert_eq!(err.kind, FailureKind::ElementNotFound);

        let err = ErrorInfo::from_driver(
            DriverError::SessionLost("gone".into()),
            FailureKind::ElementNotFound,
        );
        assert_eq!(err.severity(), Severity::Fatal);
    }
}
