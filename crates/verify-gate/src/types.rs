//! Verification result types

use serde::{Deserialize, Serialize};

/// Outcome of checking a step's expected state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Conjunction of every applicable check
    pub passed: bool,

    /// Individual checks, in evaluation order
    pub checks: Vec<Check>,
}

impl VerificationResult {
    /// Build from the evaluated checks.
    ///
    /// A step with zero applicable checks passes by default, with a warning
    /// check recorded so the report still shows that no assertion was made.
    pub fn from_checks(checks: Vec<Check>) -> Self {
        if checks.is_empty() {
            return Self {
                passed: true,
                checks: vec![Check::warn(
                    CheckKind::Unverifiable,
                    "no applicable checks for this step; passing by default",
                )],
            };
        }
        let passed = checks.iter().all(|check| check.passed);
        Self { passed, checks }
    }
}

/// One recorded check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Check {
    #[serde(rename = "type")]
    pub kind: CheckKind,
    pub passed: bool,
    pub detail: String,
}

impl Check {
    pub fn pass(kind: CheckKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            passed: true,
            detail: detail.into(),
        }
    }

    pub fn fail(kind: CheckKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            passed: false,
            detail: detail.into(),
        }
    }

    /// A passing check that flags a gap rather than an assertion.
    pub fn warn(kind: CheckKind, detail: impl Into<String>) -> Self {
        Self::pass(kind, detail)
    }

    pub fn from_bool(kind: CheckKind, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            kind,
            passed,
            detail: detail.into(),
        }
    }
}

/// Check classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Current URL against the target URL (prefix policy)
    UrlMatch,

    /// HTTP status of the navigation
    HttpStatus,

    /// Probe selector resolves on the live page
    ElementPresence,

    /// No known error-indicator phrase in the page text
    ErrorIndicator,

    /// Expected-outcome keywords in the rendered page text
    TextSearch,

    /// Targeted form fields echo back the values that were set
    FieldEcho,

    /// Nothing applicable; step passed by default
    Unverifiable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_battery_passes_with_a_warning() {
        let result = VerificationResult::from_checks(Vec::new());
        assert!(result.passed);
        assert_eq!(result.checks.len(), 1);
        assert_eq!(result.checks[0].kind, CheckKind::Unverifiable);
        assert!(result.checks[0].passed);
    }

    #[test]
    fn one_failing_check_fails_the_conjunction() {
        let result = VerificationResult::from_checks(vec![
            Check::pass(CheckKind::UrlMatch, "ok"),
            Check::fail(CheckKind::TextSearch, "keywords missing"),
        ]);
        assert!(!result.passed);
        assert_eq!(result.checks.len(), 2);
    }
}
