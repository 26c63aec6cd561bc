//! Action result types and dispatch context

use crate::errors::ErrorInfo;
use driver_port::ControlKind;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Outcome of performing one step's action, independent of verification.
///
/// Produced exactly once per dispatched step and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    /// Whether the action itself succeeded
    pub success: bool,

    /// Action-specific payload
    pub data: ActionData,

    /// Classified failure, when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl ActionResult {
    pub fn success(data: ActionData) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    pub fn failure(data: ActionData, error: ErrorInfo) -> Self {
        Self {
            success: false,
            data,
            error: Some(error),
        }
    }
}

/// Per-kind action payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionData {
    Navigate {
        final_url: String,
        status: Option<u16>,
    },
    Click {
        matched: String,
        url_before: String,
        url_after: String,
        navigated: bool,
    },
    /// Best-effort fill: one entry per targeted field, in fill order
    FillForm {
        fields: Vec<FieldFill>,
        filled: usize,
        total: usize,
    },
    Submit {
        mode: SubmitMode,
        url_after: String,
    },
    Wait {
        waited_ms: Option<u64>,
        condition_met: Option<bool>,
    },
    Verify,
    TypeText {
        matched: String,
        chars_typed: usize,
    },
    Screenshot {
        label: Option<String>,
    },
    /// Action failed before producing a payload
    Empty,
}

/// Result of filling a single form field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldFill {
    /// Field name as given in the plan
    pub name: String,

    /// Control classification, when the field was resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<ControlKind>,

    pub outcome: FieldOutcome,
}

impl FieldFill {
    pub fn filled(name: impl Into<String>, control: ControlKind) -> Self {
        Self {
            name: name.into(),
            control: Some(control),
            outcome: FieldOutcome::Filled,
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            control: None,
            outcome: FieldOutcome::NotFound,
        }
    }

    pub fn failed(name: impl Into<String>, control: ControlKind, message: String) -> Self {
        Self {
            name: name.into(),
            control: Some(control),
            outcome: FieldOutcome::Failed { message },
        }
    }

    pub fn is_filled(&self) -> bool {
        matches!(self.outcome, FieldOutcome::Filled)
    }
}

/// Per-field outcome of a best-effort fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum FieldOutcome {
    Filled,
    NotFound,
    Failed { message: String },
}

/// How a form submission completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitMode {
    /// Submission caused a navigation
    Navigated,

    /// In-page (asynchronous) submission; the URL did not change
    InPage,
}

/// Per-dispatch execution context.
///
/// Carries the step's deadline (already clamped against the global plan
/// budget) and the configured keystroke delay. Cancellation is observed at
/// step boundaries by the executor, never mid-action, so no token travels
/// here.
#[derive(Debug, Clone)]
pub struct DispatchCtx {
    /// Deadline for this step's browser work
    pub deadline: Instant,

    /// Delay between discrete keystrokes for type_text
    pub keystroke_delay: Duration,
}

impl DispatchCtx {
    pub fn new(deadline: Instant, keystroke_delay: Duration) -> Self {
        Self {
            deadline,
            keystroke_delay,
        }
    }

    /// Remaining budget until the deadline.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// True when the budget is exhausted.
    pub fn is_timeout(&self) -> bool {
        self.remaining().is_zero()
    }
}
