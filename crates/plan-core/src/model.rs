//! Core plan types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered mapping of form field name to value.
///
/// Iteration order is the plan's insertion order, which is also the fill
/// order during execution.
pub type FormData = serde_json::Map<String, Value>;

/// A validated, machine-generated action plan.
///
/// Immutable once handed to the engine; the executor borrows it for the
/// lifetime of a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Natural-language description of the overall task
    pub task_description: String,

    /// Conditions assumed to hold before the first step runs
    #[serde(default)]
    pub prerequisites: Vec<String>,

    /// Ordered steps; step numbers are 1-based and contiguous
    pub steps: Vec<Step>,

    /// Expected end state of the whole plan
    #[serde(default)]
    pub expected_result: String,

    /// Planner confidence in [0, 1]
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

impl Plan {
    /// Create a plan from a task description and steps
    pub fn new(task_description: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            task_description: task_description.into(),
            prerequisites: Vec::new(),
            steps,
            expected_result: String::new(),
            confidence: 1.0,
        }
    }

    /// Set the expected end state
    pub fn with_expected_result(mut self, expected: impl Into<String>) -> Self {
        self.expected_result = expected.into();
        self
    }
}

/// A single typed unit of work within a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// 1-based position, strictly increasing and contiguous
    pub step_number: u32,

    /// Closed action enumeration; unknown kinds fail deserialization
    #[serde(rename = "action_type")]
    pub kind: ActionKind,

    /// Human-readable description of the step
    #[serde(default)]
    pub description: String,

    /// Element / resource the step operates on
    #[serde(default)]
    pub target: TargetSpec,

    /// What the planner expects to be true after the step
    #[serde(default)]
    pub expected_outcome: String,

    /// Optional free-form verification hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<String>,
}

impl Step {
    /// Create a step with an empty target
    pub fn new(step_number: u32, kind: ActionKind) -> Self {
        Self {
            step_number,
            kind,
            description: String::new(),
            target: TargetSpec::default(),
            expected_outcome: String::new(),
            verification: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the target
    pub fn with_target(mut self, target: TargetSpec) -> Self {
        self.target = target;
        self
    }

    /// Set the expected outcome
    pub fn with_expected_outcome(mut self, expected: impl Into<String>) -> Self {
        self.expected_outcome = expected.into();
        self
    }
}

/// Action kind enumeration
///
/// Closed set: the dispatcher matches exhaustively, so adding a kind is a
/// single point of change and unknown kinds are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Load a URL
    Navigate,

    /// Click a resolvable element
    Click,

    /// Best-effort fill of a set of form fields
    FillForm,

    /// Trigger form submission
    Submit,

    /// Sleep for a duration or poll an element condition
    Wait,

    /// No action; defers entirely to the verification engine
    Verify,

    /// Character-by-character input into a single field
    #[serde(alias = "type")]
    TypeText,

    /// Explicit plan-requested screenshot
    Screenshot,
}

impl ActionKind {
    /// Stable lowercase name, matching the wire form
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Navigate => "navigate",
            ActionKind::Click => "click",
            ActionKind::FillForm => "fill_form",
            ActionKind::Submit => "submit",
            ActionKind::Wait => "wait",
            ActionKind::Verify => "verify",
            ActionKind::TypeText => "type_text",
            ActionKind::Screenshot => "screenshot",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Element state a wait step can poll for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementState {
    /// Element is rendered and visible
    Visible,

    /// Element is absent or hidden
    Hidden,

    /// Element exists in the DOM, visible or not
    Attached,
}

impl std::fmt::Display for ElementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElementState::Visible => "visible",
            ElementState::Hidden => "hidden",
            ElementState::Attached => "attached",
        };
        f.write_str(name)
    }
}

/// Target of a step: which fields are required depends on the action kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Explicit CSS selector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,

    /// Absolute URL (navigate) or expected URL fragment (verify)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Visible text, label, or literal field identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Field name to value; iteration order is fill order
    #[serde(default, skip_serializing_if = "FormData::is_empty")]
    pub form_data: FormData,

    /// Fixed wait duration in milliseconds
    #[serde(default, alias = "duration", skip_serializing_if = "Option::is_none")]
    pub wait_ms: Option<u64>,

    /// Element state to poll for (paired with `selector`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ElementState>,
}

impl TargetSpec {
    /// Target by CSS selector
    pub fn selector(selector: impl Into<String>) -> Self {
        Self {
            selector: Some(selector.into()),
            ..Self::default()
        }
    }

    /// Target by URL
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Target by visible text or literal identifier
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Target a set of form fields
    pub fn form(form_data: FormData) -> Self {
        Self {
            form_data,
            ..Self::default()
        }
    }

    /// Set the text field
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the wait duration
    pub fn with_wait_ms(mut self, wait_ms: u64) -> Self {
        self.wait_ms = Some(wait_ms);
        self
    }

    /// True when no field is populated
    pub fn is_empty(&self) -> bool {
        self.selector.is_none()
            && self.url.is_none()
            && self.text.is_none()
            && self.form_data.is_empty()
            && self.wait_ms.is_none()
            && self.condition.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_kind_round_trips_snake_case() {
        let kind: ActionKind = serde_json::from_str("\"fill_form\"").unwrap();
        assert_eq!(kind, ActionKind::FillForm);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"fill_form\"");
    }

    #[test]
    fn action_kind_accepts_type_alias() {
        let kind: ActionKind = serde_json::from_str("\"type\"").unwrap();
        assert_eq!(kind, ActionKind::TypeText);
    }

    #[test]
    fn unknown_action_kind_is_a_deserialization_error() {
        let result: Result<ActionKind, _> = serde_json::from_str("\"teleport\"");
        assert!(result.is_err());
    }

    #[test]
    fn form_data_preserves_insertion_order() {
        let target: TargetSpec = serde_json::from_str(
            r#"{"form_data": {"zeta": "1", "alpha": "2", "mid": "3"}}"#,
        )
        .unwrap();
        let names: Vec<&String> = target.form_data.keys().collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn wait_duration_alias_is_accepted() {
        let target: TargetSpec = serde_json::from_str(r#"{"duration": 1500}"#).unwrap();
        assert_eq!(target.wait_ms, Some(1500));
    }
}
