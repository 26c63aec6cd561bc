//! Error types for plan loading and validation

use thiserror::Error;

/// Fatal, pre-execution plan schema violations.
///
/// A schema error is raised before any browser interaction; the run never
/// starts and the report records zero executed steps.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    /// Plan has no steps
    #[error("plan contains no steps")]
    EmptyPlan,

    /// Step numbers must be 1-based, contiguous and in order
    #[error("step numbering broken at position {position}: expected {expected}, found {found}")]
    StepNumbering {
        position: usize,
        expected: u32,
        found: u32,
    },

    /// A required target field for the step's action kind is missing
    #[error("step {step}: {kind} requires target.{field}")]
    MissingTargetField {
        step: u32,
        kind: &'static str,
        field: &'static str,
    },

    /// fill_form with an empty field map
    #[error("step {step}: fill_form requires a non-empty target.form_data")]
    EmptyFormData { step: u32 },

    /// Planner confidence outside [0, 1]
    #[error("confidence {value} is outside [0, 1]")]
    ConfidenceOutOfRange { value: f64 },

    /// Plan JSON did not match the model (unknown action kind, wrong shape)
    #[error("plan does not match schema: {detail}")]
    Malformed { detail: String },
}

/// Errors surfaced by the plan loader.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("failed to read plan file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        PlanError::Schema(SchemaError::Malformed {
            detail: err.to_string(),
        })
    }
}
