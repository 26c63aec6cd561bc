//! Plan schema validator
//!
//! Runs before any browser interaction: step numbering contiguity, action
//! kind membership (already guaranteed by the closed enum at deserialize
//! time) and per-kind required target fields.

use crate::errors::SchemaError;
use crate::model::{ActionKind, Plan, Step};
use tracing::debug;

/// Validate a plan, failing fast on the first schema violation.
pub fn validate_plan(plan: &Plan) -> Result<(), SchemaError> {
    if plan.steps.is_empty() {
        return Err(SchemaError::EmptyPlan);
    }

    if !(0.0..=1.0).contains(&plan.confidence) {
        return Err(SchemaError::ConfidenceOutOfRange {
            value: plan.confidence,
        });
    }

    for (position, step) in plan.steps.iter().enumerate() {
        let expected = position as u32 + 1;
        if step.step_number != expected {
            return Err(SchemaError::StepNumbering {
                position,
                expected,
                found: step.step_number,
            });
        }

        validate_target(step)?;
    }

    debug!(steps = plan.steps.len(), "plan schema validated");
    Ok(())
}

/// Per-kind required target fields.
fn validate_target(step: &Step) -> Result<(), SchemaError> {
    let target = &step.target;
    match step.kind {
        ActionKind::Navigate => {
            if target.url.as_deref().map_or(true, str::is_empty) {
                return Err(missing(step, "url"));
            }
        }
        ActionKind::Click => {
            if target.selector.is_none() && target.text.is_none() {
                return Err(missing(step, "selector|text"));
            }
        }
        ActionKind::FillForm => {
            if target.form_data.is_empty() {
                return Err(SchemaError::EmptyFormData {
                    step: step.step_number,
                });
            }
        }
        ActionKind::TypeText => {
            if target.selector.is_none() {
                return Err(missing(step, "selector"));
            }
            if target.text.is_none() {
                return Err(missing(step, "text"));
            }
        }
        ActionKind::Wait => {
            if target.wait_ms.is_none() && target.condition.is_none() {
                return Err(missing(step, "wait_ms|condition"));
            }
            if target.condition.is_some() && target.selector.is_none() {
                return Err(missing(step, "selector"));
            }
        }
        // Submit falls back to the default submit control; verify and
        // screenshot take whatever hints are present.
        ActionKind::Submit | ActionKind::Verify | ActionKind::Screenshot => {}
    }
    Ok(())
}

fn missing(step: &Step, field: &'static str) -> SchemaError {
    SchemaError::MissingTargetField {
        step: step.step_number,
        kind: step.kind.name(),
        field,
    }
}
