//! Plan loading
//!
//! Accepts both a bare plan document and the planner's result envelope
//! (`{ "plan": { ... }, ... }`), then runs schema validation.

use crate::errors::PlanError;
use crate::model::Plan;
use crate::validator::validate_plan;
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Parse and validate a plan from a JSON string.
pub fn load_plan_from_str(raw: &str) -> Result<Plan, PlanError> {
    let mut value: Value = serde_json::from_str(raw)?;

    // Planner output wraps the plan in a result envelope.
    if let Some(inner) = value.get_mut("plan") {
        value = inner.take();
    }

    let plan: Plan = serde_json::from_value(value)?;
    validate_plan(&plan)?;

    info!(
        task = %plan.task_description,
        steps = plan.steps.len(),
        "plan loaded"
    );
    Ok(plan)
}

/// Read, parse and validate a plan file.
pub fn load_plan_from_file(path: impl AsRef<Path>) -> Result<Plan, PlanError> {
    let raw = std::fs::read_to_string(path)?;
    load_plan_from_str(&raw)
}
