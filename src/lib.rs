//! PlanPilot library
//!
//! Executes machine-generated web action plans against a browser session
//! reached through the `driver-port` capability trait, and emits an
//! auditable execution report. This crate hosts the CLI; the engine itself
//! lives in the workspace crates.

pub mod cli;

// Re-export the engine surface for embedders
pub use plan_core::{load_plan_from_file, load_plan_from_str, validate_plan, Plan};
pub use plan_flow::{ExecutionReport, ExecutorConfig, PlanExecutor};
