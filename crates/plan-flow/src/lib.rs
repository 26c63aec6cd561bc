//! Plan execution
//!
//! [`PlanExecutor`] owns the per-step state machine: evidence before →
//! dispatch → evidence after → verify → record → severity decision. Steps
//! run strictly one at a time against one exclusively-owned browser
//! session, acquired at run start and released on every exit path. The
//! result is a self-contained [`ExecutionReport`] that identifies, without
//! any log inspection, exactly which step broke and why.

pub mod config;
pub mod evidence;
pub mod executor;
pub mod report;

pub use config::ExecutorConfig;
pub use evidence::{CapturePoint, EvidenceCollector, EvidenceRef};
pub use executor::PlanExecutor;
pub use report::{
    ExecutionReport, ReportError, SkipReason, SkippedStep, StepResult, StepStatus,
};
