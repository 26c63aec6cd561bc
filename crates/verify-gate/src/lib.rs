//! Outcome verification
//!
//! After every dispatched step the engine runs a fixed battery of checks
//! selected by the step's action kind. Each check is independent and
//! individually recorded; there is no short-circuit; so the report stays
//! auditable even when several checks fail. Verification is total: driver
//! read failures become failing checks, never errors, which keeps the
//! result a deterministic function of captured state.

pub mod engine;
pub mod types;

pub use engine::{DefaultVerificationEngine, VerificationEngine};
pub use types::{Check, CheckKind, VerificationResult};
