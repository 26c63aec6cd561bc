//! Action dispatch
//!
//! Maps each plan step to its handler and returns a structured
//! [`ActionResult`]. The action kind enumeration is closed, so the dispatch
//! match is exhaustive at compile time; unknown kinds cannot reach this
//! crate. Handlers never panic and never throw past the dispatcher: every
//! failure is folded into the result with a classified [`ErrorInfo`].

pub mod dispatcher;
pub mod errors;
pub mod handlers;
pub mod ports;
pub mod types;

pub use dispatcher::ActionDispatcher;
pub use errors::{ErrorInfo, FailureKind, Severity};
pub use ports::EvidenceSink;
pub use types::{
    ActionData, ActionResult, DispatchCtx, FieldFill, FieldOutcome, SubmitMode,
};
