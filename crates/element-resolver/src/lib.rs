//! Element resolution with an ordered strategy chain
//!
//! Turns a logical [`TargetSpec`] into at most one live element handle.
//! Strategies run in a fixed order and the first exact match wins; there is
//! no scoring and no fuzzy matching. A target nothing matches resolves to
//! `None`; NotFound is an answer, not an error. When a strategy matches
//! more than one element the driver returns the first in document order;
//! that ambiguity policy is deliberate and keeps resolution deterministic.

pub mod errors;
pub mod resolver;

pub use errors::ResolveError;
pub use resolver::{DefaultElementResolver, ElementResolver, ResolvedElement};

pub use plan_core::TargetSpec;
