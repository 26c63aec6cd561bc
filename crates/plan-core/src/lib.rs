//! Plan data model and schema validation
//!
//! A [`Plan`] is the machine-generated input of the execution engine: an
//! ordered sequence of typed steps with element targets and expected
//! outcomes. This crate owns the serde model, the schema validator that the
//! engine runs before touching a browser, and the JSON loader.

pub mod errors;
pub mod loader;
pub mod model;
pub mod validator;

pub use errors::{PlanError, SchemaError};
pub use loader::{load_plan_from_file, load_plan_from_str};
pub use model::{ActionKind, ElementState, FormData, Plan, Step, TargetSpec};
pub use validator::validate_plan;
