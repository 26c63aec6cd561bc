//! Browser driver capability surface
//!
//! The engine never talks to a browser directly: every interaction goes
//! through [`BrowserDriver`], a fixed capability trait (navigate, find,
//! click, set value, read text, wait, screenshot). Real drivers live outside
//! this workspace; the `scripted` feature ships a deterministic in-memory
//! implementation used for rehearsal runs and by the test suites.

pub mod errors;
pub mod port;
pub mod types;

#[cfg(any(test, feature = "scripted"))]
pub mod scripted;

pub use errors::DriverError;
pub use port::{BrowserDriver, DriverSessionFactory};
pub use types::{
    ControlKind, ElementHandle, FindStrategy, NavigationOutcome, ReadScope, WaitFor,
};

#[cfg(any(test, feature = "scripted"))]
pub use scripted::{ElementFixture, PageFixture, ScriptedDriver, ScriptedSite};
