//! Error types for element resolution

use driver_port::DriverError;
use thiserror::Error;

/// Failures during resolution.
///
/// "No element matched" is not an error; `resolve` returns `Ok(None)` for
/// that. Errors here mean the driver itself failed mid-resolution.
#[derive(Debug, Error, Clone)]
pub enum ResolveError {
    #[error("driver failure during resolution: {0}")]
    Driver(#[from] DriverError),
}

impl ResolveError {
    /// True when the underlying driver failure ends the session.
    pub fn is_fatal(&self) -> bool {
        match self {
            ResolveError::Driver(err) => err.is_fatal(),
        }
    }
}
