//! # Modula Core Kernel Errors
//!
//! Defines the crate-wide [`Error`] type.
//!
//! Every subsystem owns a typed error enum ([`ModuleSystemError`],
//! [`DashboardError`], [`StorageSystemError`]); this module folds them into a
//! single [`Error`] so callers can use `?` across subsystem boundaries.
use std::path::PathBuf;
use std::result::Result as StdResult;

use crate::dashboard::error::DashboardError;
use crate::module_system::error::ModuleSystemError;
use crate::storage::error::StorageSystemError;
use thiserror::Error as ThisError;

/// Custom error type for the Modula runtime
#[derive(Debug, ThisError)]
pub enum Error {
    /// Specific, typed module system error
    #[error("Module system error: {0}")]
    ModuleSystem(#[from] ModuleSystemError),

    /// Specific, typed dashboard error
    #[error("Dashboard error: {0}")]
    Dashboard(#[from] DashboardError),

    /// Specific, typed storage system error
    #[error("Storage system error: {0}")]
    StorageSystem(#[from] StorageSystemError),

    /// Error occurring during a specific application lifecycle phase.
    #[error("Application lifecycle error during {phase:?}: {message}")]
    LifecycleError {
        phase: LifecyclePhase,
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Represents a specific phase in the application's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum LifecyclePhase {
    #[error("Configure")]
    Configure,
    #[error("Discover")]
    Discover,
    #[error("Load")]
    Load,
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl Error {
    /// An I/O failure of `operation` on `path`
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        Error::StorageSystem(StorageSystemError::Io {
            source,
            operation: operation.into(),
            path,
        })
    }
}
