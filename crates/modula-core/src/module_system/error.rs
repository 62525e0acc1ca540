//! # Modula Module System Errors
//!
//! [`ModuleSystemError`] covers failures of module discovery, loading and
//! script execution, as well as programming errors raised by module
//! authoring mistakes (duplicate permissions, config tabs without URL).
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModuleSystemError {
    /// A permission name was provided twice by the same module
    #[error("Cannot provide permission \"{name}\" twice (module '{module}')")]
    DuplicatePermission { module: String, name: String },

    /// A restriction name was provided twice by the same module
    #[error("Cannot provide restriction \"{name}\" twice (module '{module}')")]
    DuplicateRestriction { module: String, name: String },

    /// A config tab was provided without the mandatory `url` key
    #[error("A module config tab MUST provide a \"url\" (module '{module}', tab '{tab}')")]
    MissingConfigTabUrl { module: String, tab: String },

    /// Lookup of a module that has not been loaded
    #[error("Cannot load module '{0}'. Module is not loaded")]
    ModuleNotLoaded(String),

    /// Loading a module that is not installed in any module path
    #[error("Cannot load module '{0}'. Module is not installed")]
    ModuleNotInstalled(String),

    /// A run or configuration script failed
    #[error("Script '{}' of module '{module}' failed: {message}", path.display())]
    ScriptFailed {
        module: String,
        path: PathBuf,
        message: String,
    },

    /// A declarative script could not be parsed
    #[error("Invalid script '{}': {source}", path.display())]
    InvalidScript {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A route declared by a script is malformed
    #[error("Invalid route '{name}': {message}")]
    InvalidRoute { name: String, message: String },
}
