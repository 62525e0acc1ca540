//! # Modula Core Kernel
//!
//! Ties the subsystems together.
//!
//! - **Bootstrapping**: [`Application`](bootstrap::Application) owns the
//!   [`Host`](crate::host::Host), the [`ModuleManager`](crate::module_system::ModuleManager)
//!   and the configuration manager, and brings enabled modules up in
//!   configure, discover and load phases.
//! - **Constants**: names, file names and defaults shared across the crate.
//! - **Errors**: the crate-wide [`Error`](error::Error) and `Result` alias.
pub mod bootstrap;
pub mod constants;
pub mod error;

pub use bootstrap::Application;
pub use error::{Error, LifecyclePhase, Result};

#[cfg(test)]
mod tests;
