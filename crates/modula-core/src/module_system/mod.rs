//! # Modula Module System
//!
//! Discovery, description and registration of modules.
//!
//! A module is a directory below one of the module paths. It describes itself
//! in `module.info` ([`metadata`]) and contributes to the application through
//! two scripts ([`script`]) that receive a [`Registrar`]: the run script runs
//! when the module is registered, the configuration script the first time
//! anything the module provides is requested.
//!
//! - **[`module`]**: [`Module`], one installed module with its lazy state.
//! - **[`manager`]**: [`ModuleManager`], which modules are installed, enabled and loaded.
//! - **[`registrar`]**: the handle scripts use to provide things.
//! - **[`provides`]**: records for what a module provides.
//! - **[`navigation`]**: menu and dashboard trees.
//! - **[`version`]**: lenient version comparison and requirement ranges.
//! - **[`error`]**: [`ModuleSystemError`](error::ModuleSystemError).
pub mod error;
pub mod manager;
pub mod metadata;
pub mod module;
pub mod navigation;
pub mod provides;
pub mod registrar;
pub mod script;
pub mod version;

pub use manager::ModuleManager;
pub use metadata::{ModuleMetadata, Requirement, RequirementMap};
pub use module::{LaunchStatus, Module, ModulePaths};
pub use navigation::{Navigation, NavigationItem};
pub use registrar::Registrar;
pub use script::{ModuleScript, ScriptDescriptor, ScriptSource};
pub use version::{ModuleVersion, VersionRange};

#[cfg(test)]
mod tests;
