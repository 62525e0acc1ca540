//! # Modula Core Storage
//!
//! File access and configuration handling.
//!
//! - **[`provider`]**: the [`StorageProvider`] trait that abstracts file access.
//! - **[`local`]**: [`LocalStorageProvider`], the filesystem implementation with
//!   atomic writes.
//! - **[`config`]**: configuration formats ([`ConfigFormat`]), raw values
//!   ([`ConfigData`]), the cached [`ConfigManager`] with application and module
//!   scopes, and the typed [`AppConfig`].
//! - **[`error`]**: [`StorageSystemError`](error::StorageSystemError).
pub mod provider;
pub mod local;
pub mod config;
pub mod error;

/// Re-export key types
pub use provider::StorageProvider;
pub use local::LocalStorageProvider;
pub use config::{
    AppConfig, ConfigData, ConfigFormat, ConfigManager, ConfigScope, ServerConfig,
};
