/// Application name
pub const APP_NAME: &str = "Modula";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Root of every module namespace; a module `foo` lives in `Modula::Module::Foo`
pub const MODULE_NAMESPACE_ROOT: &str = "Modula::Module";

/// Separator between namespace segments
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Sub-namespace short hook implementation names are resolved in
pub const PROVIDED_HOOK_NAMESPACE: &str = "ProvidedHook";

/// Module descriptor file, relative to the module base directory
pub const METADATA_FILE: &str = "module.info";

/// Bootstrap script, executed on registration
pub const RUN_SCRIPT: &str = "run.toml";

/// Configuration script, executed lazily by provider getters
pub const CONFIG_SCRIPT: &str = "configuration.toml";

/// Version reported for modules without a `Version:` line
pub const DEFAULT_MODULE_VERSION: &str = "0.0.0";

/// Description reported for modules without one
pub const DEFAULT_MODULE_DESCRIPTION: &str = "This module has no description";

/// Default module search path
pub const DEFAULT_MODULES_DIR: &str = "modules";

/// Default configuration directory
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Name of the application config holding the enabled module list
pub const ENABLED_MODULES_CONFIG: &str = "modules";

/// Key within [`ENABLED_MODULES_CONFIG`] listing enabled modules
pub const ENABLED_MODULES_KEY: &str = "enabled_modules";

/// Listen address used by `web serve` when none is given
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:80";
