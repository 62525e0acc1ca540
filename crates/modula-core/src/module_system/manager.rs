use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::{debug, info, warn};
use regex::Regex;

use crate::host::Host;
use crate::kernel::constants::{ENABLED_MODULES_CONFIG, ENABLED_MODULES_KEY};
use crate::kernel::error::{Error, Result};
use crate::module_system::error::ModuleSystemError;
use crate::module_system::module::Module;
use crate::module_system::script::ScriptSource;
use crate::storage::{ConfigManager, StorageProvider};
use crate::utils::fs::find_subdirectories;

static MODULE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("valid module name pattern"));

/// Whether `name` can be a module name
pub fn is_valid_module_name(name: &str) -> bool {
    MODULE_NAME.is_match(name)
}

/// Scripts attached by the host before a module is loaded
#[derive(Debug, Default)]
struct CompiledScripts {
    run: Option<ScriptSource>,
    config: Option<ScriptSource>,
}

/// Knows which modules are installed, enabled and loaded
#[derive(Debug)]
pub struct ModuleManager {
    module_paths: Vec<PathBuf>,
    config_dir: PathBuf,
    installed: BTreeMap<String, PathBuf>,
    enabled: Vec<String>,
    loaded: BTreeMap<String, Module>,
    compiled_scripts: HashMap<String, CompiledScripts>,
}

impl ModuleManager {
    /// `module_paths` are searched in order; `config_dir` is the application's
    /// configuration directory
    pub fn new(module_paths: Vec<PathBuf>, config_dir: PathBuf) -> Self {
        Self {
            module_paths,
            config_dir,
            installed: BTreeMap::new(),
            enabled: Vec::new(),
            loaded: BTreeMap::new(),
            compiled_scripts: HashMap::new(),
        }
    }

    pub fn module_paths(&self) -> &[PathBuf] {
        &self.module_paths
    }

    /// Scan the module paths. A module found in an earlier path shadows
    /// modules of the same name in later paths.
    pub fn detect_installed_modules(&mut self) -> Result<()> {
        self.installed.clear();

        for path in &self.module_paths {
            if !path.is_dir() {
                debug!("Module path {} does not exist, skipping", path.display());
                continue;
            }

            let accept = |name: &str| {
                let valid = is_valid_module_name(name);
                if !valid {
                    debug!("Ignoring {} in {}: not a valid module name", name, path.display());
                }
                valid
            };
            let found = find_subdirectories(path, &accept)
                .map_err(|e| Error::io(e, "read_dir", path.clone()))?;

            for (name, dir) in found {
                match self.installed.get(&name) {
                    Some(existing) => debug!(
                        "Module {} in {} is shadowed by {}",
                        name,
                        dir.display(),
                        existing.display()
                    ),
                    None => {
                        self.installed.insert(name, dir);
                    }
                }
            }
        }

        debug!("Detected {} installed modules", self.installed.len());
        Ok(())
    }

    /// Read the list of enabled modules from the configuration
    pub fn load_enabled_state<P: StorageProvider + ?Sized>(&mut self, config: &ConfigManager<P>) -> Result<()> {
        let data = config.get_app_config(ENABLED_MODULES_CONFIG)?;
        self.enabled = data.get_or(ENABLED_MODULES_KEY, Vec::new());
        Ok(())
    }

    fn persist_enabled_state<P: StorageProvider + ?Sized>(&self, config: &ConfigManager<P>) -> Result<()> {
        let mut data = config.get_app_config(ENABLED_MODULES_CONFIG)?;
        data.set(ENABLED_MODULES_KEY, &self.enabled)?;
        config.save_app_config(ENABLED_MODULES_CONFIG, &data)
    }

    /// Enable an installed module and persist the change
    pub fn enable_module<P: StorageProvider + ?Sized>(&mut self, name: &str, config: &ConfigManager<P>) -> Result<()> {
        if !self.has_installed(name) {
            return Err(ModuleSystemError::ModuleNotInstalled(name.to_string()).into());
        }
        if self.has_enabled(name) {
            return Ok(());
        }

        self.enabled.push(name.to_string());
        self.persist_enabled_state(config)?;
        info!("Enabled module {}", name);
        Ok(())
    }

    /// Disable a module and persist the change. Disabling a module that is
    /// not enabled does nothing.
    pub fn disable_module<P: StorageProvider + ?Sized>(&mut self, name: &str, config: &ConfigManager<P>) -> Result<()> {
        if !self.has_enabled(name) {
            return Ok(());
        }

        self.enabled.retain(|n| n != name);
        self.persist_enabled_state(config)?;
        info!("Disabled module {}", name);
        Ok(())
    }

    pub fn has_installed(&self, name: &str) -> bool {
        self.installed.contains_key(name)
    }

    pub fn has_enabled(&self, name: &str) -> bool {
        self.enabled.iter().any(|n| n == name)
    }

    pub fn has_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    /// Whether a module is enabled
    pub fn exists(&self, name: &str) -> bool {
        self.has_enabled(name)
    }

    /// Installed module names, sorted
    pub fn installed_modules(&self) -> Vec<&str> {
        self.installed.keys().map(String::as_str).collect()
    }

    /// Enabled module names in the order they were enabled
    pub fn enabled_modules(&self) -> &[String] {
        &self.enabled
    }

    /// Loaded module names, sorted
    pub fn loaded_modules(&self) -> Vec<&str> {
        self.loaded.keys().map(String::as_str).collect()
    }

    pub fn module_dir(&self, name: &str) -> Option<&Path> {
        self.installed.get(name).map(PathBuf::as_path)
    }

    /// An unregistered view of an installed module, for inspecting its metadata
    pub fn installed_module(&self, name: &str) -> Option<Module> {
        self.installed
            .get(name)
            .map(|dir| Module::new(name, dir, &self.config_dir))
    }

    /// Attach compiled scripts to a module. They replace the module's script
    /// files when it is loaded.
    pub fn register_compiled_scripts(&mut self, name: &str, run: Option<ScriptSource>, config: Option<ScriptSource>) {
        if let Some(module) = self.loaded.get_mut(name) {
            if let Some(config) = config {
                module.set_config_script(config);
            }
            if let Some(run) = run {
                module.set_run_script(run);
            }
            return;
        }

        let scripts = self.compiled_scripts.entry(name.to_string()).or_default();
        if run.is_some() {
            scripts.run = run;
        }
        if config.is_some() {
            scripts.config = config;
        }
    }

    /// Construct and register an installed module. Loading a loaded module
    /// returns it unchanged.
    pub fn load_module(&mut self, name: &str, host: &mut Host) -> Result<&mut Module> {
        if !self.loaded.contains_key(name) {
            let dir = self
                .installed
                .get(name)
                .ok_or_else(|| ModuleSystemError::ModuleNotInstalled(name.to_string()))?;

            let mut module = Module::new(name, dir, &self.config_dir);
            if let Some(scripts) = self.compiled_scripts.remove(name) {
                if let Some(run) = scripts.run {
                    module.set_run_script(run);
                }
                if let Some(config) = scripts.config {
                    module.set_config_script(config);
                }
            }

            if !module.register(host) {
                warn!("Module {} was loaded but could not be registered", name);
            }
            self.loaded.insert(name.to_string(), module);
        }

        self.get_module_mut(name)
    }

    /// Load every enabled module. Enabled modules that are not installed are
    /// skipped with a warning. Returns the names of the modules loaded.
    pub fn load_enabled_modules(&mut self, host: &mut Host) -> Result<Vec<String>> {
        let mut loaded = Vec::new();
        for name in self.enabled.clone() {
            if !self.has_installed(&name) {
                warn!("Module {} is enabled but not installed", name);
                continue;
            }
            self.load_module(&name, host)?;
            loaded.push(name);
        }
        Ok(loaded)
    }

    /// A loaded module; asking for one that is not loaded is a programming error
    pub fn get_module(&self, name: &str) -> Result<&Module> {
        self.loaded
            .get(name)
            .ok_or_else(|| ModuleSystemError::ModuleNotLoaded(name.to_string()).into())
    }

    pub fn get_module_mut(&mut self, name: &str) -> Result<&mut Module> {
        self.loaded
            .get_mut(name)
            .ok_or_else(|| ModuleSystemError::ModuleNotLoaded(name.to_string()).into())
    }

    /// A loaded module. With `autoload`, an enabled module that is not loaded
    /// yet gets loaded first.
    pub fn get(&mut self, name: &str, autoload: bool, host: &mut Host) -> Result<&mut Module> {
        if !self.has_loaded(name) && autoload && self.has_enabled(name) {
            self.load_module(name, host)?;
        }
        self.get_module_mut(name)
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.loaded.values()
    }
}
