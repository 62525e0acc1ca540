use std::path::PathBuf;
use std::sync::Arc;

use crate::host::Host;
use crate::kernel::constants;
use crate::kernel::error::{Error, LifecyclePhase, Result};
use crate::module_system::{Module, ModuleManager};
use crate::storage::{AppConfig, ConfigFormat, ConfigManager, LocalStorageProvider, StorageProvider};

/// Owns the host collaborators, the module manager and the configuration
pub struct Application {
    settings: AppConfig,
    host: Host,
    modules: ModuleManager,
    config: ConfigManager<dyn StorageProvider>,
    initialized: bool,
}

impl Application {
    /// Create an application from its settings. Nothing is read from disk yet.
    pub fn new(settings: AppConfig) -> Self {
        log::info!("Initializing {} v{}", constants::APP_NAME, constants::APP_VERSION);

        let config_dir = settings.resolved_config_dir();
        let provider = Arc::new(LocalStorageProvider::new(PathBuf::new())) as Arc<dyn StorageProvider>;
        let config = ConfigManager::new(provider, config_dir.clone(), ConfigFormat::Json);
        let modules = ModuleManager::new(settings.resolved_module_paths(), config_dir);
        let host = if settings.web { Host::web() } else { Host::cli() };

        Self {
            settings,
            host,
            modules,
            config,
            initialized: false,
        }
    }

    /// Load the enabled module list and detect installed modules, without
    /// loading any of them
    pub fn discover(&mut self) -> Result<()> {
        log::info!("Using config directory: {}", self.config.app_config_path().display());
        self.modules
            .load_enabled_state(&self.config)
            .map_err(|e| lifecycle_error(LifecyclePhase::Configure, "Failed to read enabled modules", e))?;

        self.modules
            .detect_installed_modules()
            .map_err(|e| lifecycle_error(LifecyclePhase::Discover, "Failed to detect installed modules", e))
    }

    /// Discover modules and load the enabled ones. Bootstrapping twice is an error.
    pub fn bootstrap(&mut self) -> Result<Vec<String>> {
        if self.initialized {
            return Err(Error::LifecycleError {
                phase: LifecyclePhase::Configure,
                message: "Application already bootstrapped".to_string(),
                source: None,
            });
        }

        self.discover()?;
        let loaded = self
            .modules
            .load_enabled_modules(&mut self.host)
            .map_err(|e| lifecycle_error(LifecyclePhase::Load, "Failed to load enabled modules", e))?;

        self.initialized = true;
        log::info!("Loaded {} of {} installed modules", loaded.len(), self.modules.installed_modules().len());
        Ok(loaded)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn settings(&self) -> &AppConfig {
        &self.settings
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut Host {
        &mut self.host
    }

    pub fn modules(&self) -> &ModuleManager {
        &self.modules
    }

    pub fn modules_mut(&mut self) -> &mut ModuleManager {
        &mut self.modules
    }

    pub fn config(&self) -> &ConfigManager<dyn StorageProvider> {
        &self.config
    }

    /// A loaded module together with the host its getters need
    pub fn module_mut(&mut self, name: &str, autoload: bool) -> Result<(&mut Module, &mut Host)> {
        let module = self.modules.get(name, autoload, &mut self.host)?;
        Ok((module, &mut self.host))
    }

    pub fn enable_module(&mut self, name: &str) -> Result<()> {
        self.modules.enable_module(name, &self.config)
    }

    pub fn disable_module(&mut self, name: &str) -> Result<()> {
        self.modules.disable_module(name, &self.config)
    }
}

fn lifecycle_error(phase: LifecyclePhase, message: &str, source: Error) -> Error {
    Error::LifecycleError {
        phase,
        message: message.to_string(),
        source: Some(Box::new(source)),
    }
}
