use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::kernel::constants;
use crate::kernel::error::Result;
use crate::storage::error::StorageSystemError;
use crate::storage::StorageProvider;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }

    /// Deserialize any serde type from a string in this format
    pub fn deserialize<T: DeserializeOwned>(&self, data: &str) -> Result<T> {
        let format = self.extension().to_string();
        let parsed = match self {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| {
                StorageSystemError::Deserialize { format, source: Box::new(e) }
            })?,
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| {
                StorageSystemError::Deserialize { format, source: Box::new(e) }
            })?,
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| {
                StorageSystemError::Deserialize { format, source: Box::new(e) }
            })?,
        };
        Ok(parsed)
    }

    /// Serialize any serde type into a string in this format
    pub fn serialize<T: Serialize>(&self, value: &T) -> Result<String> {
        let format = self.extension().to_string();
        let rendered = match self {
            ConfigFormat::Json => serde_json::to_string_pretty(value).map_err(|e| {
                StorageSystemError::Serialize { format, source: Box::new(e) }
            })?,
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(value).map_err(|e| {
                StorageSystemError::Serialize { format, source: Box::new(e) }
            })?,
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(value).map_err(|e| {
                StorageSystemError::Serialize { format, source: Box::new(e) }
            })?,
        };
        Ok(rendered)
    }
}

/// In-memory representation of configuration data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigData {
    /// Raw configuration values
    #[serde(flatten)]
    values: HashMap<String, serde_json::Value>,
}

impl ConfigData {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a configuration value
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values.get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Get a configuration value with default
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Set a configuration value
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| {
            StorageSystemError::Serialize { format: "json".to_string(), source: Box::new(e) }
        })?;
        self.values.insert(key.to_string(), json_value);
        Ok(())
    }

    /// Whether no value is set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Configuration scope determines where configuration is stored
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigScope<'a> {
    /// Global application configuration
    Application,
    /// Configuration of the named module
    Module(&'a str),
}

impl ConfigScope<'_> {
    fn cache_key(&self, name: &str) -> String {
        match self {
            ConfigScope::Application => format!("app:{}", name),
            ConfigScope::Module(module) => format!("module:{}:{}", module, name),
        }
    }
}

/// Configuration manager that handles loading, saving, and caching configurations
#[derive(Debug)]
pub struct ConfigManager<P: StorageProvider + ?Sized> {
    /// Storage provider for reading/writing configs
    provider: Arc<P>,
    /// Base path for application configurations
    app_config_path: PathBuf,
    /// Default format for new configurations
    default_format: ConfigFormat,
    /// In-memory cache of loaded configurations
    cache: RefCell<HashMap<String, ConfigData>>,
}

impl<P: StorageProvider + ?Sized> ConfigManager<P> {
    /// Create a new configuration manager rooted at `app_config_path`
    pub fn new(provider: Arc<P>, app_config_path: PathBuf, default_format: ConfigFormat) -> Self {
        Self {
            provider,
            app_config_path,
            default_format,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Get the app configuration path
    pub fn app_config_path(&self) -> &Path {
        &self.app_config_path
    }

    /// Directory holding the configuration of the given module
    pub fn module_config_dir(&self, module: &str) -> PathBuf {
        self.app_config_path.join("modules").join(module)
    }

    /// Get the default format
    pub fn default_format(&self) -> ConfigFormat {
        self.default_format
    }

    /// Resolve the complete path for a configuration file.
    ///
    /// Without an explicit extension, an existing file in any supported
    /// format is preferred over the default format.
    pub fn resolve_config_path(&self, name: &str, scope: ConfigScope<'_>) -> PathBuf {
        let base_path = match scope {
            ConfigScope::Application => self.app_config_path.clone(),
            ConfigScope::Module(module) => self.module_config_dir(module),
        };

        if Path::new(name).extension().is_some() {
            return base_path.join(name);
        }

        let candidates = [
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml,
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml,
            ConfigFormat::Json,
        ];
        candidates
            .iter()
            .map(|format| base_path.join(format!("{}.{}", name, format.extension())))
            .find(|path| self.provider.is_file(path))
            .unwrap_or_else(|| base_path.join(format!("{}.{}", name, self.default_format.extension())))
    }

    /// Load configuration from disk. A missing file yields an empty config.
    pub fn load_config(&self, name: &str, scope: ConfigScope<'_>) -> Result<ConfigData> {
        let cache_key = scope.cache_key(name);
        if let Some(config) = self.cache.borrow().get(&cache_key) {
            return Ok(config.clone());
        }

        let path = self.resolve_config_path(name, scope);
        if !self.provider.exists(&path) {
            let empty_config = ConfigData::new();
            self.cache.borrow_mut().insert(cache_key, empty_config.clone());
            return Ok(empty_config);
        }

        let format = ConfigFormat::from_path(&path)
            .ok_or_else(|| StorageSystemError::UnsupportedFormat(path.display().to_string()))?;
        let content = self.provider.read_to_string(&path)?;
        let config: ConfigData = format.deserialize(&content)?;

        self.cache.borrow_mut().insert(cache_key, config.clone());
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save_config(&self, name: &str, config: &ConfigData, scope: ConfigScope<'_>) -> Result<()> {
        let path = self.resolve_config_path(name, scope);
        if let Some(parent) = path.parent() {
            self.provider.create_dir_all(parent)?;
        }

        let format = ConfigFormat::from_path(&path).unwrap_or(self.default_format);
        let content = format.serialize(config)?;
        self.provider.write_string(&path, &content)?;

        self.cache.borrow_mut().insert(scope.cache_key(name), config.clone());
        Ok(())
    }

    /// Get application configuration
    pub fn get_app_config(&self, name: &str) -> Result<ConfigData> {
        self.load_config(name, ConfigScope::Application)
    }

    /// Save application configuration
    pub fn save_app_config(&self, name: &str, config: &ConfigData) -> Result<()> {
        self.save_config(name, config, ConfigScope::Application)
    }

    /// Get a module configuration file
    pub fn get_module_config(&self, module: &str, name: &str) -> Result<ConfigData> {
        self.load_config(name, ConfigScope::Module(module))
    }

    /// Invalidate the cache for a specific configuration
    pub fn invalidate_cache(&self, name: &str, scope: ConfigScope<'_>) {
        self.cache.borrow_mut().remove(&scope.cache_key(name));
    }
}

/// Development server settings used by `web serve`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Program started as development server
    pub program: String,
    /// Front controller script handed to the server
    pub router_script: Option<PathBuf>,
    /// Document root, defaults to `<base>/public`
    pub document_root: Option<PathBuf>,
    /// Listen address
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            program: "php".to_string(),
            router_script: None,
            document_root: None,
            listen_addr: constants::DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}

/// Application settings, loaded from a single config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application base directory; relative paths below resolve against it
    pub base_dir: PathBuf,
    /// Directories searched for installed modules, in priority order
    pub module_paths: Vec<PathBuf>,
    /// Configuration directory
    pub config_dir: PathBuf,
    /// Whether routes and locales are wired (web context) or not (CLI context)
    pub web: bool,
    /// Development server settings
    pub server: ServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            module_paths: vec![PathBuf::from(constants::DEFAULT_MODULES_DIR)],
            config_dir: PathBuf::from(constants::DEFAULT_CONFIG_DIR),
            web: false,
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load settings from a file, the format is taken from its extension
    pub fn load(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| StorageSystemError::UnsupportedFormat(path.display().to_string()))?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| StorageSystemError::io(e, "read_app_config", path.to_path_buf()))?;
        let mut config: AppConfig = format.deserialize(&content)?;
        if config.base_dir.as_os_str().is_empty() || config.base_dir == Path::new(".") {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                config.base_dir = parent.to_path_buf();
            }
        }
        Ok(config)
    }

    /// Resolve a configured path against the base directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Module search paths, resolved
    pub fn resolved_module_paths(&self) -> Vec<PathBuf> {
        self.module_paths.iter().map(|p| self.resolve(p)).collect()
    }

    /// Configuration directory, resolved
    pub fn resolved_config_dir(&self) -> PathBuf {
        self.resolve(&self.config_dir)
    }

    /// Document root for `web serve`, resolved
    pub fn document_root(&self) -> PathBuf {
        match &self.server.document_root {
            Some(root) => self.resolve(root),
            None => self.base_dir.join("public"),
        }
    }
}
