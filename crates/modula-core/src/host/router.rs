use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;
use regex::Regex;
use serde::Serialize;

use crate::kernel::error::Result;
use crate::module_system::error::ModuleSystemError;

/// A route handed to the front controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Route {
    /// A path pattern with `:name` placeholders
    Static {
        pattern: String,
        defaults: BTreeMap<String, String>,
    },
    /// A regular expression; capture groups are mapped to request parameters
    Regex {
        pattern: String,
        defaults: BTreeMap<String, String>,
        map: BTreeMap<usize, String>,
    },
}

impl Route {
    pub fn static_route(pattern: &str, defaults: BTreeMap<String, String>) -> Self {
        Route::Static { pattern: pattern.to_string(), defaults }
    }

    /// A regex route; the pattern must compile
    pub fn regex(
        name: &str,
        pattern: &str,
        defaults: BTreeMap<String, String>,
        map: BTreeMap<usize, String>,
    ) -> Result<Self> {
        let route = Route::Regex { pattern: pattern.to_string(), defaults, map };
        route.validate(name)?;
        Ok(route)
    }

    /// Check that a regex route compiles
    pub fn validate(&self, name: &str) -> Result<()> {
        if let Route::Regex { pattern, .. } = self {
            Regex::new(pattern).map_err(|e| ModuleSystemError::InvalidRoute {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    pub fn pattern(&self) -> &str {
        match self {
            Route::Static { pattern, .. } | Route::Regex { pattern, .. } => pattern,
        }
    }

    pub fn defaults(&self) -> &BTreeMap<String, String> {
        match self {
            Route::Static { defaults, .. } | Route::Regex { defaults, .. } => defaults,
        }
    }

    pub fn default_value(&self, key: &str) -> Option<&str> {
        self.defaults().get(key).map(String::as_str)
    }
}

/// Named routes and per-module controller directories
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<(String, Route)>,
    controller_dirs: BTreeMap<String, PathBuf>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route. A route of the same name is replaced.
    pub fn add_route(&mut self, name: &str, route: Route) {
        debug!("Adding route {} ({})", name, route.pattern());
        match self.routes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = route,
            None => self.routes.push((name.to_string(), route)),
        }
    }

    pub fn route(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn has_route(&self, name: &str) -> bool {
        self.route(name).is_some()
    }

    /// Route names in the order they were added
    pub fn route_names(&self) -> Vec<&str> {
        self.routes.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn add_controller_directory(&mut self, dir: &Path, module: &str) {
        self.controller_dirs.insert(module.to_string(), dir.to_path_buf());
    }

    pub fn controller_directory(&self, module: &str) -> Option<&Path> {
        self.controller_dirs.get(module).map(PathBuf::as_path)
    }
}
