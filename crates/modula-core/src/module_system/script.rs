//! Module scripts.
//!
//! A module has two scripts: the run script executed on registration and the
//! configuration script executed the first time anything the module provides
//! is asked for. Both receive a [`Registrar`] and report failures through
//! their result.
//!
//! Scripts are either compiled in and attached by the host, or declared in a
//! TOML file inside the module directory:
//!
//! ```toml
//! css = ["charts.less"]
//!
//! [[permission]]
//! name = "graphs/export"
//! description = "Allow exporting graphs"
//!
//! [[hook]]
//! name = "monitoring/HostActions"
//!
//! [[menu]]
//! name = "Reporting"
//! icon = "chart-line"
//! url = "graphs/overview"
//! ```
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::host::router::Route;
use crate::kernel::error::{Error, Result};
use crate::module_system::error::ModuleSystemError;
use crate::module_system::provides::{MenuItemContainer, Properties};
use crate::module_system::registrar::Registrar;

/// Code a module runs against its registrar
pub trait ModuleScript {
    fn run(&self, registrar: &mut Registrar<'_>) -> Result<()>;
}

impl<F> ModuleScript for F
where
    F: Fn(&mut Registrar<'_>) -> Result<()>,
{
    fn run(&self, registrar: &mut Registrar<'_>) -> Result<()> {
        self(registrar)
    }
}

/// Where a module script comes from
pub enum ScriptSource {
    /// A declarative script file; a missing file does nothing
    File(PathBuf),
    /// A script attached by the host
    Compiled(Box<dyn ModuleScript>),
}

impl ScriptSource {
    pub fn compiled<S: ModuleScript + 'static>(script: S) -> Self {
        ScriptSource::Compiled(Box::new(script))
    }

    /// Script file path, if this is a file script
    pub fn path(&self) -> Option<&Path> {
        match self {
            ScriptSource::File(path) => Some(path),
            ScriptSource::Compiled(_) => None,
        }
    }

    /// A label for log messages
    pub fn describe(&self) -> String {
        match self {
            ScriptSource::File(path) => path.display().to_string(),
            ScriptSource::Compiled(_) => "<compiled>".to_string(),
        }
    }

    pub fn execute(&self, registrar: &mut Registrar<'_>) -> Result<()> {
        match self {
            ScriptSource::File(path) => match ScriptDescriptor::load(path)? {
                Some(descriptor) => descriptor.run(registrar),
                None => Ok(()),
            },
            ScriptSource::Compiled(script) => script.run(registrar),
        }
    }
}

impl fmt::Debug for ScriptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptSource::File(path) => f.debug_tuple("File").field(path).finish(),
            ScriptSource::Compiled(_) => f.write_str("Compiled"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedDescription {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HookSpec {
    pub name: String,
    pub implementation: Option<String>,
    #[serde(default)]
    pub always_run: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchUrlSpec {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub priority: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedProperties {
    pub name: String,
    #[serde(flatten)]
    pub properties: Properties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MenuSpec {
    pub name: String,
    #[serde(default)]
    pub children: Vec<MenuSpec>,
    #[serde(flatten)]
    pub properties: Properties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaneDashletSpec {
    pub name: String,
    pub url: String,
    pub priority: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaneSpec {
    pub name: String,
    #[serde(default)]
    pub dashlets: Vec<PaneDashletSpec>,
    #[serde(flatten)]
    pub properties: Properties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashletSpec {
    pub name: String,
    pub url: String,
    #[serde(flatten)]
    pub properties: Properties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavigationItemSpec {
    #[serde(rename = "type")]
    pub item_type: String,
    pub label: Option<String>,
    pub config: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Static,
    Regex,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteSpec {
    pub name: String,
    #[serde(rename = "type", default = "default_route_kind")]
    pub kind: RouteKind,
    pub pattern: String,
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
    /// Capture group index (as string key) to parameter name
    #[serde(default)]
    pub map: BTreeMap<String, String>,
}

fn default_route_kind() -> RouteKind {
    RouteKind::Static
}

impl RouteSpec {
    fn to_route(&self) -> Result<Route> {
        match self.kind {
            RouteKind::Static => Ok(Route::static_route(&self.pattern, self.defaults.clone())),
            RouteKind::Regex => {
                let mut map = BTreeMap::new();
                for (group, param) in &self.map {
                    let group = group.parse::<usize>().map_err(|e| ModuleSystemError::InvalidRoute {
                        name: self.name.clone(),
                        message: format!("invalid capture group '{}': {}", group, e),
                    })?;
                    map.insert(group, param.clone());
                }
                Route::regex(&self.name, &self.pattern, self.defaults.clone(), map)
            }
        }
    }
}

/// A declarative module script
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScriptDescriptor {
    pub css: Vec<String>,
    pub js: Vec<String>,
    #[serde(rename = "search_url")]
    pub search_urls: Vec<SearchUrlSpec>,
    #[serde(rename = "permission")]
    pub permissions: Vec<NamedDescription>,
    #[serde(rename = "restriction")]
    pub restrictions: Vec<NamedDescription>,
    #[serde(rename = "config_tab")]
    pub config_tabs: Vec<NamedProperties>,
    #[serde(rename = "menu")]
    pub menu_sections: Vec<MenuSpec>,
    #[serde(rename = "dashboard")]
    pub panes: Vec<PaneSpec>,
    #[serde(rename = "dashlet")]
    pub dashlets: Vec<DashletSpec>,
    #[serde(rename = "hook")]
    pub hooks: Vec<HookSpec>,
    #[serde(rename = "route")]
    pub routes: Vec<RouteSpec>,
    pub setup_wizard: Option<String>,
    pub user_backends: BTreeMap<String, String>,
    pub user_group_backends: BTreeMap<String, String>,
    #[serde(rename = "navigation_item")]
    pub navigation_items: Vec<NavigationItemSpec>,
}

impl ScriptDescriptor {
    /// Load a script file. Returns `None` when there is no such file.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(e, "read_script", path.to_path_buf()))?;
        Self::parse(path, &content).map(Some)
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|source| {
            ModuleSystemError::InvalidScript {
                path: path.to_path_buf(),
                source,
            }
            .into()
        })
    }
}

fn add_menu_children(parent: &mut MenuItemContainer, children: &[MenuSpec]) {
    for child in children {
        let item = parent.add(&child.name, child.properties.clone());
        add_menu_children(item, &child.children);
    }
}

impl ModuleScript for ScriptDescriptor {
    fn run(&self, registrar: &mut Registrar<'_>) -> Result<()> {
        for path in &self.css {
            registrar.provide_css_file(path);
        }
        for path in &self.js {
            registrar.provide_js_file(path);
        }
        for search in &self.search_urls {
            registrar.provide_search_url(&search.title, &search.url, search.priority);
        }
        for permission in &self.permissions {
            registrar.provide_permission(&permission.name, &permission.description)?;
        }
        for restriction in &self.restrictions {
            registrar.provide_restriction(&restriction.name, &restriction.description)?;
        }
        for tab in &self.config_tabs {
            registrar.provide_config_tab(&tab.name, tab.properties.clone())?;
        }
        for section in &self.menu_sections {
            let item = registrar.menu_section(&section.name, section.properties.clone());
            add_menu_children(item, &section.children);
        }
        for pane in &self.panes {
            let container = registrar.dashboard(&pane.name, pane.properties.clone());
            for dashlet in &pane.dashlets {
                container.add_dashlet(&dashlet.name, &dashlet.url, dashlet.priority);
            }
        }
        for dashlet in &self.dashlets {
            registrar.provide_dashlet(&dashlet.name, &dashlet.url, dashlet.properties.clone());
        }
        for hook in &self.hooks {
            registrar.provide_hook(&hook.name, hook.implementation.as_deref(), hook.always_run);
        }
        for route in &self.routes {
            registrar.add_route(&route.name, route.to_route()?)?;
        }
        if let Some(wizard) = &self.setup_wizard {
            registrar.provide_setup_wizard(wizard);
        }
        for (identifier, class) in &self.user_backends {
            registrar.provide_user_backend(identifier, class);
        }
        for (identifier, class) in &self.user_group_backends {
            registrar.provide_user_group_backend(identifier, class);
        }
        for item in &self.navigation_items {
            registrar.provide_navigation_item(&item.item_type, item.label.as_deref(), item.config.as_deref());
        }
        Ok(())
    }
}
