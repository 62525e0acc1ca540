use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::host::router::Route;

/// Free-form properties of menu items, panes, dashlets and config tabs
pub type Properties = BTreeMap<String, serde_json::Value>;

/// A URL the global search forwards queries to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchUrl {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub priority: i64,
}

/// A named permission a module contributes to the role configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub name: String,
    pub description: String,
}

/// A named restriction a module contributes to the role configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    pub name: String,
    pub description: String,
}

/// A tab on the module's configuration page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigTab {
    pub name: String,
    /// Already prefixed with the module name
    pub url: String,
    /// Everything else the tab was configured with (label, title, url params)
    pub properties: Properties,
}

/// A configurable navigation item type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationItemType {
    pub label: Option<String>,
    pub config: Option<String>,
}

/// A top-level menu section and its children
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItemContainer {
    name: String,
    properties: Properties,
    children: Vec<MenuItemContainer>,
}

impl MenuItemContainer {
    pub fn new(name: impl Into<String>, properties: Properties) -> Self {
        Self { name: name.into(), properties, children: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Replace all properties
    pub fn set_properties(&mut self, properties: Properties) -> &mut Self {
        self.properties = properties;
        self
    }

    pub fn set_property(&mut self, key: &str, value: impl Into<serde_json::Value>) -> &mut Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn children(&self) -> &[MenuItemContainer] {
        &self.children
    }

    /// Add a child item, or replace the properties of an existing one
    pub fn add(&mut self, name: &str, properties: Properties) -> &mut MenuItemContainer {
        let index = match self.children.iter().position(|c| c.name == name) {
            Some(index) => {
                self.children[index].properties = properties;
                index
            }
            None => {
                self.children.push(MenuItemContainer::new(name, properties));
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }
}

/// A dashlet placed on a module-provided dashboard pane
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaneDashlet {
    pub name: String,
    pub url: String,
    pub priority: Option<i64>,
}

/// A dashboard pane and the dashlets on it
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardContainer {
    name: String,
    properties: Properties,
    dashlets: Vec<PaneDashlet>,
}

impl DashboardContainer {
    pub fn new(name: impl Into<String>, properties: Properties) -> Self {
        Self { name: name.into(), properties, dashlets: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Replace all properties
    pub fn set_properties(&mut self, properties: Properties) -> &mut Self {
        self.properties = properties;
        self
    }

    pub fn dashlets(&self) -> &[PaneDashlet] {
        &self.dashlets
    }

    /// Add a dashlet to this pane. A dashlet of the same name is replaced in place.
    pub fn add_dashlet(&mut self, name: &str, url: &str, priority: Option<i64>) -> &mut Self {
        let dashlet = PaneDashlet { name: name.to_string(), url: url.to_string(), priority };
        match self.dashlets.iter_mut().find(|d| d.name == name) {
            Some(existing) => *existing = dashlet,
            None => self.dashlets.push(dashlet),
        }
        self
    }
}

/// A dashlet a module offers for users to pick
#[derive(Debug, Clone, PartialEq)]
pub struct DashletContainer {
    name: String,
    url: String,
    properties: Properties,
}

impl DashletContainer {
    pub fn new(name: impl Into<String>, url: impl Into<String>, properties: Properties) -> Self {
        Self { name: name.into(), url: url.into(), properties }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn set_properties(&mut self, properties: Properties) -> &mut Self {
        self.properties = properties;
        self
    }

    /// The `title` property, falling back to the name
    pub fn title(&self) -> &str {
        self.properties
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or(&self.name)
    }

    pub fn description(&self) -> Option<&str> {
        self.properties.get("description").and_then(|v| v.as_str())
    }
}

/// Everything a module's scripts provided, in registration order
#[derive(Debug, Default)]
pub struct ProvidedItems {
    pub css_files: Vec<PathBuf>,
    pub js_files: Vec<PathBuf>,
    pub routes: Vec<(String, Route)>,
    pub menu_items: Vec<MenuItemContainer>,
    pub panes: Vec<DashboardContainer>,
    pub dashlets: Vec<DashletContainer>,
    pub search_urls: Vec<SearchUrl>,
    pub permissions: Vec<Permission>,
    pub restrictions: Vec<Restriction>,
    pub config_tabs: Vec<ConfigTab>,
    pub setup_wizard: Option<String>,
    pub user_backends: BTreeMap<String, String>,
    pub user_group_backends: BTreeMap<String, String>,
    pub navigation_items: BTreeMap<String, NavigationItemType>,
}
