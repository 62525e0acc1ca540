use log::debug;

use crate::host::hook::HookRegistry;
use crate::host::router::Route;
use crate::kernel::constants::{NAMESPACE_SEPARATOR, PROVIDED_HOOK_NAMESPACE};
use crate::kernel::error::Result;
use crate::module_system::error::ModuleSystemError;
use crate::module_system::module::ModulePaths;
use crate::module_system::provides::{
    ConfigTab, DashboardContainer, DashletContainer, MenuItemContainer, NavigationItemType,
    Permission, Properties, ProvidedItems, Restriction, SearchUrl,
};

/// Upper-case the first character
pub(crate) fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `foo/bar` becomes `Foo::Bar`
pub(crate) fn slashes_to_namespace(class: &str) -> String {
    class
        .split('/')
        .map(ucfirst)
        .collect::<Vec<_>>()
        .join(NAMESPACE_SEPARATOR)
}

/// The handle module scripts use to register what a module provides.
///
/// A registrar is only alive while a script runs. Hooks go straight to the
/// host's hook registry; everything else is collected on the module.
pub struct Registrar<'a> {
    name: &'a str,
    namespace: &'a str,
    paths: &'a ModulePaths,
    provided: &'a mut ProvidedItems,
    hooks: &'a mut HookRegistry,
}

impl<'a> Registrar<'a> {
    pub fn new(
        name: &'a str,
        namespace: &'a str,
        paths: &'a ModulePaths,
        provided: &'a mut ProvidedItems,
        hooks: &'a mut HookRegistry,
    ) -> Self {
        Self { name, namespace, paths, provided, hooks }
    }

    pub fn module_name(&self) -> &str {
        self.name
    }

    pub fn namespace(&self) -> &str {
        self.namespace
    }

    pub fn paths(&self) -> &ModulePaths {
        self.paths
    }

    /// Provide an additional stylesheet, relative to the module's css directory
    pub fn provide_css_file(&mut self, path: &str) -> &mut Self {
        self.provided.css_files.push(self.paths.css_dir.join(path));
        self
    }

    /// Provide an additional script, relative to the module's js directory
    pub fn provide_js_file(&mut self, path: &str) -> &mut Self {
        self.provided.js_files.push(self.paths.js_dir.join(path));
        self
    }

    pub fn provide_search_url(&mut self, title: &str, url: &str, priority: i64) -> &mut Self {
        self.provided.search_urls.push(SearchUrl {
            title: title.to_string(),
            url: url.to_string(),
            priority,
        });
        self
    }

    /// Add a menu section, or replace the properties of an existing one
    pub fn menu_section(&mut self, name: &str, properties: Properties) -> &mut MenuItemContainer {
        let items = &mut self.provided.menu_items;
        let index = match items.iter().position(|i| i.name() == name) {
            Some(index) => {
                items[index].set_properties(properties);
                index
            }
            None => {
                items.push(MenuItemContainer::new(name, properties));
                items.len() - 1
            }
        };
        &mut items[index]
    }

    /// Add a dashboard pane, or replace the properties of an existing one
    pub fn dashboard(&mut self, name: &str, properties: Properties) -> &mut DashboardContainer {
        let panes = &mut self.provided.panes;
        let index = match panes.iter().position(|p| p.name() == name) {
            Some(index) => {
                panes[index].set_properties(properties);
                index
            }
            None => {
                panes.push(DashboardContainer::new(name, properties));
                panes.len() - 1
            }
        };
        &mut panes[index]
    }

    /// Provide a dashlet. An existing dashlet only gets its properties replaced.
    pub fn provide_dashlet(&mut self, name: &str, url: &str, properties: Properties) -> &mut DashletContainer {
        let dashlets = &mut self.provided.dashlets;
        let index = match dashlets.iter().position(|d| d.name() == name) {
            Some(index) => {
                dashlets[index].set_properties(properties);
                index
            }
            None => {
                dashlets.push(DashletContainer::new(name, url, properties));
                dashlets.len() - 1
            }
        };
        &mut dashlets[index]
    }

    pub fn provide_permission(&mut self, name: &str, description: &str) -> Result<&mut Self> {
        if self.provided.permissions.iter().any(|p| p.name == name) {
            return Err(ModuleSystemError::DuplicatePermission {
                module: self.name.to_string(),
                name: name.to_string(),
            }
            .into());
        }
        self.provided.permissions.push(Permission {
            name: name.to_string(),
            description: description.to_string(),
        });
        Ok(self)
    }

    pub fn provide_restriction(&mut self, name: &str, description: &str) -> Result<&mut Self> {
        if self.provided.restrictions.iter().any(|r| r.name == name) {
            return Err(ModuleSystemError::DuplicateRestriction {
                module: self.name.to_string(),
                name: name.to_string(),
            }
            .into());
        }
        self.provided.restrictions.push(Restriction {
            name: name.to_string(),
            description: description.to_string(),
        });
        Ok(self)
    }

    /// Provide a configuration tab. `config` must contain a `url`, which is
    /// made relative to the module.
    pub fn provide_config_tab(&mut self, name: &str, mut config: Properties) -> Result<&mut Self> {
        let url = match config.remove("url") {
            Some(serde_json::Value::String(url)) => url,
            Some(other) if !other.is_null() => other.to_string(),
            _ => {
                return Err(ModuleSystemError::MissingConfigTabUrl {
                    module: self.name.to_string(),
                    tab: name.to_string(),
                }
                .into());
            }
        };
        let tab = ConfigTab {
            name: name.to_string(),
            url: format!("{}/{}", self.name, url.trim_start_matches('/')),
            properties: config,
        };
        let tabs = &mut self.provided.config_tabs;
        match tabs.iter_mut().find(|t| t.name == name) {
            Some(existing) => *existing = tab,
            None => tabs.push(tab),
        }
        Ok(self)
    }

    pub fn provide_setup_wizard(&mut self, class: &str) -> &mut Self {
        self.provided.setup_wizard = Some(class.to_string());
        self
    }

    pub fn provide_user_backend(&mut self, identifier: &str, class: &str) -> &mut Self {
        self.provided
            .user_backends
            .insert(identifier.to_lowercase(), class.to_string());
        self
    }

    pub fn provide_user_group_backend(&mut self, identifier: &str, class: &str) -> &mut Self {
        self.provided
            .user_group_backends
            .insert(identifier.to_lowercase(), class.to_string());
        self
    }

    pub fn provide_navigation_item(
        &mut self,
        item_type: &str,
        label: Option<&str>,
        config: Option<&str>,
    ) -> &mut Self {
        self.provided.navigation_items.insert(
            item_type.to_string(),
            NavigationItemType {
                label: label.map(str::to_string),
                config: config.map(str::to_string),
            },
        );
        self
    }

    /// Provide a hook implementation.
    ///
    /// Without an implementation the hook name is used. A name without
    /// namespace separator is looked up in the module's `ProvidedHook`
    /// namespace, so `provide_hook("monitoring/HostActions", None, false)` in
    /// module `graphs` registers `Modula::Module::Graphs::ProvidedHook::Monitoring::HostActions`.
    pub fn provide_hook(&mut self, hook: &str, implementation: Option<&str>, always_run: bool) -> &mut Self {
        let implementation = implementation.unwrap_or(hook);
        let class = if implementation.contains(NAMESPACE_SEPARATOR) {
            implementation.to_string()
        } else {
            let segments = slashes_to_namespace(implementation);
            [self.namespace, PROVIDED_HOOK_NAMESPACE, segments.as_str()].join(NAMESPACE_SEPARATOR)
        };

        debug!("Module {} provides hook {} as {}", self.name, hook, class);
        self.hooks.register(hook, &class, &class, always_run);
        self
    }

    /// Add a route; it is handed to the router once the module is registered
    pub fn add_route(&mut self, name: &str, route: Route) -> Result<&mut Self> {
        route.validate(name)?;
        let routes = &mut self.provided.routes;
        match routes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = route,
            None => routes.push((name.to_string(), route)),
        }
        Ok(self)
    }
}
