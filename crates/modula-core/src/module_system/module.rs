use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::{debug, info, warn};
use regex::Regex;

use crate::dashboard::widget::Pane;
use crate::host::router::Route;
use crate::host::Host;
use crate::kernel::constants::{
    CONFIG_SCRIPT, METADATA_FILE, MODULE_NAMESPACE_ROOT, NAMESPACE_SEPARATOR, RUN_SCRIPT,
};
use crate::kernel::error::{Error, Result};
use crate::module_system::error::ModuleSystemError;
use crate::module_system::metadata::{ModuleMetadata, Requirement, RequirementMap};
use crate::module_system::navigation::{Navigation, NavigationItem};
use crate::module_system::provides::{
    ConfigTab, DashletContainer, MenuItemContainer, NavigationItemType, Permission, Properties,
    ProvidedItems, Restriction, SearchUrl,
};
use crate::module_system::registrar::{ucfirst, Registrar};
use crate::module_system::script::ScriptSource;
use crate::module_system::version::supports_icingadb;
use crate::storage::{ConfigData, ConfigManager, StorageProvider};
use crate::utils::fs::subdirectory_names;

static LOCALE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}_[A-Z]{2}$").expect("valid locale pattern"));

/// Whether a one-shot step ran, and how it went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchStatus {
    #[default]
    NotStarted,
    Succeeded,
    Failed,
}

impl LaunchStatus {
    pub fn has_started(&self) -> bool {
        *self != LaunchStatus::NotStarted
    }
}

/// Directories and files of a module, derived from its base directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePaths {
    pub base_dir: PathBuf,
    pub css_dir: PathBuf,
    pub js_dir: PathBuf,
    pub lib_dir: PathBuf,
    pub app_dir: PathBuf,
    pub locale_dir: PathBuf,
    pub form_dir: PathBuf,
    pub controller_dir: PathBuf,
    pub run_script: PathBuf,
    pub config_script: PathBuf,
    pub metadata_file: PathBuf,
    /// `<config_dir>/modules/<name>`
    pub config_dir: PathBuf,
}

impl ModulePaths {
    pub fn new(name: &str, base_dir: &Path, app_config_dir: &Path) -> Self {
        let app_dir = base_dir.join("application");
        Self {
            base_dir: base_dir.to_path_buf(),
            css_dir: base_dir.join("public").join("css"),
            js_dir: base_dir.join("public").join("js"),
            lib_dir: base_dir.join("library"),
            locale_dir: app_dir.join("locale"),
            form_dir: app_dir.join("forms"),
            controller_dir: app_dir.join("controllers"),
            app_dir,
            run_script: base_dir.join(RUN_SCRIPT),
            config_script: base_dir.join(CONFIG_SCRIPT),
            metadata_file: base_dir.join(METADATA_FILE),
            config_dir: app_config_dir.join("modules").join(name),
        }
    }
}

/// The namespace classes of a module live in
pub fn module_namespace(name: &str) -> String {
    let name = ucfirst(name);
    [MODULE_NAMESPACE_ROOT, name.as_str()].join(NAMESPACE_SEPARATOR)
}

/// An installed module.
///
/// Constructing a module touches nothing on disk. The descriptor is read on
/// first access to metadata, the configuration script on first access to
/// anything the module provides, and the run script on [`Module::register`].
#[derive(Debug)]
pub struct Module {
    name: String,
    namespace: String,
    paths: ModulePaths,
    metadata: OnceCell<ModuleMetadata>,
    provided: ProvidedItems,
    run_script: ScriptSource,
    config_script: ScriptSource,
    autoloader: LaunchStatus,
    config_status: LaunchStatus,
    registered: bool,
}

impl Module {
    /// `config_dir` is the application's configuration directory
    pub fn new(name: &str, base_dir: &Path, config_dir: &Path) -> Self {
        let paths = ModulePaths::new(name, base_dir, config_dir);
        Self {
            name: name.to_string(),
            namespace: module_namespace(name),
            run_script: ScriptSource::File(paths.run_script.clone()),
            config_script: ScriptSource::File(paths.config_script.clone()),
            paths,
            metadata: OnceCell::new(),
            provided: ProvidedItems::default(),
            autoloader: LaunchStatus::NotStarted,
            config_status: LaunchStatus::NotStarted,
            registered: false,
        }
    }

    /// Replace the run script
    pub fn set_run_script(&mut self, script: ScriptSource) {
        self.run_script = script;
    }

    /// Replace the configuration script. Has no effect once it ran.
    pub fn set_config_script(&mut self, script: ScriptSource) {
        self.config_script = script;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn paths(&self) -> &ModulePaths {
        &self.paths
    }

    pub fn base_dir(&self) -> &Path {
        &self.paths.base_dir
    }

    pub fn css_dir(&self) -> &Path {
        &self.paths.css_dir
    }

    pub fn js_dir(&self) -> &Path {
        &self.paths.js_dir
    }

    pub fn lib_dir(&self) -> &Path {
        &self.paths.lib_dir
    }

    pub fn application_dir(&self) -> &Path {
        &self.paths.app_dir
    }

    pub fn locale_dir(&self) -> &Path {
        &self.paths.locale_dir
    }

    pub fn form_dir(&self) -> &Path {
        &self.paths.form_dir
    }

    pub fn controller_dir(&self) -> &Path {
        &self.paths.controller_dir
    }

    pub fn config_dir(&self) -> &Path {
        &self.paths.config_dir
    }

    /// The module's main stylesheet
    pub fn css_filename(&self) -> PathBuf {
        self.paths.css_dir.join("module.less")
    }

    /// The module's main script
    pub fn js_filename(&self) -> PathBuf {
        self.paths.js_dir.join("module.js")
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn autoloader_status(&self) -> LaunchStatus {
        self.autoloader
    }

    pub fn config_script_status(&self) -> LaunchStatus {
        self.config_status
    }

    /// Activate the module: register its namespace, run its run script and
    /// wire it into the web frontend.
    ///
    /// Returns false if the run script failed. The module then stays
    /// unregistered and a later call runs the script again.
    pub fn register(&mut self, host: &mut Host) -> bool {
        if self.registered {
            return true;
        }

        self.register_autoloader(host);
        if let Err(e) = self.launch_run_script(host) {
            let failure = self.script_failure(&self.run_script, &self.paths.run_script, &e);
            warn!("Launching the run script failed: {}", failure);
            return false;
        }

        self.register_web_integration(host);
        self.registered = true;
        info!("Registered module {}", self.name);

        true
    }

    fn script_failure(&self, script: &ScriptSource, default_path: &Path, error: &Error) -> ModuleSystemError {
        ModuleSystemError::ScriptFailed {
            module: self.name.clone(),
            path: script.path().unwrap_or(default_path).to_path_buf(),
            message: error.to_string(),
        }
    }

    fn register_autoloader(&mut self, host: &mut Host) {
        if self.autoloader.has_started() {
            return;
        }

        let lib_namespace_dir = self.paths.lib_dir.join(ucfirst(&self.name));
        host.loader_mut()
            .register_namespace(&self.namespace, &lib_namespace_dir, Some(&self.paths.app_dir));
        self.autoloader = LaunchStatus::Succeeded;
    }

    fn launch_run_script(&mut self, host: &mut Host) -> Result<()> {
        let mut registrar = Registrar::new(
            &self.name,
            &self.namespace,
            &self.paths,
            &mut self.provided,
            host.hooks_mut(),
        );
        self.run_script.execute(&mut registrar)
    }

    /// Run the configuration script unless it already ran or failed
    pub fn launch_config_script(&mut self, host: &mut Host) {
        if self.config_status.has_started() {
            return;
        }

        self.register_autoloader(host);
        let result = {
            let mut registrar = Registrar::new(
                &self.name,
                &self.namespace,
                &self.paths,
                &mut self.provided,
                host.hooks_mut(),
            );
            self.config_script.execute(&mut registrar)
        };

        self.config_status = match result {
            Ok(()) => LaunchStatus::Succeeded,
            Err(e) => {
                let failure = self.script_failure(&self.config_script, &self.paths.config_script, &e);
                warn!("Launching the configuration script failed: {}", failure);
                LaunchStatus::Failed
            }
        };
    }

    fn register_web_integration(&self, host: &mut Host) {
        if !host.is_web() {
            return;
        }

        self.register_locales(host);
        self.register_routes(host);
    }

    fn register_locales(&self, host: &mut Host) {
        if !self.has_locales() {
            return;
        }
        if let Some(translator) = host.translator_mut() {
            translator.add_translation_directory(&self.paths.locale_dir, &self.name);
        }
    }

    fn register_routes(&self, host: &mut Host) {
        let router = host.router_mut();
        router.add_controller_directory(&self.paths.controller_dir, &self.name);

        for (name, route) in &self.provided.routes {
            router.add_route(name, route.clone());
        }

        router.add_route(
            &format!("{}_jsprovider", self.name),
            Route::static_route(&format!("js/{}/:file", self.name), self.static_defaults("javascript")),
        );
        router.add_route(
            &format!("{}_img", self.name),
            Route::Regex {
                pattern: format!("img/{}/(.+)", self.name),
                defaults: self.static_defaults("img"),
                map: BTreeMap::from([(1, "file".to_string())]),
            },
        );
    }

    fn static_defaults(&self, action: &str) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("action".to_string(), action.to_string()),
            ("controller".to_string(), "static".to_string()),
            ("module".to_string(), "default".to_string()),
            ("module_name".to_string(), self.name.clone()),
        ])
    }

    /// Routes provided so far
    pub fn routes(&self) -> &[(String, Route)] {
        &self.provided.routes
    }

    pub fn search_urls(&mut self, host: &mut Host) -> &[SearchUrl] {
        self.launch_config_script(host);
        &self.provided.search_urls
    }

    /// Provided stylesheets plus `module.less` if it exists
    pub fn css_files(&mut self, host: &mut Host) -> Vec<PathBuf> {
        self.launch_config_script(host);
        let mut files = self.provided.css_files.clone();
        let main = self.css_filename();
        if main.exists() {
            files.push(main);
        }
        files
    }

    pub fn has_css(&mut self, host: &mut Host) -> bool {
        if self.css_filename().exists() {
            return true;
        }
        self.launch_config_script(host);
        !self.provided.css_files.is_empty()
    }

    /// Provided scripts plus `module.js`, which is always listed
    pub fn js_files(&mut self, host: &mut Host) -> Vec<PathBuf> {
        self.launch_config_script(host);
        let mut files = self.provided.js_files.clone();
        files.push(self.js_filename());
        files
    }

    pub fn has_js(&mut self, host: &mut Host) -> bool {
        if self.js_filename().exists() {
            return true;
        }
        self.launch_config_script(host);
        !self.provided.js_files.is_empty()
    }

    /// The module's menu as navigation tree
    pub fn menu(&mut self, host: &mut Host) -> Navigation {
        self.launch_config_script(host);
        self.build_menu(host, &self.provided.menu_items)
    }

    fn build_menu(&self, host: &Host, items: &[MenuItemContainer]) -> Navigation {
        let mut navigation = Navigation::new();
        for item in items {
            let mut properties = item.properties().clone();
            if !properties.contains_key("label") {
                properties.insert("label".to_string(), self.translate(host, item.name()).into());
            }
            let children = self.build_menu(host, item.children());
            navigation.add_item(NavigationItem::from_properties(item.name(), properties, children));
        }
        navigation
    }

    /// The module's dashboard panes as navigation tree
    pub fn dashboard(&mut self, host: &mut Host) -> Navigation {
        self.launch_config_script(host);

        let mut navigation = Navigation::new();
        for pane in &self.provided.panes {
            let mut dashlets = Navigation::new();
            for dashlet in pane.dashlets() {
                let mut properties = Properties::new();
                properties.insert("label".to_string(), self.translate(host, &dashlet.name).into());
                properties.insert("url".to_string(), dashlet.url.clone().into());
                properties.insert("priority".to_string(), dashlet.priority.into());
                dashlets.add_item(NavigationItem::from_properties(&dashlet.name, properties, Navigation::new()));
            }

            let mut properties = pane.properties().clone();
            properties.insert("label".to_string(), self.translate(host, pane.name()).into());
            properties.insert("type".to_string(), "dashboard-pane".into());
            navigation.add_item(NavigationItem::from_properties(pane.name(), properties, dashlets));
        }
        navigation
    }

    fn translate(&self, host: &Host, message: &str) -> String {
        match host.translator() {
            Some(translator) => translator.translate(message, &self.name).to_string(),
            None => message.to_string(),
        }
    }

    /// The module's dashboard panes as widgets, ready to be added to a home
    pub fn dashboard_panes(&mut self, host: &mut Host) -> Vec<Pane> {
        self.launch_config_script(host);
        self.provided.panes.iter().map(Pane::from_container).collect()
    }

    pub fn dashlets(&mut self, host: &mut Host) -> &[DashletContainer] {
        self.launch_config_script(host);
        &self.provided.dashlets
    }

    pub fn provided_permissions(&mut self, host: &mut Host) -> &[Permission] {
        self.launch_config_script(host);
        &self.provided.permissions
    }

    pub fn provided_restrictions(&mut self, host: &mut Host) -> &[Restriction] {
        self.launch_config_script(host);
        &self.provided.restrictions
    }

    pub fn provides_permission(&mut self, host: &mut Host, name: &str) -> bool {
        self.provided_permissions(host).iter().any(|p| p.name == name)
    }

    pub fn provides_restriction(&mut self, host: &mut Host, name: &str) -> bool {
        self.provided_restrictions(host).iter().any(|r| r.name == name)
    }

    /// Configuration tabs: the `info` tab, then the provided tabs if `enabled`
    pub fn config_tabs(&mut self, host: &mut Host, enabled: bool) -> Vec<ConfigTab> {
        self.launch_config_script(host);

        let mut properties = Properties::new();
        properties.insert("urlParams".to_string(), serde_json::json!({ "name": self.name }));
        properties.insert("label".to_string(), format!("Module: {}", self.name).into());
        let mut tabs = vec![ConfigTab {
            name: "info".to_string(),
            url: "config/module".to_string(),
            properties,
        }];

        if enabled {
            tabs.extend(self.provided.config_tabs.iter().cloned());
        }
        tabs
    }

    /// Whether a setup wizard was provided and its class can be located
    pub fn provides_setup_wizard(&mut self, host: &mut Host) -> bool {
        self.launch_config_script(host);
        match &self.provided.setup_wizard {
            Some(class) => host.loader().resolve(class).is_some(),
            None => false,
        }
    }

    pub fn setup_wizard(&mut self, host: &mut Host) -> Option<&str> {
        self.launch_config_script(host);
        self.provided.setup_wizard.as_deref()
    }

    pub fn user_backends(&mut self, host: &mut Host) -> &BTreeMap<String, String> {
        self.launch_config_script(host);
        &self.provided.user_backends
    }

    pub fn user_group_backends(&mut self, host: &mut Host) -> &BTreeMap<String, String> {
        self.launch_config_script(host);
        &self.provided.user_group_backends
    }

    pub fn navigation_items(&mut self, host: &mut Host) -> &BTreeMap<String, NavigationItemType> {
        self.launch_config_script(host);
        &self.provided.navigation_items
    }

    /// The parsed descriptor, read on first access
    pub fn metadata(&self) -> &ModuleMetadata {
        self.metadata.get_or_init(|| {
            debug!("Reading descriptor of module {}", self.name);
            ModuleMetadata::from_file(&self.name, &self.paths.metadata_file)
        })
    }

    pub fn version(&self) -> &str {
        &self.metadata().version
    }

    pub fn title(&self) -> &str {
        &self.metadata().title
    }

    pub fn description(&self) -> &str {
        &self.metadata().description
    }

    /// The legacy `Depends` list; prefer [`Module::required_modules`]
    pub fn dependencies(&self) -> &RequirementMap {
        &self.metadata().depends
    }

    fn declared_modules(&self) -> &RequirementMap {
        let metadata = self.metadata();
        if metadata.modules.is_empty() {
            &metadata.depends
        } else {
            &metadata.modules
        }
    }

    /// Required libraries. Module requirements on `ipl` and `reactbundle`
    /// count as requirements on their library successors.
    pub fn required_libraries(&self) -> RequirementMap {
        let mut libraries = self.metadata().libraries.clone();
        let modules = self.declared_modules();

        for (module, library) in [("ipl", "icinga-php-library"), ("reactbundle", "icinga-php-thirdparty")] {
            if let Some(requirement) = modules.get(module) {
                if !libraries.contains(library) {
                    libraries.insert(library, requirement.clone());
                }
            }
        }
        libraries
    }

    /// Required modules.
    ///
    /// A module requiring `monitoring` also requires `icingadb` (placed right
    /// after it) if it is known to support Icinga DB or already asks for it.
    /// `ipl` and `reactbundle` are never reported.
    pub fn required_modules(&self) -> RequirementMap {
        let declared = self.declared_modules();
        let mut required = declared.clone();

        if declared.contains("monitoring") && (self.supports_icingadb() || declared.contains("icingadb")) {
            let icingadb = declared.get("icingadb").cloned().unwrap_or(Requirement::Any);
            required = RequirementMap::new();
            for (name, requirement) in declared.iter().filter(|(name, _)| *name != "icingadb") {
                required.insert(name, requirement.clone());
                if name == "monitoring" {
                    required.insert("icingadb", icingadb.clone());
                }
            }
        }

        required.remove("ipl");
        required.remove("reactbundle");
        required
    }

    /// Whether this module in its installed version supports Icinga DB
    pub fn supports_icingadb(&self) -> bool {
        supports_icingadb(&self.name, self.version())
    }

    pub fn has_locales(&self) -> bool {
        self.paths.locale_dir.is_dir()
    }

    /// Locales the module ships translations for, sorted
    pub fn list_locales(&self) -> Vec<String> {
        match subdirectory_names(&self.paths.locale_dir, &|name: &str| LOCALE_NAME.is_match(name)) {
            Ok(locales) => locales,
            Err(e) => {
                debug!("Can't list locales of module {}: {}", self.name, e);
                Vec::new()
            }
        }
    }

    /// Load one of the module's configuration files
    pub fn config<P: StorageProvider + ?Sized>(&self, manager: &ConfigManager<P>, file: &str) -> Result<ConfigData> {
        manager.get_module_config(&self.name, file)
    }
}
