use std::collections::BTreeMap;
use std::path::Path;

use serde_json::json;

use crate::host::hook::HookRegistry;
use crate::host::router::Route;
use crate::kernel::error::Error;
use crate::module_system::error::ModuleSystemError;
use crate::module_system::module::{module_namespace, ModulePaths};
use crate::module_system::provides::{Properties, ProvidedItems};
use crate::module_system::registrar::{slashes_to_namespace, Registrar};

struct Fixture {
    paths: ModulePaths,
    namespace: String,
    provided: ProvidedItems,
    hooks: HookRegistry,
}

impl Fixture {
    fn new(name: &str) -> Self {
        Self {
            paths: ModulePaths::new(name, Path::new("/modules").join(name).as_path(), Path::new("/etc/modula")),
            namespace: module_namespace(name),
            provided: ProvidedItems::default(),
            hooks: HookRegistry::new(),
        }
    }

    fn registrar<'a>(&'a mut self, name: &'a str) -> Registrar<'a> {
        Registrar::new(name, &self.namespace, &self.paths, &mut self.provided, &mut self.hooks)
    }
}

fn props(value: serde_json::Value) -> Properties {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_slashes_to_namespace() {
    assert_eq!(slashes_to_namespace("monitoring/hostActions"), "Monitoring::HostActions");
    assert_eq!(slashes_to_namespace("ApplicationState"), "ApplicationState");
}

#[test]
fn test_provide_hook_resolves_class_in_module_namespace() {
    let mut fixture = Fixture::new("graphs");
    {
        let mut registrar = fixture.registrar("graphs");
        registrar.provide_hook("monitoring/HostActions", None, false);
        registrar.provide_hook("ApplicationState", Some("Other::Module::State"), true);
        registrar.provide_hook("Ticket", Some("jira/ticketLink"), false);
    }

    let host_actions = fixture.hooks.implementations("monitoring/HostActions");
    assert_eq!(host_actions.len(), 1);
    assert_eq!(host_actions[0].class, "Modula::Module::Graphs::ProvidedHook::Monitoring::HostActions");
    assert_eq!(host_actions[0].key, host_actions[0].class);
    assert!(!host_actions[0].always_run);

    let state = fixture.hooks.implementations("ApplicationState");
    assert_eq!(state[0].class, "Other::Module::State");
    assert!(state[0].always_run);

    let ticket = fixture.hooks.implementations("Ticket");
    assert_eq!(ticket[0].class, "Modula::Module::Graphs::ProvidedHook::Jira::TicketLink");
}

#[test]
fn test_duplicate_permission_is_rejected() {
    let mut fixture = Fixture::new("director");
    let mut registrar = fixture.registrar("director");
    registrar.provide_permission("director/admin", "Full access").unwrap();

    let result = registrar.provide_permission("director/admin", "Again");
    match result {
        Err(Error::ModuleSystem(ModuleSystemError::DuplicatePermission { module, name })) => {
            assert_eq!(module, "director");
            assert_eq!(name, "director/admin");
        }
        other => panic!("Expected DuplicatePermission, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_duplicate_restriction_is_rejected() {
    let mut fixture = Fixture::new("director");
    let mut registrar = fixture.registrar("director");
    registrar.provide_restriction("director/filter", "Filter").unwrap();
    assert!(matches!(
        registrar.provide_restriction("director/filter", "Filter"),
        Err(Error::ModuleSystem(ModuleSystemError::DuplicateRestriction { .. }))
    ));
}

#[test]
fn test_config_tab_requires_url_and_is_prefixed() {
    let mut fixture = Fixture::new("graphite");
    {
        let mut registrar = fixture.registrar("graphite");
        assert!(matches!(
            registrar.provide_config_tab("backend", props(json!({ "label": "Backend" }))),
            Err(Error::ModuleSystem(ModuleSystemError::MissingConfigTabUrl { .. }))
        ));
        registrar
            .provide_config_tab("backend", props(json!({ "url": "/config/backend", "label": "Backend" })))
            .unwrap();
    }

    let tab = &fixture.provided.config_tabs[0];
    assert_eq!(tab.name, "backend");
    assert_eq!(tab.url, "graphite/config/backend");
    assert_eq!(tab.properties.get("label"), Some(&json!("Backend")));
    assert!(!tab.properties.contains_key("url"));
}

#[test]
fn test_css_and_js_paths_are_relative_to_asset_dirs() {
    let mut fixture = Fixture::new("cube");
    {
        let mut registrar = fixture.registrar("cube");
        registrar.provide_css_file("charts.less").provide_js_file("vendor/d3.js");
    }
    assert_eq!(fixture.provided.css_files, vec![Path::new("/modules/cube/public/css/charts.less")]);
    assert_eq!(fixture.provided.js_files, vec![Path::new("/modules/cube/public/js/vendor/d3.js")]);
}

#[test]
fn test_menu_section_upserts() {
    let mut fixture = Fixture::new("reporting");
    {
        let mut registrar = fixture.registrar("reporting");
        let section = registrar.menu_section("Reporting", props(json!({ "icon": "chart" })));
        section.add("Reports", props(json!({ "url": "reporting/reports" })));
        registrar.menu_section("Reporting", props(json!({ "icon": "barchart", "priority": 100 })));
    }

    let items = &fixture.provided.menu_items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].properties().get("icon"), Some(&json!("barchart")));
    assert_eq!(items[0].children().len(), 1);
}

#[test]
fn test_dashboard_and_dashlets() {
    let mut fixture = Fixture::new("monitoring");
    {
        let mut registrar = fixture.registrar("monitoring");
        registrar
            .dashboard("Overview", Properties::new())
            .add_dashlet("Problems", "monitoring/list/services?state=2", Some(10))
            .add_dashlet("Hosts", "monitoring/list/hosts", None);
        registrar.provide_dashlet("Tactical", "monitoring/tactical", props(json!({ "title": "Tactical Overview" })));
        registrar.provide_dashlet("Tactical", "ignored/url", props(json!({ "description": "Summary" })));
    }

    let pane = &fixture.provided.panes[0];
    assert_eq!(pane.dashlets().len(), 2);
    assert_eq!(pane.dashlets()[0].priority, Some(10));

    let dashlet = &fixture.provided.dashlets[0];
    assert_eq!(fixture.provided.dashlets.len(), 1);
    assert_eq!(dashlet.url(), "monitoring/tactical");
    assert_eq!(dashlet.title(), "Tactical");
    assert_eq!(dashlet.description(), Some("Summary"));
}

#[test]
fn test_backends_and_navigation_items() {
    let mut fixture = Fixture::new("ldapauth");
    {
        let mut registrar = fixture.registrar("ldapauth");
        registrar.provide_user_backend("LDAP", "Modula::Module::Ldapauth::UserBackend");
        registrar.provide_user_group_backend("LdapGroups", "Modula::Module::Ldapauth::GroupBackend");
        registrar.provide_navigation_item("host-action", Some("Host Action"), None);
        registrar.provide_setup_wizard("Modula::Module::Ldapauth::Setup");
        registrar.provide_search_url("Users", "ldapauth/users", 5);
    }

    assert_eq!(
        fixture.provided.user_backends.get("ldap").map(String::as_str),
        Some("Modula::Module::Ldapauth::UserBackend")
    );
    assert!(fixture.provided.user_group_backends.contains_key("ldapgroups"));
    let item = &fixture.provided.navigation_items["host-action"];
    assert_eq!(item.label.as_deref(), Some("Host Action"));
    assert_eq!(item.config, None);
    assert_eq!(fixture.provided.setup_wizard.as_deref(), Some("Modula::Module::Ldapauth::Setup"));
    assert_eq!(fixture.provided.search_urls[0].priority, 5);
}

#[test]
fn test_add_route_validates_regex() {
    let mut fixture = Fixture::new("maps");
    let mut registrar = fixture.registrar("maps");

    let bad = Route::Regex {
        pattern: "maps/(".to_string(),
        defaults: BTreeMap::new(),
        map: BTreeMap::new(),
    };
    assert!(matches!(
        registrar.add_route("maps_bad", bad),
        Err(Error::ModuleSystem(ModuleSystemError::InvalidRoute { .. }))
    ));

    registrar
        .add_route("maps_show", Route::static_route("maps/:id", BTreeMap::new()))
        .unwrap();
    assert_eq!(fixture.provided.routes.len(), 1);
}
