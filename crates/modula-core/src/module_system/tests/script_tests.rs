use std::fs;
use std::path::Path;

use serde_json::json;
use tempfile::tempdir;

use crate::host::hook::HookRegistry;
use crate::host::router::Route;
use crate::kernel::error::{Error, Result};
use crate::module_system::error::ModuleSystemError;
use crate::module_system::module::{module_namespace, ModulePaths};
use crate::module_system::provides::ProvidedItems;
use crate::module_system::registrar::Registrar;
use crate::module_system::script::{ScriptDescriptor, ScriptSource};

const CONFIGURATION: &str = r#"
css = ["charts.less"]
js = ["graphs.js"]
setup_wizard = "Modula::Module::Graphs::Setup"

[user_backends]
External = "Modula::Module::Graphs::ExternalBackend"

[[permission]]
name = "graphs/export"
description = "Allow exporting graphs"

[[restriction]]
name = "graphs/filter"
description = "Restrict visible graphs"

[[search_url]]
title = "Graphs"
url = "graphs/search"
priority = 20

[[config_tab]]
name = "backend"
url = "config/backend"
label = "Backend"

[[menu]]
name = "Reporting"
icon = "chart-line"
priority = 50

[[menu.children]]
name = "Graphs"
url = "graphs/overview"

[[dashboard]]
name = "Graphs"
[[dashboard.dashlets]]
name = "Load"
url = "graphs/load"
priority = 1

[[dashlet]]
name = "Load graph"
url = "graphs/load"
description = "Current load"

[[hook]]
name = "monitoring/HostActions"

[[navigation_item]]
type = "graph-view"
label = "Graph View"

[[route]]
name = "graphs_show"
pattern = "graphs/show/:id"

[[route]]
name = "graphs_raw"
type = "regex"
pattern = "graphs/raw/(\\d+)"
map = { "1" = "id" }
"#;

fn run_script(source: &ScriptSource, provided: &mut ProvidedItems, hooks: &mut HookRegistry) -> Result<()> {
    let paths = ModulePaths::new("graphs", Path::new("/modules/graphs"), Path::new("/etc/modula"));
    let namespace = module_namespace("graphs");
    let mut registrar = Registrar::new("graphs", &namespace, &paths, provided, hooks);
    source.execute(&mut registrar)
}

#[test]
fn test_declarative_script_replays_provides() -> Result<()> {
    let descriptor = ScriptDescriptor::parse(Path::new("configuration.toml"), CONFIGURATION)?;
    let mut provided = ProvidedItems::default();
    let mut hooks = HookRegistry::new();
    run_script(&ScriptSource::compiled(descriptor), &mut provided, &mut hooks)?;

    assert_eq!(provided.css_files.len(), 1);
    assert_eq!(provided.js_files.len(), 1);
    assert_eq!(provided.permissions[0].name, "graphs/export");
    assert_eq!(provided.restrictions[0].description, "Restrict visible graphs");
    assert_eq!(provided.search_urls[0].priority, 20);
    assert_eq!(provided.config_tabs[0].url, "graphs/config/backend");
    assert_eq!(provided.setup_wizard.as_deref(), Some("Modula::Module::Graphs::Setup"));
    assert!(provided.user_backends.contains_key("external"));

    let menu = &provided.menu_items[0];
    assert_eq!(menu.name(), "Reporting");
    assert_eq!(menu.properties().get("icon"), Some(&json!("chart-line")));
    assert_eq!(menu.properties().get("priority"), Some(&json!(50)));
    assert_eq!(menu.children()[0].name(), "Graphs");
    assert_eq!(menu.children()[0].properties().get("url"), Some(&json!("graphs/overview")));

    assert_eq!(provided.panes[0].dashlets()[0].priority, Some(1));
    assert_eq!(provided.dashlets[0].description(), Some("Current load"));
    assert_eq!(provided.navigation_items["graph-view"].label.as_deref(), Some("Graph View"));

    assert!(hooks.has("monitoring/HostActions"));

    assert_eq!(provided.routes.len(), 2);
    assert!(matches!(provided.routes[0].1, Route::Static { .. }));
    match &provided.routes[1].1 {
        Route::Regex { map, .. } => assert_eq!(map.get(&1).map(String::as_str), Some("id")),
        other => panic!("Expected regex route, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_missing_script_file_is_a_noop() -> Result<()> {
    let temp_dir = tempdir().unwrap();
    let mut provided = ProvidedItems::default();
    let mut hooks = HookRegistry::new();
    run_script(&ScriptSource::File(temp_dir.path().join("run.toml")), &mut provided, &mut hooks)?;
    assert!(provided.permissions.is_empty());
    Ok(())
}

#[test]
fn test_script_file_is_loaded() -> Result<()> {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("configuration.toml");
    fs::write(&path, CONFIGURATION).unwrap();

    let mut provided = ProvidedItems::default();
    let mut hooks = HookRegistry::new();
    run_script(&ScriptSource::File(path), &mut provided, &mut hooks)?;
    assert_eq!(provided.permissions.len(), 1);
    Ok(())
}

#[test]
fn test_invalid_script_file() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("run.toml");
    fs::write(&path, "[[permission]\nname = ").unwrap();

    let mut provided = ProvidedItems::default();
    let mut hooks = HookRegistry::new();
    let result = run_script(&ScriptSource::File(path.clone()), &mut provided, &mut hooks);
    match result {
        Err(Error::ModuleSystem(ModuleSystemError::InvalidScript { path: reported, .. })) => {
            assert_eq!(reported, path);
        }
        other => panic!("Expected InvalidScript, got {:?}", other),
    }
}

#[test]
fn test_closure_script() -> Result<()> {
    let script = ScriptSource::compiled(|registrar: &mut Registrar<'_>| -> Result<()> {
        registrar.provide_permission("graphs/view", "View graphs")?;
        registrar.provide_permission("graphs/view", "Twice")?;
        Ok(())
    });

    let mut provided = ProvidedItems::default();
    let mut hooks = HookRegistry::new();
    let result = run_script(&script, &mut provided, &mut hooks);
    assert!(matches!(
        result,
        Err(Error::ModuleSystem(ModuleSystemError::DuplicatePermission { .. }))
    ));
    assert_eq!(provided.permissions.len(), 1);
    assert_eq!(script.describe(), "<compiled>");
    Ok(())
}
