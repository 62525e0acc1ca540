use std::fs;
use std::path::PathBuf;

use tempfile::{tempdir, TempDir};

use crate::kernel::bootstrap::Application;
use crate::kernel::error::{Error, LifecyclePhase, Result};
use crate::storage::AppConfig;

fn settings(temp_dir: &TempDir, web: bool) -> AppConfig {
    AppConfig {
        base_dir: temp_dir.path().to_path_buf(),
        module_paths: vec![PathBuf::from("modules")],
        config_dir: PathBuf::from("config"),
        web,
        ..AppConfig::default()
    }
}

fn install(temp_dir: &TempDir, name: &str, run_script: Option<&str>) {
    let dir = temp_dir.path().join("modules").join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("module.info"), format!("Name: {}\nVersion: 1.0.0\n", name)).unwrap();
    if let Some(script) = run_script {
        fs::write(dir.join("run.toml"), script).unwrap();
    }
}

fn enable(temp_dir: &TempDir, names: &[&str]) {
    let config_dir = temp_dir.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    let list = names.iter().map(|n| format!("\"{}\"", n)).collect::<Vec<_>>().join(", ");
    fs::write(config_dir.join("modules.json"), format!("{{\"enabled_modules\": [{}]}}", list)).unwrap();
}

#[test]
fn test_new_application_is_not_initialized() {
    let temp_dir = tempdir().unwrap();
    let app = Application::new(settings(&temp_dir, false));

    assert!(!app.is_initialized());
    assert!(!app.host().is_web());
    assert_eq!(app.config().app_config_path(), temp_dir.path().join("config"));
    assert_eq!(app.modules().module_paths(), &[temp_dir.path().join("modules")]);
}

#[test]
fn test_bootstrap_loads_enabled_modules() -> Result<()> {
    let temp_dir = tempdir().unwrap();
    install(&temp_dir, "audit", Some("[[hook]]\nname = \"AuditLog\"\n"));
    install(&temp_dir, "graphs", None);
    enable(&temp_dir, &["audit", "ghost"]);

    let mut app = Application::new(settings(&temp_dir, true));
    let loaded = app.bootstrap()?;

    assert!(app.is_initialized());
    assert_eq!(loaded, vec!["audit"]);
    assert_eq!(app.modules().installed_modules(), vec!["audit", "graphs"]);
    assert!(app.modules().has_loaded("audit"));
    assert!(!app.modules().has_loaded("graphs"));
    assert!(app.host().hooks().has("AuditLog"));
    assert!(app.host().router().has_route("audit_jsprovider"));
    Ok(())
}

#[test]
fn test_bootstrap_twice_fails() -> Result<()> {
    let temp_dir = tempdir().unwrap();
    let mut app = Application::new(settings(&temp_dir, false));
    app.bootstrap()?;

    match app.bootstrap() {
        Err(Error::LifecycleError { phase, source, .. }) => {
            assert_eq!(phase, LifecyclePhase::Configure);
            assert!(source.is_none());
        }
        other => panic!("Expected LifecycleError, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_bootstrap_reports_unreadable_module_state() {
    let temp_dir = tempdir().unwrap();
    let config_dir = temp_dir.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("modules.json"), "{ not json").unwrap();

    let mut app = Application::new(settings(&temp_dir, false));
    match app.bootstrap() {
        Err(Error::LifecycleError { phase, source, .. }) => {
            assert_eq!(phase, LifecyclePhase::Configure);
            assert!(source.is_some());
        }
        other => panic!("Expected LifecycleError, got {:?}", other),
    }
    assert!(!app.is_initialized());
}

#[test]
fn test_enable_and_autoload_module() -> Result<()> {
    let temp_dir = tempdir().unwrap();
    install(&temp_dir, "graphs", Some("[[permission]]\nname = \"graphs/view\"\ndescription = \"View graphs\"\n"));

    let mut app = Application::new(settings(&temp_dir, false));
    app.bootstrap()?;
    assert!(app.modules().loaded_modules().is_empty());

    app.enable_module("graphs")?;
    let (module, _host) = app.module_mut("graphs", true)?;
    assert!(module.is_registered());
    assert_eq!(module.version(), "1.0.0");

    let stored = fs::read_to_string(temp_dir.path().join("config/modules.json")).unwrap();
    assert!(stored.contains("graphs"));

    app.disable_module("graphs")?;
    assert!(!app.modules().has_enabled("graphs"));
    Ok(())
}

#[test]
fn test_discover_does_not_load() -> Result<()> {
    let temp_dir = tempdir().unwrap();
    install(&temp_dir, "graphs", None);
    enable(&temp_dir, &["graphs"]);

    let mut app = Application::new(settings(&temp_dir, false));
    app.discover()?;

    assert!(app.modules().has_installed("graphs"));
    assert!(app.modules().has_enabled("graphs"));
    assert!(!app.modules().has_loaded("graphs"));
    assert!(!app.is_initialized());
    Ok(())
}
