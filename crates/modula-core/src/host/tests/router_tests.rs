use std::collections::BTreeMap;
use std::path::Path;

use crate::host::router::{Route, Router};
use crate::kernel::error::Error;
use crate::module_system::error::ModuleSystemError;

fn defaults(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn test_add_route_replaces_by_name() {
    let mut router = Router::new();
    router.add_route("first", Route::static_route("a/:id", BTreeMap::new()));
    router.add_route("second", Route::static_route("b", BTreeMap::new()));
    router.add_route("first", Route::static_route("c", defaults(&[("action", "show")])));

    assert_eq!(router.route_names(), vec!["first", "second"]);
    let route = router.route("first").unwrap();
    assert_eq!(route.pattern(), "c");
    assert_eq!(route.default_value("action"), Some("show"));
    assert_eq!(route.default_value("missing"), None);
    assert!(!router.has_route("third"));
}

#[test]
fn test_regex_route_must_compile() {
    let map: BTreeMap<usize, String> = [(1, "file".to_string())].into_iter().collect();
    let route = Route::regex("img", "img/example/(.+)", BTreeMap::new(), map.clone()).unwrap();
    assert_eq!(route.pattern(), "img/example/(.+)");

    match Route::regex("broken", "img/(.+", BTreeMap::new(), map) {
        Err(Error::ModuleSystem(ModuleSystemError::InvalidRoute { name, .. })) => assert_eq!(name, "broken"),
        other => panic!("Expected InvalidRoute, got {:?}", other),
    }
}

#[test]
fn test_route_serializes_with_type_tag() {
    let route = Route::static_route("js/example/:file", defaults(&[("controller", "static")]));
    let value = serde_json::to_value(&route).unwrap();
    assert_eq!(value["type"], "static");
    assert_eq!(value["pattern"], "js/example/:file");
    assert_eq!(value["defaults"]["controller"], "static");
}

#[test]
fn test_controller_directories() {
    let mut router = Router::new();
    router.add_controller_directory(Path::new("/modules/example/application/controllers"), "example");
    assert_eq!(
        router.controller_directory("example"),
        Some(Path::new("/modules/example/application/controllers"))
    );
    assert!(router.controller_directory("other").is_none());
}
