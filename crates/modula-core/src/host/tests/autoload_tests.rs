use std::path::{Path, PathBuf};

use crate::host::autoload::ClassLoader;

#[test]
fn test_resolve_prefers_most_specific_namespace() {
    let mut loader = ClassLoader::new();
    loader.register_namespace("Modula::Module", Path::new("/lib/modules"), None);
    loader.register_namespace(
        "Modula::Module::Monitoring",
        Path::new("/modules/monitoring/library/Monitoring"),
        Some(Path::new("/modules/monitoring/application")),
    );

    let mapping = loader.resolve("Modula::Module::Monitoring::Backend").unwrap();
    assert_eq!(mapping.namespace, "Modula::Module::Monitoring");
    assert_eq!(mapping.application_dir.as_deref(), Some(Path::new("/modules/monitoring/application")));

    let fallback = loader.resolve("Modula::Module::Other::Thing").unwrap();
    assert_eq!(fallback.namespace, "Modula::Module");

    // A namespace only matches on a segment boundary
    assert!(loader.resolve("Modula::ModuleX::Thing").is_none());
    assert!(loader.resolve("Modula::Module").is_none());
}

#[test]
fn test_class_path_follows_segments() {
    let mut loader = ClassLoader::new();
    loader.register_namespace("Modula::Module::Setup", Path::new("/modules/setup/library/Setup"), None);

    assert_eq!(
        loader.class_path("Modula::Module::Setup::Steps::DatabaseStep"),
        Some(PathBuf::from("/modules/setup/library/Setup/Steps/DatabaseStep"))
    );
    assert_eq!(loader.class_path("Other::Class"), None);
}

#[test]
fn test_register_same_namespace_replaces() {
    let mut loader = ClassLoader::new();
    loader.register_namespace("Modula::Module::Test::", Path::new("/old"), None);
    loader.register_namespace("Modula::Module::Test", Path::new("/new"), None);

    assert!(loader.has_namespace("Modula::Module::Test"));
    assert_eq!(loader.namespaces().len(), 1);
    assert_eq!(loader.namespaces()[0].library_dir, PathBuf::from("/new"));
}
