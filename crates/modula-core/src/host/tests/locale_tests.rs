use std::path::Path;

use crate::host::locale::TranslationRegistry;
use crate::host::Host;

#[test]
fn test_translation_directories_by_domain() {
    let mut registry = TranslationRegistry::new();
    registry.add_translation_directory(Path::new("/modules/setup/application/locale"), "setup");
    registry.add_translation_directory(Path::new("/modules/audit/application/locale"), "audit");

    assert_eq!(registry.domains().collect::<Vec<_>>(), vec!["audit", "setup"]);
    assert_eq!(
        registry.directory("setup"),
        Some(Path::new("/modules/setup/application/locale"))
    );
    assert_eq!(registry.translate("Module: %s", "setup"), "Module: %s");
}

#[test]
fn test_web_host_has_translator() {
    let web = Host::web();
    assert!(web.is_web());
    assert!(web.translator().is_some());

    let mut cli = Host::cli();
    assert!(!cli.is_web());
    assert!(cli.translator().is_none());
    cli.set_translator(Some(TranslationRegistry::new()));
    assert!(cli.translator_mut().is_some());
}
