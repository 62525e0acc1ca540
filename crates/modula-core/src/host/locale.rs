use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;

/// Translation directories by text domain
#[derive(Debug, Default)]
pub struct TranslationRegistry {
    directories: BTreeMap<String, PathBuf>,
}

impl TranslationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_translation_directory(&mut self, dir: &Path, domain: &str) {
        debug!("Adding translation directory {} for domain {}", dir.display(), domain);
        self.directories.insert(domain.to_string(), dir.to_path_buf());
    }

    pub fn directory(&self, domain: &str) -> Option<&Path> {
        self.directories.get(domain).map(PathBuf::as_path)
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.directories.keys().map(String::as_str)
    }

    /// Translate a message. Catalogs are not loaded, so this returns the message itself.
    pub fn translate<'a>(&self, message: &'a str, _domain: &str) -> &'a str {
        message
    }
}
