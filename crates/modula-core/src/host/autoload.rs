use std::path::{Path, PathBuf};

use log::debug;

use crate::kernel::constants::NAMESPACE_SEPARATOR;

/// A namespace prefix mapped to its source directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceMapping {
    pub namespace: String,
    pub library_dir: PathBuf,
    pub application_dir: Option<PathBuf>,
}

/// Maps namespaces to directories so module classes can be located
#[derive(Debug, Default)]
pub struct ClassLoader {
    namespaces: Vec<NamespaceMapping>,
}

impl ClassLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a namespace. Registering the same namespace again replaces its directories.
    pub fn register_namespace(&mut self, namespace: &str, library_dir: &Path, application_dir: Option<&Path>) {
        debug!("Registering namespace {} at {}", namespace, library_dir.display());
        let mapping = NamespaceMapping {
            namespace: namespace.trim_end_matches(NAMESPACE_SEPARATOR).to_string(),
            library_dir: library_dir.to_path_buf(),
            application_dir: application_dir.map(Path::to_path_buf),
        };
        match self.namespaces.iter_mut().find(|m| m.namespace == mapping.namespace) {
            Some(existing) => *existing = mapping,
            None => self.namespaces.push(mapping),
        }
    }

    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.namespaces.iter().any(|m| m.namespace == namespace)
    }

    /// The most specific registered namespace containing `class`
    pub fn resolve(&self, class: &str) -> Option<&NamespaceMapping> {
        self.namespaces
            .iter()
            .filter(|m| {
                class
                    .strip_prefix(m.namespace.as_str())
                    .is_some_and(|rest| rest.starts_with(NAMESPACE_SEPARATOR))
            })
            .max_by_key(|m| m.namespace.len())
    }

    /// The file a class would live in: its remaining namespace segments as
    /// directories below the library directory
    pub fn class_path(&self, class: &str) -> Option<PathBuf> {
        let mapping = self.resolve(class)?;
        let relative = &class[mapping.namespace.len() + NAMESPACE_SEPARATOR.len()..];
        let mut path = mapping.library_dir.clone();
        for segment in relative.split(NAMESPACE_SEPARATOR) {
            path.push(segment);
        }
        Some(path)
    }

    pub fn namespaces(&self) -> &[NamespaceMapping] {
        &self.namespaces
    }
}
