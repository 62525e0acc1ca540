use std::collections::BTreeMap;

use log::debug;

/// One hook implementation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookRegistration {
    pub key: String,
    pub class: String,
    pub always_run: bool,
}

/// Hook implementations by hook name
#[derive(Debug, Default)]
pub struct HookRegistry {
    hooks: BTreeMap<String, Vec<HookRegistration>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an implementation. A registration with the same key replaces the earlier one.
    pub fn register(&mut self, hook: &str, key: &str, class: &str, always_run: bool) {
        debug!("Registering {} for hook {}", class, hook);
        let registration = HookRegistration {
            key: key.to_string(),
            class: class.to_string(),
            always_run,
        };
        let entries = self.hooks.entry(hook.to_string()).or_default();
        match entries.iter_mut().find(|r| r.key == key) {
            Some(existing) => *existing = registration,
            None => entries.push(registration),
        }
    }

    pub fn has(&self, hook: &str) -> bool {
        self.hooks.get(hook).is_some_and(|r| !r.is_empty())
    }

    pub fn implementations(&self, hook: &str) -> &[HookRegistration] {
        self.hooks.get(hook).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn hook_names(&self) -> impl Iterator<Item = &str> {
        self.hooks.keys().map(String::as_str)
    }
}
