//! # Host collaborators
//!
//! Modules never talk to the web frontend directly. They hand their
//! contributions to the collaborators collected in [`Host`]:
//!
//! - [`ClassLoader`](autoload::ClassLoader): namespace to directory mappings
//! - [`HookRegistry`](hook::HookRegistry): hook implementations
//! - [`Router`](router::Router): named routes and controller directories
//! - [`TranslationRegistry`](locale::TranslationRegistry): translation
//!   directories per text domain, only present when translations are enabled
//!
//! A host that is not a web host ignores web integration entirely.
pub mod autoload;
pub mod hook;
pub mod locale;
pub mod router;

pub use autoload::{ClassLoader, NamespaceMapping};
pub use hook::{HookRegistration, HookRegistry};
pub use locale::TranslationRegistry;
pub use router::{Route, Router};

/// The collaborators modules register themselves with
#[derive(Debug, Default)]
pub struct Host {
    web: bool,
    loader: ClassLoader,
    hooks: HookRegistry,
    router: Router,
    translator: Option<TranslationRegistry>,
}

impl Host {
    /// A host serving web requests, with a translation registry
    pub fn web() -> Self {
        Self {
            web: true,
            translator: Some(TranslationRegistry::new()),
            ..Self::default()
        }
    }

    /// A host for command line use; web integration is skipped
    pub fn cli() -> Self {
        Self::default()
    }

    pub fn is_web(&self) -> bool {
        self.web
    }

    /// Replace or remove the translation registry
    pub fn set_translator(&mut self, translator: Option<TranslationRegistry>) {
        self.translator = translator;
    }

    pub fn loader(&self) -> &ClassLoader {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut ClassLoader {
        &mut self.loader
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    pub fn translator(&self) -> Option<&TranslationRegistry> {
        self.translator.as_ref()
    }

    pub fn translator_mut(&mut self) -> Option<&mut TranslationRegistry> {
        self.translator.as_mut()
    }
}

#[cfg(test)]
mod tests;
