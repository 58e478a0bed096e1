use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::LanguageConfiguration;

/// Pull-based access to the language configuration of a document.
///
/// The cursor core asks for the configuration every time a command needs it, so a host can
/// swap configurations at any time without notifying anyone.
pub trait LanguageConfigProvider: Send + Sync {
    /// Configuration currently registered for `language_id`, if any.
    fn configuration(&self, language_id: &str) -> Option<Arc<LanguageConfiguration>>;
}

/// A simple in-memory [`LanguageConfigProvider`].
#[derive(Debug, Default)]
pub struct LanguageRegistry {
    configs: RwLock<HashMap<String, Arc<LanguageConfiguration>>>,
}

impl LanguageRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the configuration for `language_id`.
    ///
    /// Returns the previously registered configuration.
    pub fn register(
        &self,
        language_id: impl Into<String>,
        config: LanguageConfiguration,
    ) -> Option<Arc<LanguageConfiguration>> {
        let mut configs = self.configs.write().unwrap_or_else(|e| e.into_inner());
        configs.insert(language_id.into(), Arc::new(config))
    }

    /// Remove the configuration for `language_id`.
    pub fn unregister(&self, language_id: &str) -> Option<Arc<LanguageConfiguration>> {
        let mut configs = self.configs.write().unwrap_or_else(|e| e.into_inner());
        configs.remove(language_id)
    }

    /// Registered language ids, sorted.
    pub fn language_ids(&self) -> Vec<String> {
        let configs = self.configs.read().unwrap_or_else(|e| e.into_inner());
        let mut ids: Vec<String> = configs.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl LanguageConfigProvider for LanguageRegistry {
    fn configuration(&self, language_id: &str) -> Option<Arc<LanguageConfiguration>> {
        let configs = self.configs.read().unwrap_or_else(|e| e.into_inner());
        configs.get(language_id).cloned()
    }
}
