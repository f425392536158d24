use crate::AdapterPlugin;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use vigil_types::PluginMetadata;

type Constructor = fn() -> Arc<dyn AdapterPlugin>;

/// Maps adapter name to a live instance, plus the constructor used to build
/// or rebuild it.
///
/// Kept as a runtime map rather than a `const` table so an embedding
/// consumer can register or replace adapters at startup — the compiled-target
/// equivalent of the "hot-reloadable user directory" half of discovery
/// described for a dynamic-import host.
pub struct Registry {
    entries: HashMap<&'static str, (Constructor, Arc<dyn AdapterPlugin>)>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Construct a registry with all 27 built-in adapters registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::adapters::register_builtin(&mut registry);
        registry
    }

    /// Register (or override) an adapter under its own metadata name.
    ///
    /// Last registration wins: registering the same name twice replaces the
    /// previous entry outright.
    pub fn register(&mut self, ctor: Constructor) {
        let instance = ctor();
        let name = instance.metadata().name;
        self.entries.insert(name, (ctor, instance));
    }

    /// Replace an existing entry's constructor and rebuild its instance.
    ///
    /// If `name` is not currently registered, the registry is left
    /// unchanged and `Err` is returned — mirroring "reload failure leaves
    /// the registry unchanged".
    pub fn reload(&mut self, name: &str, ctor: Constructor) -> Result<()> {
        if !self.entries.contains_key(name) {
            return Err(Error::UnknownAdapter(name.to_string()));
        }
        self.register(ctor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AdapterPlugin>> {
        self.entries.get(name).map(|(_, instance)| instance.clone())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }

    pub fn metadata(&self, name: &str) -> Option<&'static PluginMetadata> {
        self.entries.get(name).map(|(_, instance)| instance.metadata())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_register_all_27_adapters() {
        let registry = Registry::with_builtins();
        assert_eq!(registry.len(), 27);
    }

    #[test]
    fn duplicate_registration_overrides_last_wins() {
        let mut registry = Registry::new();
        registry.register(crate::adapters::bandit::construct);
        registry.register(crate::adapters::bandit::construct);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn reload_unknown_adapter_fails_without_mutating() {
        let mut registry = Registry::new();
        registry.register(crate::adapters::bandit::construct);
        let result = registry.reload("does-not-exist", crate::adapters::bandit::construct);
        assert!(result.is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn get_unknown_returns_none() {
        let registry = Registry::with_builtins();
        assert!(registry.get("nonexistent-tool").is_none());
    }
}
