//! In-memory plugin database.

use std::collections::HashMap;

use super::{InfoKey, PluginDatabase, PluginStatus, not_found, preferred};
use crate::error::{Error, Result};
use crate::manifest::PluginManifest;
use crate::spec::PluginSpec;

/// Plugin database over manifests registered in code.
///
/// # Example
///
/// ```
/// use chain_meta::{MemoryPluginDatabase, PluginDatabase, PluginManifest};
///
/// let mut database = MemoryPluginDatabase::new();
/// database.register(PluginManifest::new("dump").with_provides(&["storage"]));
///
/// let provider = database.lookup_provides("storage").unwrap();
/// assert_eq!(provider.name(), "dump");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryPluginDatabase {
    plugins: HashMap<String, PluginManifest>,
}

impl MemoryPluginDatabase {
    /// Create a new empty database.
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
        }
    }

    /// Register a plugin. A plugin with the same name is replaced.
    pub fn register(&mut self, manifest: PluginManifest) {
        self.plugins.insert(manifest.name().to_string(), manifest);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, manifest: PluginManifest) -> Self {
        self.register(manifest);
        self
    }

    /// Look up a manifest by plugin name.
    pub fn get(&self, name: &str) -> Option<&PluginManifest> {
        self.plugins.get(name)
    }

    /// Check if a plugin with this name is installed.
    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// All installed plugin names (sorted).
    pub fn plugin_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.plugins.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of installed plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether the database is empty.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl PluginDatabase for MemoryPluginDatabase {
    fn lookup_info(&self, plugin: &PluginSpec, key: InfoKey) -> Result<String> {
        self.plugins
            .get(plugin.name())
            .map(|manifest| manifest.info(key))
            .ok_or_else(|| not_found(plugin.name()))
    }

    fn lookup_provides(&self, name: &str) -> Result<PluginSpec> {
        if self.plugins.contains_key(name) {
            return PluginSpec::new(name);
        }

        preferred(self.plugins.values().filter(|m| m.provides(name)))
            .ok_or_else(|| not_found(name))?
            .default_spec()
    }

    fn lookup_metadata(&self, metadata: &str) -> Result<PluginSpec> {
        let manifest = preferred(self.plugins.values().filter(|m| m.handles_metadata(metadata)))
            .ok_or_else(|| Error::NoMetadataProvider {
                metadata: metadata.to_string(),
            })?;
        PluginSpec::new(manifest.name())
    }

    fn status(&self, plugin: &PluginSpec) -> PluginStatus {
        if self.plugins.contains_key(plugin.name()) {
            PluginStatus::Real
        } else if self.plugins.values().any(|m| m.provides(plugin.name())) {
            PluginStatus::Provides
        } else {
            PluginStatus::Missing
        }
    }
}
