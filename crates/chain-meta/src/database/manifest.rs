//! Plugin database backed by a directory of manifests.
//!
//! ```text
//! plugins/
//!   dump.toml
//!   ini.toml
//!   resolver.toml
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use super::{InfoKey, MemoryPluginDatabase, PluginDatabase, PluginStatus};
use crate::MANIFEST_EXTENSION;
use crate::error::Result;
use crate::manifest::PluginManifest;
use crate::spec::PluginSpec;

/// Plugin database loaded from `*.toml` manifests in one directory.
#[derive(Debug, Clone)]
pub struct ManifestPluginDatabase {
    root: PathBuf,
    plugins: MemoryPluginDatabase,
}

impl ManifestPluginDatabase {
    /// Load every manifest below `root`.
    ///
    /// A missing directory yields an empty database. Manifests that fail to
    /// parse are skipped with a warning so one broken plugin does not hide
    /// all others.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let mut plugins = MemoryPluginDatabase::new();

        if !root.exists() {
            tracing::debug!("Plugin directory {:?} does not exist", root);
            return Ok(Self { root, plugins });
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&root)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == MANIFEST_EXTENSION))
            .collect();
        paths.sort();

        for path in paths {
            match PluginManifest::from_path(&path) {
                Ok(manifest) => {
                    if plugins.contains(manifest.name()) {
                        tracing::warn!(
                            "Plugin '{}' declared again in {:?}, replacing earlier manifest",
                            manifest.name(),
                            path
                        );
                    }
                    plugins.register(manifest);
                }
                Err(e) => {
                    tracing::warn!("Failed to load {:?}: {}", path, e);
                }
            }
        }

        tracing::debug!("Loaded {} plugins from {:?}", plugins.len(), root);
        Ok(Self { root, plugins })
    }

    /// Directory the manifests were loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up a manifest by plugin name.
    pub fn manifest(&self, name: &str) -> Option<&PluginManifest> {
        self.plugins.get(name)
    }

    /// All installed plugin names (sorted).
    pub fn plugin_names(&self) -> Vec<String> {
        self.plugins.plugin_names()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl PluginDatabase for ManifestPluginDatabase {
    fn lookup_info(&self, plugin: &PluginSpec, key: InfoKey) -> Result<String> {
        self.plugins.lookup_info(plugin, key)
    }

    fn lookup_provides(&self, name: &str) -> Result<PluginSpec> {
        self.plugins.lookup_provides(name)
    }

    fn lookup_metadata(&self, metadata: &str) -> Result<PluginSpec> {
        self.plugins.lookup_metadata(metadata)
    }

    fn status(&self, plugin: &PluginSpec) -> PluginStatus {
        self.plugins.status(plugin)
    }
}
