//! Plugin databases.
//!
//! The chain builder never inspects plugins itself, it asks a
//! [`PluginDatabase`]. Two implementations are provided:
//! [`ManifestPluginDatabase`] reads manifests from a plugin directory and
//! [`MemoryPluginDatabase`] holds manifests registered in code.

mod manifest;
mod memory;

pub use manifest::ManifestPluginDatabase;
pub use memory::MemoryPluginDatabase;

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::manifest::PluginManifest;
use crate::spec::PluginSpec;

/// The infos a plugin database can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoKey {
    Provides,
    Needs,
    Recommends,
    Ordering,
    Metadata,
    Plugins,
    Description,
    Version,
}

impl InfoKey {
    /// Every info key, in display order.
    pub const ALL: [InfoKey; 8] = [
        InfoKey::Description,
        InfoKey::Version,
        InfoKey::Provides,
        InfoKey::Needs,
        InfoKey::Recommends,
        InfoKey::Ordering,
        InfoKey::Metadata,
        InfoKey::Plugins,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InfoKey::Provides => "provides",
            InfoKey::Needs => "needs",
            InfoKey::Recommends => "recommends",
            InfoKey::Ordering => "ordering",
            InfoKey::Metadata => "metadata",
            InfoKey::Plugins => "plugins",
            InfoKey::Description => "description",
            InfoKey::Version => "version",
        }
    }
}

impl fmt::Display for InfoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InfoKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        InfoKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown info key '{}'", s))
    }
}

/// Availability of a plugin name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginStatus {
    /// An installed plugin carries this name.
    Real,
    /// No plugin carries this name, but at least one provides it.
    Provides,
    /// Nothing installed answers to this name.
    Missing,
}

/// Read-only oracle answering the questions the chain builder asks.
///
/// All queries are synchronous and side-effect free.
pub trait PluginDatabase: Send + Sync {
    /// Whitespace separated value of an info of `plugin`, empty if undeclared.
    ///
    /// Fails with [`Error::PluginNotFound`] if the plugin is not installed.
    fn lookup_info(&self, plugin: &PluginSpec, key: InfoKey) -> Result<String>;

    /// The concrete plugin behind `name`.
    ///
    /// Returns `name` itself, without configuration, if it is an installed
    /// plugin. Otherwise returns the preferred provider together with its
    /// default configuration.
    fn lookup_provides(&self, name: &str) -> Result<PluginSpec>;

    /// The preferred plugin handling `metadata`.
    fn lookup_metadata(&self, metadata: &str) -> Result<PluginSpec>;

    /// Availability of the plugin named by `plugin`.
    fn status(&self, plugin: &PluginSpec) -> PluginStatus;

    /// [`lookup_info`](Self::lookup_info) split into tokens.
    fn lookup_tokens(&self, plugin: &PluginSpec, key: InfoKey) -> Result<Vec<String>> {
        Ok(self
            .lookup_info(plugin, key)?
            .split_whitespace()
            .map(str::to_string)
            .collect())
    }
}

/// Pick the preferred manifest: highest priority, then smallest name.
pub(crate) fn preferred<'a>(
    candidates: impl Iterator<Item = &'a PluginManifest>,
) -> Option<&'a PluginManifest> {
    candidates.min_by(|a, b| {
        b.priority()
            .cmp(&a.priority())
            .then_with(|| a.name().cmp(b.name()))
    })
}

pub(crate) fn not_found(name: &str) -> Error {
    Error::PluginNotFound {
        name: name.to_string(),
    }
}
