//! Plugin manifest parsing for `<plugin>.toml` files.
//!
//! A manifest declares what a plugin is, what it needs from the rest of the
//! chain and which configuration it brings along when it is chosen as the
//! provider of a virtual plugin.
//!
//! # Example TOML
//!
//! ```toml
//! [plugin]
//! name = "dump"
//! version = "1.0.0"
//! description = "Dumps complete key sets into a file"
//! priority = 10
//!
//! [infos]
//! provides = ["storage"]
//! needs = ["resolver"]
//! recommends = ["sync"]
//! ordering = ["glob"]
//! metadata = ["check/type"]
//! plugins = "base64 encoding=binary"
//!
//! [config]
//! format = "dump"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::args::parse_arguments;
use crate::database::InfoKey;
use crate::error::{Error, Result};
use crate::spec::{PluginConfig, PluginSpec, validate_name};

/// Complete plugin manifest.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PluginManifest {
    /// Core plugin metadata.
    pub plugin: PluginMeta,
    /// Dependency and ordering declarations.
    #[serde(default)]
    pub infos: PluginInfos,
    /// Default configuration handed out with the plugin when it resolves a
    /// virtual plugin name.
    #[serde(default)]
    pub config: PluginConfig,
}

/// Basic metadata about a plugin.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginMeta {
    /// Plugin name (e.g., "dump").
    pub name: String,
    /// Semver version string.
    pub version: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Preference among plugins providing the same name or metadata; higher wins.
    #[serde(default)]
    pub priority: i32,
}

/// Declarations the chain builder resolves.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PluginInfos {
    /// Virtual plugin names this plugin implements.
    #[serde(default)]
    pub provides: Vec<String>,
    /// Plugins (or provided names) that must be part of the same chain.
    #[serde(default)]
    pub needs: Vec<String>,
    /// Plugins that should be part of the chain if available.
    #[serde(default)]
    pub recommends: Vec<String>,
    /// Plugins (or provided names) this plugin must be placed before.
    #[serde(default)]
    pub ordering: Vec<String>,
    /// Metadata this plugin handles.
    #[serde(default)]
    pub metadata: Vec<String>,
    /// Plugin argument string added right away when the chain is resolved.
    #[serde(default)]
    pub plugins: String,
}

impl PluginManifest {
    /// Create a manifest with version `1.0.0` and no declarations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            plugin: PluginMeta {
                name: name.into(),
                version: "1.0.0".to_string(),
                description: None,
                priority: 0,
            },
            infos: PluginInfos::default(),
            config: PluginConfig::new(),
        }
    }

    /// Parse a plugin manifest from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read and parse a plugin manifest from a file path.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ManifestNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Serialize the manifest back to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::ManifestSerialize(e.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.plugin.name
    }

    pub fn priority(&self) -> i32 {
        self.plugin.priority
    }

    /// The declared value of one info as a whitespace separated string.
    pub fn info(&self, key: InfoKey) -> String {
        match key {
            InfoKey::Provides => self.infos.provides.join(" "),
            InfoKey::Needs => self.infos.needs.join(" "),
            InfoKey::Recommends => self.infos.recommends.join(" "),
            InfoKey::Ordering => self.infos.ordering.join(" "),
            InfoKey::Metadata => self.infos.metadata.join(" "),
            InfoKey::Plugins => self.infos.plugins.clone(),
            InfoKey::Description => self.plugin.description.clone().unwrap_or_default(),
            InfoKey::Version => self.plugin.version.clone(),
        }
    }

    /// Whether the plugin declares `name` in its provides list.
    pub fn provides(&self, name: &str) -> bool {
        self.infos.provides.iter().any(|p| p == name)
    }

    /// Whether the plugin declares it handles `metadata`.
    pub fn handles_metadata(&self, metadata: &str) -> bool {
        self.infos.metadata.iter().any(|m| m == metadata)
    }

    /// Spec for this plugin carrying its default configuration.
    pub fn default_spec(&self) -> Result<PluginSpec> {
        Ok(PluginSpec::new(self.name())?.with_config(self.config.clone()))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.plugin.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.plugin.priority = priority;
        self
    }

    pub fn with_provides(mut self, names: &[&str]) -> Self {
        self.infos.provides = to_strings(names);
        self
    }

    pub fn with_needs(mut self, names: &[&str]) -> Self {
        self.infos.needs = to_strings(names);
        self
    }

    pub fn with_recommends(mut self, names: &[&str]) -> Self {
        self.infos.recommends = to_strings(names);
        self
    }

    pub fn with_ordering(mut self, names: &[&str]) -> Self {
        self.infos.ordering = to_strings(names);
        self
    }

    pub fn with_metadata(mut self, metadata: &[&str]) -> Self {
        self.infos.metadata = to_strings(metadata);
        self
    }

    pub fn with_plugins(mut self, arguments: impl Into<String>) -> Self {
        self.infos.plugins = arguments.into();
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Validate the manifest fields.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.plugin.name)?;

        semver::Version::parse(&self.plugin.version).map_err(|e| Error::InvalidVersion {
            version: self.plugin.version.clone(),
            source: e,
        })?;

        let named_lists = [
            (InfoKey::Provides, &self.infos.provides),
            (InfoKey::Needs, &self.infos.needs),
            (InfoKey::Recommends, &self.infos.recommends),
            (InfoKey::Ordering, &self.infos.ordering),
        ];
        for (key, values) in named_lists {
            for value in values {
                validate_name(value).map_err(|_| self.invalid_info(key, value))?;
            }
        }

        // metadata identifiers are key paths; array parts must be a bare `#`
        for value in &self.infos.metadata {
            if value.is_empty()
                || value.chars().any(char::is_whitespace)
                || has_array_index(value)
            {
                return Err(self.invalid_info(InfoKey::Metadata, value));
            }
        }

        parse_arguments(&self.infos.plugins)?;

        Ok(())
    }

    fn invalid_info(&self, key: InfoKey, value: &str) -> Error {
        Error::InvalidInfo {
            plugin: self.plugin.name.clone(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Whether `metadata` names a concrete array index such as `#0` or `#_10`.
fn has_array_index(metadata: &str) -> bool {
    metadata
        .match_indices('#')
        .any(|(i, _)| matches!(metadata[i + 1..].chars().next(), Some('_' | '0'..='9')))
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
