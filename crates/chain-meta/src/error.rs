//! Error types for chain-meta

use std::path::PathBuf;

/// Result type for chain-meta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while describing or looking up plugins.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to parse a plugin manifest.
    #[error("failed to parse plugin manifest: {0}")]
    ManifestParse(#[from] toml::de::Error),

    /// Plugin manifest file not found at the expected path.
    #[error("plugin manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    /// Failed to serialize a plugin manifest.
    #[error("failed to serialize plugin manifest: {0}")]
    ManifestSerialize(String),

    /// Invalid semver version string.
    #[error("invalid version '{version}': {source}")]
    InvalidVersion {
        version: String,
        source: semver::Error,
    },

    /// Invalid plugin or reference name.
    #[error("invalid plugin name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// A manifest info entry cannot be expressed as a token list.
    #[error("invalid '{key}' entry '{value}' in plugin '{plugin}'")]
    InvalidInfo {
        plugin: String,
        key: String,
        value: String,
    },

    /// A `key=value` argument appeared before any plugin name.
    #[error("config '{token}' given before any plugin name")]
    ConfigWithoutPlugin { token: String },

    /// A config entry is not of the form `key=value`.
    #[error("malformed config entry '{entry}', expected key=value")]
    InvalidConfigEntry { entry: String },

    /// No installed plugin has this name and none provides it.
    #[error("plugin not found: {name}")]
    PluginNotFound { name: String },

    /// No installed plugin declares the requested metadata.
    #[error("no plugin provides metadata '{metadata}'")]
    NoMetadataProvider { metadata: String },

    /// I/O error reading plugin manifests.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
