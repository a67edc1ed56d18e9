//! Plugin metadata for Plugin Chain.
//!
//! This crate provides the [`PluginSpec`] value type that names one slot in a
//! backend's plugin chain, the TOML manifests plugins are described by, and
//! the [`PluginDatabase`] trait the chain builder queries while resolving
//! dependencies.

pub mod args;
pub mod database;
pub mod error;
pub mod manifest;
pub mod spec;

/// File extension of plugin manifests inside a plugin directory.
pub const MANIFEST_EXTENSION: &str = "toml";

pub use args::{parse_arguments, parse_config};
pub use database::{
    InfoKey, ManifestPluginDatabase, MemoryPluginDatabase, PluginDatabase, PluginStatus,
};
pub use error::{Error, Result};
pub use manifest::{PluginInfos, PluginManifest, PluginMeta};
pub use spec::{PluginConfig, PluginSpec};
