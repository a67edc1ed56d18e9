#![allow(dead_code)]

use std::sync::Arc;

use chain_core::{BackendBuilder, BackendBuilderInit};
use chain_meta::{MemoryPluginDatabase, PluginManifest, PluginSpec};

/// A small but complete plugin landscape: one resolver, two storages, a
/// few helpers with needs, recommends and ordering constraints.
pub fn standard_database() -> MemoryPluginDatabase {
    MemoryPluginDatabase::new()
        .with(PluginManifest::new("resolver").with_provides(&["resolver"]))
        .with(
            PluginManifest::new("dump")
                .with_provides(&["storage"])
                .with_needs(&["resolver"])
                .with_priority(10)
                .with_config("format", "dump"),
        )
        .with(
            PluginManifest::new("ini")
                .with_provides(&["storage"])
                .with_needs(&["resolver"])
                .with_recommends(&["sync"])
                .with_config("delimiter", "="),
        )
        .with(PluginManifest::new("sync").with_ordering(&["resolver"]))
        .with(
            PluginManifest::new("type")
                .with_provides(&["check"])
                .with_metadata(&["check/type"]),
        )
        .with(
            PluginManifest::new("array")
                .with_metadata(&["check/#/min", "array/#"]),
        )
}

pub fn init(database: MemoryPluginDatabase) -> BackendBuilderInit {
    BackendBuilderInit::new(Arc::new(database))
}

pub fn builder(database: MemoryPluginDatabase) -> BackendBuilder {
    BackendBuilder::new(&init(database))
}

pub fn spec(name: &str) -> PluginSpec {
    PluginSpec::new(name).unwrap()
}

pub fn chain(builder: &BackendBuilder) -> Vec<String> {
    builder.iter().map(PluginSpec::full_name).collect()
}
