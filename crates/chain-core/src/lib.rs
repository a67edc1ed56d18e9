//! Plugin chain resolution for Plugin Chain.
//!
//! [`BackendBuilder`] turns a sparse request ("plugins A and B") into a
//! complete, ordered plugin chain: missing needs are pulled in, virtual
//! plugins are resolved to providers and ordering constraints are applied.
//! [`MountBackendBuilder`] and [`GlobalPluginsBuilder`] hand the resolved
//! chain to a backend that validates and serializes it.

pub mod backend;
pub mod builder;
pub mod constants;
pub mod error;
pub mod global_builder;
pub mod keyset;
pub mod metadata;
pub mod mount_builder;

pub use backend::{
    BackendFactory, BackendInterface, DefaultBackendFactory, GlobalPlugins, MountBackend,
    MountBackendInterface, SerializeInterface,
};
pub use builder::{BackendBuilder, BackendBuilderInit};
pub use constants::{DEFAULT_ITERATION_LIMIT, GLOBAL_PLUGINS_PATH, MOUNTPOINTS_PATH};
pub use error::{Error, Result};
pub use global_builder::GlobalPluginsBuilder;
pub use keyset::KeySet;
pub use metadata::normalize_metadata;
pub use mount_builder::MountBackendBuilder;
