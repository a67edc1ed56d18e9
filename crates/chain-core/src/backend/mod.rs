//! Backend assembly targets.
//!
//! A builder only decides which plugins form a chain and in which order. The
//! targets in this module receive that chain, check it and write it into a
//! [`KeySet`].

mod global;
mod mount;

pub use global::GlobalPlugins;
pub use mount::{MountBackend, validate_mountpoint};

use std::sync::Arc;

use chain_meta::{InfoKey, PluginDatabase, PluginSpec};

use crate::Result;
use crate::keyset::KeySet;

/// Receives plugins in chain order.
pub trait BackendInterface {
    /// Append `plugin` to the backend.
    fn add_plugin(&mut self, plugin: &PluginSpec) -> Result<()>;
}

/// Writes a backend into its persisted key/value form.
pub trait SerializeInterface {
    fn serialize(&self, ret: &mut KeySet) -> Result<()>;
}

/// A backend bound to a mountpoint.
pub trait MountBackendInterface: BackendInterface + SerializeInterface {
    /// Bind the backend to `mountpoint`.
    ///
    /// `mount_conf` holds the configuration of already mounted backends and
    /// is used to reject mountpoints that are taken.
    fn set_mountpoint(&mut self, mountpoint: &str, mount_conf: &KeySet) -> Result<()>;

    fn mountpoint(&self) -> &str;

    /// Configuration shared by all plugins of the backend.
    fn set_backend_config(&mut self, config: &KeySet);

    /// Use `file` as the backend's config file.
    fn use_config_file(&mut self, file: &str) -> Result<()>;

    /// Whether the backend holds everything it needs to be mounted.
    fn validated(&self) -> bool;

    /// Human readable description of what is missing, if anything.
    fn status(&self) -> String;
}

/// Whether `plugin` fills `role` in a backend, by its name or through its
/// "provides" info.
pub fn has_role(database: &dyn PluginDatabase, plugin: &PluginSpec, role: &str) -> Result<bool> {
    if plugin.name() == role {
        return Ok(true);
    }
    let provides = database.lookup_tokens(plugin, InfoKey::Provides)?;
    Ok(provides.iter().any(|p| p == role))
}

/// Creates fresh backends for the mount builder.
pub trait BackendFactory: Send + Sync {
    fn create(&self) -> Box<dyn MountBackendInterface>;
}

/// Factory for [`MountBackend`]s over one plugin database.
#[derive(Clone)]
pub struct DefaultBackendFactory {
    database: Arc<dyn PluginDatabase>,
}

impl DefaultBackendFactory {
    pub fn new(database: Arc<dyn PluginDatabase>) -> Self {
        Self { database }
    }
}

impl BackendFactory for DefaultBackendFactory {
    fn create(&self) -> Box<dyn MountBackendInterface> {
        Box::new(MountBackend::new(Arc::clone(&self.database)))
    }
}
