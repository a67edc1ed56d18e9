//! Builder for mounted backends.

use std::ops::{Deref, DerefMut};

use crate::backend::{MountBackendInterface, has_role};
use crate::builder::{BackendBuilder, BackendBuilderInit};
use crate::constants::RESOLVER_ROLE;
use crate::error::Result;
use crate::keyset::KeySet;

/// A [`BackendBuilder`] that also knows where and from which file its
/// backend is mounted.
///
/// Every check creates a fresh backend through the builder's factory and
/// fills it with the current chain, so the builder itself never holds a
/// half-assembled backend.
#[derive(Debug)]
pub struct MountBackendBuilder {
    builder: BackendBuilder,
    mountpoint: String,
    mount_conf: KeySet,
    backend_conf: KeySet,
    config_file: String,
}

impl MountBackendBuilder {
    pub fn new(init: &BackendBuilderInit) -> Self {
        Self {
            builder: BackendBuilder::new(init),
            mountpoint: String::new(),
            mount_conf: KeySet::new(),
            backend_conf: KeySet::new(),
            config_file: String::new(),
        }
    }

    /// Mount at `mountpoint`, given the configuration of existing mounts.
    ///
    /// The mountpoint is checked against a fresh backend first and only
    /// stored if it is accepted.
    pub fn set_mountpoint(&mut self, mountpoint: impl Into<String>, mount_conf: KeySet) -> Result<()> {
        let mountpoint = mountpoint.into();
        let mut backend = self.builder.factory().create();
        backend.set_mountpoint(&mountpoint, &mount_conf)?;

        self.mountpoint = mountpoint;
        self.mount_conf = mount_conf;
        Ok(())
    }

    pub fn mountpoint(&self) -> &str {
        &self.mountpoint
    }

    pub fn set_backend_config(&mut self, config: KeySet) {
        self.backend_conf = config;
    }

    pub fn backend_config(&self) -> &KeySet {
        &self.backend_conf
    }

    /// Use `file` as config file.
    ///
    /// The file is remembered in any case. It is only checked if the chain
    /// already holds a resolver, since without one there is nothing to
    /// check it against yet.
    pub fn use_config_file(&mut self, file: impl Into<String>) -> Result<()> {
        self.config_file = file.into();

        let database = self.builder.database().as_ref();
        let mut check_possible = false;
        for plugin in self.builder.iter() {
            if has_role(database, plugin, RESOLVER_ROLE)? {
                check_possible = true;
                break;
            }
        }
        if !check_possible {
            return Ok(());
        }

        let mut backend = self.builder.factory().create();
        self.builder.fill_plugins(backend.as_mut())?;
        backend.use_config_file(&self.config_file)
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Status of the assembled backend. Assembly failures are reported in
    /// the returned text instead of being returned as errors.
    pub fn status(&self) -> String {
        let status = self.assemble().map(|backend| backend.status());
        match status {
            Ok(status) => status,
            Err(e) => format!("Could not successfully add plugin: {}", e),
        }
    }

    /// Whether the assembled backend is complete. Assembly failures count as
    /// not validated.
    pub fn validated(&self) -> bool {
        self.assemble().is_ok_and(|backend| backend.validated())
    }

    /// Write the backend with mountpoint, backend config and config file
    /// into `ret`.
    pub fn serialize(&self, ret: &mut KeySet) -> Result<()> {
        let mut backend = self.assemble()?;
        backend.set_mountpoint(&self.mountpoint, &self.mount_conf)?;
        backend.set_backend_config(&self.backend_conf);
        backend.use_config_file(&self.config_file)?;
        backend.serialize(ret)
    }

    fn assemble(&self) -> Result<Box<dyn MountBackendInterface>> {
        let mut backend = self.builder.factory().create();
        self.builder.fill_plugins(backend.as_mut())?;
        Ok(backend)
    }
}

impl Deref for MountBackendBuilder {
    type Target = BackendBuilder;

    fn deref(&self) -> &Self::Target {
        &self.builder
    }
}

impl DerefMut for MountBackendBuilder {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.builder
    }
}
