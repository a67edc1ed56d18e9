//! Builder for global plugins.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::backend::{GlobalPlugins, SerializeInterface};
use crate::builder::{BackendBuilder, BackendBuilderInit};
use crate::error::Result;
use crate::keyset::KeySet;

/// A [`BackendBuilder`] for the chain of global plugins, serialized below
/// [`GLOBAL_PLUGINS_PATH`](crate::GLOBAL_PLUGINS_PATH).
#[derive(Debug)]
pub struct GlobalPluginsBuilder {
    builder: BackendBuilder,
}

impl GlobalPluginsBuilder {
    pub fn new(init: &BackendBuilderInit) -> Self {
        Self {
            builder: BackendBuilder::new(init),
        }
    }

    pub fn serialize(&self, ret: &mut KeySet) -> Result<()> {
        let mut global = GlobalPlugins::new(Arc::clone(self.builder.database()));
        self.builder.fill_plugins(&mut global)?;
        global.serialize(ret)
    }
}

impl Deref for GlobalPluginsBuilder {
    type Target = BackendBuilder;

    fn deref(&self) -> &Self::Target {
        &self.builder
    }
}

impl DerefMut for GlobalPluginsBuilder {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.builder
    }
}
