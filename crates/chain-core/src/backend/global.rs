//! Global plugins target.

use std::sync::Arc;

use chain_meta::{PluginDatabase, PluginSpec, PluginStatus};

use super::{BackendInterface, SerializeInterface};
use crate::constants::GLOBAL_PLUGINS_PATH;
use crate::error::Result;
use crate::keyset::{KeySet, serialize_plugins};

/// Plugins that run for every backend. Has no mountpoint and no roles.
pub struct GlobalPlugins {
    database: Arc<dyn PluginDatabase>,
    plugins: Vec<PluginSpec>,
}

impl GlobalPlugins {
    pub fn new(database: Arc<dyn PluginDatabase>) -> Self {
        Self {
            database,
            plugins: Vec::new(),
        }
    }

    pub fn plugins(&self) -> &[PluginSpec] {
        &self.plugins
    }
}

impl BackendInterface for GlobalPlugins {
    fn add_plugin(&mut self, plugin: &PluginSpec) -> Result<()> {
        if self.database.status(plugin) == PluginStatus::Missing {
            return Err(chain_meta::Error::PluginNotFound {
                name: plugin.name().to_string(),
            }
            .into());
        }
        self.plugins.push(plugin.clone());
        Ok(())
    }
}

impl SerializeInterface for GlobalPlugins {
    fn serialize(&self, ret: &mut KeySet) -> Result<()> {
        serialize_plugins(GLOBAL_PLUGINS_PATH, &self.plugins, ret);
        Ok(())
    }
}
