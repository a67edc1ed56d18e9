//! Parsing of plugin argument strings.
//!
//! Plugins are requested with a whitespace separated token list. A token
//! without `=` starts a new plugin (`name` or `name#ref`), `key=value` tokens
//! configure the plugin named before them. Several entries may be joined with
//! commas:
//!
//! ```
//! use chain_meta::parse_arguments;
//!
//! let plugins = parse_arguments("ini delimiter=; sync#flush").unwrap();
//! assert_eq!(plugins.len(), 2);
//! assert_eq!(plugins[0].config()["delimiter"], ";");
//! assert_eq!(plugins[1].full_name(), "sync#flush");
//! ```

use crate::error::{Error, Result};
use crate::spec::{PluginConfig, PluginSpec};

/// Parse a plugin argument string into plugin specs.
pub fn parse_arguments(text: &str) -> Result<Vec<PluginSpec>> {
    let mut plugins: Vec<PluginSpec> = Vec::new();

    for token in text.split_whitespace() {
        if token.contains('=') {
            let Some(plugin) = plugins.last_mut() else {
                return Err(Error::ConfigWithoutPlugin {
                    token: token.to_string(),
                });
            };
            // later arguments win over earlier ones for the same plugin
            plugin.config_mut().extend(parse_config(token)?);
        } else {
            plugins.push(PluginSpec::parse(token)?);
        }
    }

    Ok(plugins)
}

/// Parse `key=value[,key=value...]` into a config map.
pub fn parse_config(text: &str) -> Result<PluginConfig> {
    let mut config = PluginConfig::new();

    for entry in text.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        match entry.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                config.insert(key.to_string(), value.to_string());
            }
            _ => {
                return Err(Error::InvalidConfigEntry {
                    entry: entry.to_string(),
                });
            }
        }
    }

    Ok(config)
}
