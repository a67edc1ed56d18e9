//! Plugin specifications.
//!
//! A [`PluginSpec`] identifies one plugin instance inside a chain. The same
//! plugin module may appear several times in one chain as long as every
//! instance carries its own reference name:
//!
//! ```
//! use chain_meta::PluginSpec;
//!
//! let spec = PluginSpec::with_ref_name("dump", "backup").unwrap();
//! assert_eq!(spec.full_name(), "dump#backup");
//!
//! let plain = PluginSpec::new("dump").unwrap();
//! assert_eq!(plain.ref_name(), "dump");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

/// Configuration of one plugin instance, ordered by key.
pub type PluginConfig = BTreeMap<String, String>;

/// Separator between plugin name and reference name in a full name.
pub const REF_SEPARATOR: char = '#';

/// One plugin instance: name, reference name and configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSpec {
    name: String,
    ref_name: String,
    config: PluginConfig,
}

impl PluginSpec {
    /// Create a spec whose reference name equals its name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            ref_name: name.clone(),
            name,
            config: PluginConfig::new(),
        })
    }

    /// Create a spec with an explicit reference name.
    pub fn with_ref_name(name: impl Into<String>, ref_name: impl Into<String>) -> Result<Self> {
        let mut spec = Self::new(name)?;
        spec.set_ref_name(ref_name)?;
        Ok(spec)
    }

    /// Parse a single `name` or `name#ref` token.
    pub fn parse(token: &str) -> Result<Self> {
        match token.split_once(REF_SEPARATOR) {
            Some((name, ref_name)) => Self::with_ref_name(name, ref_name),
            None => Self::new(token),
        }
    }

    /// Replace the configuration, consuming the spec.
    pub fn with_config(mut self, config: PluginConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ref_name(&self) -> &str {
        &self.ref_name
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PluginConfig {
        &mut self.config
    }

    /// `name#ref_name`, the identity of a slot in a chain.
    pub fn full_name(&self) -> String {
        format!("{}{}{}", self.name, REF_SEPARATOR, self.ref_name)
    }

    /// Rename the plugin. The reference name is left untouched.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn set_ref_name(&mut self, ref_name: impl Into<String>) -> Result<()> {
        let ref_name = ref_name.into();
        validate_name(&ref_name)?;
        self.ref_name = ref_name;
        Ok(())
    }

    pub fn set_config(&mut self, config: PluginConfig) {
        self.config = config;
    }

    /// Add every entry of `config` whose key is not configured yet.
    ///
    /// Existing values are never overwritten.
    pub fn append_config(&mut self, config: &PluginConfig) {
        for (key, value) in config {
            self.config
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    /// Whether both specs occupy the same slot (equal name and reference name).
    pub fn same_slot(&self, other: &PluginSpec) -> bool {
        self.name == other.name && self.ref_name == other.ref_name
    }
}

impl fmt::Display for PluginSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, REF_SEPARATOR, self.ref_name)
    }
}

/// Check that `name` is usable as a plugin or reference name.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidName {
            name: name.to_string(),
            reason: "name must not be empty".to_string(),
        });
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err(Error::InvalidName {
            name: name.to_string(),
            reason: "name must contain only alphanumeric characters, '_', '-' or '.'"
                .to_string(),
        });
    }
    Ok(())
}
