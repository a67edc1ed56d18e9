//! Info command

use std::sync::Arc;

use chain_meta::{InfoKey, PluginDatabase, PluginSpec, PluginStatus};
use colored::Colorize;

use crate::error::Result;

/// Infos of the plugin behind `name`, in display order.
///
/// Provided names are answered with the infos of their preferred provider,
/// which is returned alongside.
pub fn plugin_infos(
    database: &dyn PluginDatabase,
    name: &str,
) -> Result<(PluginSpec, Vec<(InfoKey, String)>)> {
    let requested = PluginSpec::new(name)?;
    let plugin = match database.status(&requested) {
        PluginStatus::Real => requested,
        PluginStatus::Provides | PluginStatus::Missing => database.lookup_provides(name)?,
    };

    let mut infos = Vec::new();
    for key in InfoKey::ALL {
        infos.push((key, database.lookup_info(&plugin, key)?));
    }
    Ok((plugin, infos))
}

/// Run the info command
pub fn run_info(database: Arc<dyn PluginDatabase>, name: &str) -> Result<()> {
    let (plugin, infos) = plugin_infos(database.as_ref(), name)?;

    if plugin.name() != name {
        println!(
            "{} is provided by {}",
            name.cyan(),
            plugin.name().green().bold()
        );
    } else {
        println!("{}", plugin.name().green().bold());
    }

    for (key, value) in infos {
        if value.is_empty() {
            continue;
        }
        println!("  {:<12} {}", format!("{}:", key).dimmed(), value);
    }
    for (key, value) in plugin.config() {
        println!("  {:<12} {}={}", "config:".dimmed(), key, value);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::database;
    use super::*;

    #[test]
    fn test_plugin_infos_for_real_plugin() {
        let database = database();
        let (plugin, infos) = plugin_infos(database.as_ref(), "dump").unwrap();

        assert_eq!(plugin.name(), "dump");
        let needs = infos.iter().find(|(key, _)| *key == InfoKey::Needs).unwrap();
        assert_eq!(needs.1, "resolver");
    }

    #[test]
    fn test_plugin_infos_for_provided_name() {
        let database = database();
        let (plugin, _) = plugin_infos(database.as_ref(), "storage").unwrap();

        assert_eq!(plugin.name(), "dump");
        assert_eq!(plugin.config()["format"], "dump");
    }

    #[test]
    fn test_run_info_missing_plugin() {
        assert!(run_info(database(), "nothing").is_err());
    }
}
