//! List command

use chain_meta::{InfoKey, ManifestPluginDatabase};
use colored::Colorize;
use serde::Serialize;

use crate::error::Result;

/// One installed plugin as printed by `--json`.
#[derive(Debug, Serialize)]
pub struct PluginSummary {
    pub name: String,
    pub version: String,
    pub priority: i32,
    pub provides: Vec<String>,
    pub description: Option<String>,
}

/// Summaries of all installed plugins, sorted by name.
pub fn summaries(database: &ManifestPluginDatabase) -> Vec<PluginSummary> {
    database
        .plugin_names()
        .into_iter()
        .filter_map(|name| database.manifest(&name))
        .map(|manifest| PluginSummary {
            name: manifest.name().to_string(),
            version: manifest.info(InfoKey::Version),
            priority: manifest.priority(),
            provides: manifest.infos.provides.clone(),
            description: manifest.plugin.description.clone(),
        })
        .collect()
}

/// Run the list command
pub fn run_list(database: &ManifestPluginDatabase, json: bool) -> Result<()> {
    let plugins = summaries(database);

    if json {
        println!("{}", serde_json::to_string_pretty(&plugins)?);
        return Ok(());
    }

    println!("{}", "Installed Plugins".bold());
    println!();

    for plugin in &plugins {
        let provides = if plugin.provides.is_empty() {
            String::new()
        } else {
            format!("(provides: {})", plugin.provides.join(", "))
        };
        println!(
            "  {:<14} {:<8} {} {}",
            plugin.name.green(),
            plugin.version,
            provides.cyan(),
            plugin.description.as_deref().unwrap_or_default().dimmed()
        );
    }

    println!();
    println!(
        "{} {} plugins in {}",
        "Total:".dimmed(),
        plugins.len(),
        database.root().display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_meta::PluginManifest;
    use std::fs;
    use tempfile::TempDir;

    fn plugin_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        for manifest in [
            PluginManifest::new("resolver").with_provides(&["resolver"]),
            PluginManifest::new("dump")
                .with_provides(&["storage"])
                .with_description("Dump format"),
        ] {
            let path = dir.path().join(format!("{}.toml", manifest.name()));
            fs::write(path, manifest.to_toml().unwrap()).unwrap();
        }
        dir
    }

    #[test]
    fn test_summaries_sorted() {
        let dir = plugin_dir();
        let database = ManifestPluginDatabase::open(dir.path()).unwrap();

        let summaries = summaries(&database);

        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["dump", "resolver"]);
        assert_eq!(summaries[0].provides, vec!["storage"]);
        assert_eq!(summaries[0].description.as_deref(), Some("Dump format"));
    }

    #[test]
    fn test_run_list_runs() {
        let dir = plugin_dir();
        let database = ManifestPluginDatabase::open(dir.path()).unwrap();
        assert!(run_list(&database, false).is_ok());
        assert!(run_list(&database, true).is_ok());
    }
}
