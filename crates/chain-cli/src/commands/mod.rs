//! Command implementations for chain-cli

pub mod global;
pub mod info;
pub mod list;
pub mod mount;
pub mod resolve;

pub use global::run_global;
pub use info::run_info;
pub use list::run_list;
pub use mount::run_mount;
pub use resolve::run_resolve;

use chain_core::{BackendBuilder, KeySet};
use chain_meta::{PluginSpec, parse_arguments};
use colored::Colorize;
use serde::Serialize;

use crate::cli::ChainArgs;
use crate::error::Result;

/// One chain element as printed by `--json`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ChainEntry {
    pub name: String,
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub config: chain_meta::PluginConfig,
}

impl From<&PluginSpec> for ChainEntry {
    fn from(spec: &PluginSpec) -> Self {
        Self {
            name: spec.name().to_string(),
            ref_name: spec.ref_name().to_string(),
            config: spec.config().clone(),
        }
    }
}

/// Add the requested plugins and requirements to `builder` and resolve it.
///
/// Returns the recommendations that are not installed.
pub fn build_chain(builder: &mut BackendBuilder, args: &ChainArgs) -> Result<Vec<String>> {
    for plugin in parse_arguments(&args.plugins.join(" "))? {
        builder.add_plugin(plugin)?;
    }
    builder.need_plugin(&args.needs.join(" "));
    builder.recommend_plugin(&args.recommends.join(" "));
    builder.need_metadata(&args.metadata.join(" "));

    Ok(builder.resolve_needs(!args.no_recommends)?)
}

/// Print a key set as `key = value` lines or a JSON object.
pub fn print_keyset(ks: &KeySet, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(ks)?);
    } else {
        for (key, value) in ks {
            println!("{} = {}", key.cyan(), value);
        }
    }
    Ok(())
}

pub fn print_missing_recommends(missing: &[String]) {
    for name in missing {
        eprintln!(
            "{} Recommended plugin '{}' is not installed",
            "warning:".yellow().bold(),
            name
        );
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{args, database};
    use super::*;
    use chain_core::BackendBuilderInit;

    #[test]
    fn test_build_chain_applies_config_and_needs() {
        let init = BackendBuilderInit::new(database());
        let mut builder = BackendBuilder::new(&init);

        let missing = build_chain(&mut builder, &args(&["storage", "format=ecf"])).unwrap();

        assert!(missing.is_empty());
        let entries: Vec<ChainEntry> = builder.iter().map(ChainEntry::from).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "dump");
        assert_eq!(entries[0].ref_name, "storage");
        assert_eq!(entries[0].config["format"], "ecf");
        assert_eq!(entries[1].name, "resolver");
    }

    #[test]
    fn test_build_chain_without_recommends() {
        let init = BackendBuilderInit::new(database());
        let mut builder = BackendBuilder::new(&init);
        let mut chain_args = args(&["ini"]);
        chain_args.no_recommends = true;

        let missing = build_chain(&mut builder, &chain_args).unwrap();

        assert!(missing.is_empty());
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_print_keyset_runs() {
        let ks = KeySet::from([("a/b".to_string(), "c".to_string())]);
        assert!(print_keyset(&ks, false).is_ok());
        assert!(print_keyset(&ks, true).is_ok());
    }
}
