//! Resolve command

use std::sync::Arc;

use chain_core::{BackendBuilder, BackendBuilderInit};
use chain_meta::PluginDatabase;
use colored::Colorize;
use serde::Serialize;

use super::{ChainEntry, build_chain, print_missing_recommends};
use crate::cli::ChainArgs;
use crate::error::Result;

/// Outcome of resolving a chain.
#[derive(Debug, Serialize)]
pub struct ResolveReport {
    pub chain: Vec<ChainEntry>,
    pub missing_recommends: Vec<String>,
}

/// Resolve `args` against `database` without printing anything.
pub fn resolve(database: Arc<dyn PluginDatabase>, args: &ChainArgs) -> Result<ResolveReport> {
    let init = BackendBuilderInit::new(database);
    let mut builder = BackendBuilder::new(&init);
    let missing_recommends = build_chain(&mut builder, args)?;

    Ok(ResolveReport {
        chain: builder.iter().map(ChainEntry::from).collect(),
        missing_recommends,
    })
}

/// Run the resolve command
pub fn run_resolve(database: Arc<dyn PluginDatabase>, args: &ChainArgs, json: bool) -> Result<()> {
    let report = resolve(database, args)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Plugin chain".bold());
    for (index, entry) in report.chain.iter().enumerate() {
        let config: Vec<String> = entry
            .config
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        println!(
            "  {:>2}. {}#{} {}",
            index,
            entry.name.green(),
            entry.ref_name,
            config.join(",").dimmed()
        );
    }
    print_missing_recommends(&report.missing_recommends);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{args, database};
    use super::*;

    #[test]
    fn test_resolve_orders_chain() {
        let mut chain_args = args(&["resolver"]);
        chain_args.needs = vec!["sync".to_string()];

        let report = resolve(database(), &chain_args).unwrap();

        let names: Vec<&str> = report.chain.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["sync", "resolver"]);
    }

    #[test]
    fn test_resolve_reports_missing_recommends() {
        let report = resolve(database(), &args(&["ini"])).unwrap();

        let names: Vec<&str> = report.chain.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["ini", "sync"]);
        assert_eq!(report.missing_recommends, vec!["glob"]);
    }

    #[test]
    fn test_resolve_unknown_plugin_fails() {
        assert!(resolve(database(), &args(&["nothing"])).is_err());
    }

    #[test]
    fn test_run_resolve_json() {
        assert!(run_resolve(database(), &args(&["storage"]), true).is_ok());
    }
}
