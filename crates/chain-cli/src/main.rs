//! Plugin Chain CLI
//!
//! Resolves plugin chains from a directory of plugin manifests.

mod cli;
mod commands;
mod error;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use chain_meta::ManifestPluginDatabase;
use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{} {}", "warning:".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    let plugins_dir = plugins_dir(cli.plugins_dir)?;
    let database = Arc::new(ManifestPluginDatabase::open(&plugins_dir)?);
    if database.is_empty() {
        tracing::warn!("No plugins found in {:?}", plugins_dir);
    }

    execute_command(cli.command, database)
}

/// The manifest directory: explicit argument, else `<data dir>/chain/plugins`.
fn plugins_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir),
        None => dirs::data_dir()
            .map(|dir| dir.join("chain").join("plugins"))
            .ok_or_else(|| {
                CliError::user("Could not determine the data directory, use --plugins-dir")
            }),
    }
}

fn execute_command(cmd: Commands, database: Arc<ManifestPluginDatabase>) -> Result<()> {
    match cmd {
        Commands::Resolve { chain, json } => commands::run_resolve(database, &chain, json),
        Commands::Mount {
            mountpoint,
            file,
            chain,
            backend_config,
            json,
        } => commands::run_mount(database, &mountpoint, &file, &chain, &backend_config, json),
        Commands::Global { chain, json } => commands::run_global(database, &chain, json),
        Commands::Info { plugin } => commands::run_info(database, &plugin),
        Commands::List { json } => commands::run_list(&database, json),
    }
}
