//! Mount command

use std::sync::Arc;

use chain_core::{BackendBuilderInit, KeySet, MountBackendBuilder};
use chain_meta::{PluginDatabase, parse_config};
use colored::Colorize;

use super::{build_chain, print_keyset, print_missing_recommends};
use crate::cli::ChainArgs;
use crate::error::{CliError, Result};

/// Backend configuration from repeated `key=value` arguments.
fn backend_config(entries: &[String]) -> Result<KeySet> {
    let mut config = KeySet::new();
    for entry in entries {
        config.extend(parse_config(entry)?);
    }
    Ok(config)
}

/// Assemble a mounted backend and return its serialized configuration.
///
/// Fails with the backend status if the chain does not form a complete
/// backend.
pub fn mount(
    database: Arc<dyn PluginDatabase>,
    mountpoint: &str,
    file: &str,
    args: &ChainArgs,
    config: &[String],
) -> Result<(KeySet, Vec<String>)> {
    let init = BackendBuilderInit::new(database);
    let mut builder = MountBackendBuilder::new(&init);

    builder.set_mountpoint(mountpoint, KeySet::new())?;
    let missing = build_chain(&mut builder, args)?;
    builder.set_backend_config(backend_config(config)?);
    builder.use_config_file(file)?;

    if !builder.validated() {
        return Err(CliError::user(format!(
            "Backend for '{}' is incomplete:\n{}",
            mountpoint,
            builder.status()
        )));
    }
    tracing::debug!("{}", builder.status());

    let mut ks = KeySet::new();
    builder.serialize(&mut ks)?;
    Ok((ks, missing))
}

/// Run the mount command
pub fn run_mount(
    database: Arc<dyn PluginDatabase>,
    mountpoint: &str,
    file: &str,
    args: &ChainArgs,
    config: &[String],
    json: bool,
) -> Result<()> {
    let (ks, missing) = mount(database, mountpoint, file, args, config)?;

    if !json {
        println!(
            "{} Backend for {} is valid and ready to be mounted",
            "OK".green().bold(),
            mountpoint.cyan()
        );
        println!();
    }
    print_keyset(&ks, json)?;
    print_missing_recommends(&missing);
    Ok(())
}
