//! Global plugins command

use std::sync::Arc;

use chain_core::{BackendBuilderInit, GlobalPluginsBuilder, KeySet};
use chain_meta::PluginDatabase;

use super::{build_chain, print_keyset, print_missing_recommends};
use crate::cli::ChainArgs;
use crate::error::Result;

/// Run the global command
pub fn run_global(database: Arc<dyn PluginDatabase>, args: &ChainArgs, json: bool) -> Result<()> {
    let init = BackendBuilderInit::new(database);
    let mut builder = GlobalPluginsBuilder::new(&init);
    let missing = build_chain(&mut builder, args)?;

    let mut ks = KeySet::new();
    builder.serialize(&mut ks)?;

    print_keyset(&ks, json)?;
    print_missing_recommends(&missing);
    Ok(())
}
