//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Plugin Chain - Resolve and order plugin chains
#[derive(Parser, Debug)]
#[command(name = "chain")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding plugin manifests (<name>.toml)
    #[arg(long, global = true, env = "CHAIN_PLUGINS_DIR")]
    pub plugins_dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Plugins and requirements shared by all chain building commands.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainArgs {
    /// Plugins to add, optionally as name#ref followed by key=value config
    pub plugins: Vec<String>,

    /// Additional plugins that must be part of the chain
    #[arg(long = "need")]
    pub needs: Vec<String>,

    /// Additional plugins that should be part of the chain if installed
    #[arg(long = "recommend")]
    pub recommends: Vec<String>,

    /// Metadata the chain must handle
    #[arg(long)]
    pub metadata: Vec<String>,

    /// Do not add recommended plugins
    #[arg(long)]
    pub no_recommends: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve and print an ordered plugin chain
    ///
    /// Examples:
    ///   chain resolve storage                  # Provider of "storage" and its needs
    ///   chain resolve ini delimiter=: sync     # With plugin configuration
    ///   chain resolve dump --metadata check/type
    Resolve {
        #[command(flatten)]
        chain: ChainArgs,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Assemble a backend for a mountpoint and print its configuration
    ///
    /// Examples:
    ///   chain mount user/app app.ecf storage
    ///   chain mount /app app.ini ini sync --json
    Mount {
        /// Key the backend is mounted at
        mountpoint: String,

        /// Config file the resolver resolves
        file: String,

        #[command(flatten)]
        chain: ChainArgs,

        /// Backend configuration as key=value, may be repeated
        #[arg(long = "config", value_name = "KEY=VALUE")]
        backend_config: Vec<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Assemble and print the global plugin configuration
    Global {
        #[command(flatten)]
        chain: ChainArgs,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show everything known about one plugin
    Info {
        /// Plugin or provided name
        plugin: String,
    },

    /// List installed plugins
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
