//! Well-known key paths and limits.

/// Below this path the configuration of global plugins is stored.
pub const GLOBAL_PLUGINS_PATH: &str = "system/chain/globalplugins";

/// Below this path every mounted backend is stored, one escaped mountpoint per entry.
pub const MOUNTPOINTS_PATH: &str = "system/chain/mountpoints";

/// Iterations after which need resolution is considered diverged.
pub const DEFAULT_ITERATION_LIMIT: usize = 1024;

/// Role filled by the plugin that resolves config file names.
pub const RESOLVER_ROLE: &str = "resolver";

/// Role filled by the plugin that reads and writes the config file.
pub const STORAGE_ROLE: &str = "storage";
