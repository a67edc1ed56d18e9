//! Error types for chain-core

/// Result type for chain-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while assembling a plugin chain
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A plugin with the same name and reference name is already in the chain
    #[error("plugin '{full_name}' is already part of the chain, use a different reference name")]
    DuplicatePlugin { full_name: String },

    /// Need resolution kept going without converging
    #[error("plugin resolution did not converge within {iterations} iterations")]
    ResolutionDiverged { iterations: usize },

    /// Mountpoint is not a valid key name
    #[error("invalid mountpoint '{mountpoint}': {reason}")]
    InvalidMountpoint { mountpoint: String, reason: String },

    /// Mountpoint is already used by another backend
    #[error("mountpoint '{mountpoint}' is already in use")]
    MountpointInUse { mountpoint: String },

    /// Two plugins claim a role only one plugin may fill
    #[error("plugin '{plugin}' cannot act as {role}, '{existing}' already does")]
    RoleConflict {
        role: String,
        existing: String,
        plugin: String,
    },

    /// Config file cannot be used by the backend
    #[error("invalid config file '{file}': {reason}")]
    InvalidConfigFile { file: String, reason: String },

    // Transparent wrappers for underlying crate errors
    /// Plugin lookup error from chain-meta
    #[error(transparent)]
    Meta(#[from] chain_meta::Error),
}
