//! Error types for plugin loading

use warpkit_core::ConfigError;

/// Error type for plugin load operations
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// Host passed a null scene API table
    #[error("Host scene API is null")]
    NullSceneApi,

    /// Host passed a string that is not valid UTF-8
    #[error("Invalid string from host: {0}")]
    InvalidString(#[from] std::str::Utf8Error),

    /// Core config could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Loading panicked before the plugin was created
    #[error("Panic while loading warpkit")]
    Panicked,
}
