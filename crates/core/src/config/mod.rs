//! Configuration system for warpkit
//!
//! This module provides a trait-based configuration system that supports:
//! - Type-safe config structs via serde
//! - TOML file format
//! - Auto-generation of default configs
//! - Manual reload capability
//!
//! # Example
//!
//! ```ignore
//! use serde::{Deserialize, Serialize};
//! use warpkit_core::PluginConfig;
//!
//! #[derive(Default, Serialize, Deserialize)]
//! pub struct MyModConfig {
//!     pub window_width: u32,
//! }
//!
//! impl PluginConfig for MyModConfig {
//!     const PLUGIN_NAME: &'static str = "my_mod";
//! }
//!
//! let config = MyModConfig::load().unwrap_or_default();
//! ```

mod loader;

use std::path::Path;
use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use warpkit_sdk::surfaces;

use crate::ready::DEFAULT_SETTLE_DELAY;
use crate::toolbar::ToolbarPaths;

pub use loader::{configs_dir, core_config_path, plugin_config_path, warpkit_base_dir, HOME_ENV};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Could not determine config directory
    #[error("Config directory not available - could not resolve warpkit base path")]
    NoConfigDirectory,
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Read a TOML file, or write `T::default()` there if it does not exist
fn load_or_create<T>(path: &Path) -> ConfigResult<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    } else {
        let default = T::default();
        save_to(&default, path)?;
        tracing::info!("Created default config at {:?}", path);
        Ok(default)
    }
}

/// Write a config as TOML, creating parent directories
fn save_to<T: Serialize>(config: &T, path: &Path) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    tracing::debug!("Saved config to {:?}", path);
    Ok(())
}

/// Trait for mod configuration types.
///
/// Implement this trait on your config struct to enable automatic loading,
/// saving, and reloading of configuration files.
///
/// # File Location
///
/// Configs are stored at:
/// `<game>/warpkit/configs/plugins/{PLUGIN_NAME}/{PLUGIN_NAME}.toml`
pub trait PluginConfig: Default + Serialize + DeserializeOwned + Send + Sync {
    /// The mod name used for config file path resolution.
    const PLUGIN_NAME: &'static str;

    /// Load config from file, creating default if missing.
    fn load() -> ConfigResult<Self> {
        let path = plugin_config_path(Self::PLUGIN_NAME)?;
        load_or_create(&path)
    }

    /// Save config to file.
    ///
    /// Creates parent directories if they don't exist.
    fn save(&self) -> ConfigResult<()> {
        let path = plugin_config_path(Self::PLUGIN_NAME)?;
        save_to(self, &path)
    }

    /// Reload config from file.
    ///
    /// Updates self with the current file contents.
    fn reload(&mut self) -> ConfigResult<()> {
        let path = plugin_config_path(Self::PLUGIN_NAME)?;
        let content = std::fs::read_to_string(&path)?;
        *self = toml::from_str(&content)?;
        tracing::debug!("Reloaded config for {} from {:?}", Self::PLUGIN_NAME, path);
        Ok(())
    }
}

/// Core framework configuration.
///
/// Loaded from `<game>/warpkit/configs/core.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// Simulation seconds between HUD startup and the ready event
    pub settle_delay_secs: f64,

    /// Host surface whose startup arms the ready event
    pub startup_surface: String,

    /// Where the app bar and its template button live
    pub toolbar: ToolbarPaths,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            settle_delay_secs: DEFAULT_SETTLE_DELAY.as_secs_f64(),
            startup_surface: surfaces::FLIGHT_HUD.to_string(),
            toolbar: ToolbarPaths::default(),
        }
    }
}

impl CoreConfig {
    /// Load core config from file, creating default if missing.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&core_config_path()?)
    }

    /// Load core config from an explicit path, creating default if missing.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        load_or_create(path)
    }

    /// Save core config to file.
    pub fn save(&self) -> ConfigResult<()> {
        save_to(self, &core_config_path()?)
    }

    /// Reload core config from file.
    pub fn reload(&mut self) -> ConfigResult<()> {
        let path = core_config_path()?;
        let content = std::fs::read_to_string(&path)?;
        *self = toml::from_str(&content)?;
        tracing::debug!("Reloaded core config from {:?}", path);
        Ok(())
    }

    /// Settle delay as a duration
    ///
    /// Negative or non-finite values fall back to the default.
    pub fn settle_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.settle_delay_secs).unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid settle_delay_secs {}, using {:?}",
                self.settle_delay_secs,
                DEFAULT_SETTLE_DELAY
            );
            DEFAULT_SETTLE_DELAY
        })
    }
}
