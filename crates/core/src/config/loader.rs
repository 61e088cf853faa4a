//! Config path resolution
//!
//! Handles resolving paths for configuration files based on where warpkit is
//! installed.

use std::path::PathBuf;

use super::{ConfigError, ConfigResult};

/// Environment variable overriding the warpkit base directory
pub const HOME_ENV: &str = "WARPKIT_HOME";

/// Returns the warpkit base directory.
///
/// Uses `$WARPKIT_HOME` when set. Otherwise the directory is `warpkit/` next
/// to the host executable:
/// `<game>/warpkit/`
pub fn warpkit_base_dir() -> ConfigResult<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }

    let exe = std::env::current_exe().map_err(ConfigError::IoError)?;
    exe.parent()
        .map(|game_dir| game_dir.join("warpkit"))
        .ok_or(ConfigError::NoConfigDirectory)
}

/// Returns the base configs directory.
///
/// Path: `<game>/warpkit/configs/`
pub fn configs_dir() -> ConfigResult<PathBuf> {
    Ok(warpkit_base_dir()?.join("configs"))
}

/// Returns the path for a plugin's config file.
///
/// Path: `<game>/warpkit/configs/plugins/{plugin_name}/{plugin_name}.toml`
pub fn plugin_config_path(plugin_name: &str) -> ConfigResult<PathBuf> {
    let base = configs_dir()?;
    Ok(base
        .join("plugins")
        .join(plugin_name)
        .join(format!("{}.toml", plugin_name)))
}

/// Returns the core framework config path.
///
/// Path: `<game>/warpkit/configs/core.toml`
pub fn core_config_path() -> ConfigResult<PathBuf> {
    Ok(configs_dir()?.join("core.toml"))
}
