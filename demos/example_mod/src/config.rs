//! Example mod configuration
//!
//! This module defines the TOML configuration file format.

use serde::{Deserialize, Serialize};
use warpkit_core::PluginConfig;

/// Example mod configuration loaded from TOML file.
///
/// Location: `<game>/warpkit/configs/plugins/example_mod/example_mod.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExampleModConfig {
    /// Title shown in the window header
    pub window_title: String,

    pub window_width: u32,
    pub window_height: u32,

    /// Icon file name, relative to the mod folder
    pub icon_file: String,

    /// Icon edge length in pixels
    pub icon_size: u32,
}

impl Default for ExampleModConfig {
    fn default() -> Self {
        Self {
            window_title: "Window Header".to_string(),
            window_width: 350,
            window_height: 350,
            icon_file: "icon.png".to_string(),
            icon_size: warpkit_core::DEFAULT_ICON_SIZE,
        }
    }
}

impl PluginConfig for ExampleModConfig {
    const PLUGIN_NAME: &'static str = "example_mod";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ExampleModConfig = toml::from_str("window_title = \"Hi\"").unwrap();
        assert_eq!(config.window_title, "Hi");
        assert_eq!(config.window_width, 350);
        assert_eq!(config.icon_file, "icon.png");
        assert_eq!(config.icon_size, 24);
    }
}
