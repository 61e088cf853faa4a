//! # Example Mod
//!
//! The smallest mod that puts a button on the host's app bar.
//!
//! ## Features Demonstrated
//! - `PluginConfig` - TOML configuration file loading
//! - `Icon::load` - Loading a button icon from the mod folder
//! - `ModContext::register_app_button_with` - Deferred app-bar registration
//! - Keeping the button state in sync with the mod's own window flag
//!
//! ## Usage
//! ```ignore
//! let example = example_mod::init(&mut ctx);
//! ```

pub mod config;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use warpkit_core::config::warpkit_base_dir;
use warpkit_core::{ButtonDescriptor, ButtonHandle, Icon, ModContext, PluginConfig, SceneGraph};

pub use config::ExampleModConfig;

/// Name the mod is registered and configured under
pub const MOD_ID: &str = "example_mod";

/// Label shown on the app-bar button
pub const BUTTON_LABEL: &str = "Example Mod";

/// Node name of the app-bar button
pub const BUTTON_ID: &str = "BTN-ExampleMod";

/// Live state of the example mod
///
/// Cloning is cheap; clones share the window flag and button handle.
#[derive(Clone)]
pub struct ExampleMod {
    config: ExampleModConfig,
    window_open: Arc<AtomicBool>,
    button: Arc<Mutex<Option<ButtonHandle>>>,
}

impl ExampleMod {
    pub fn config(&self) -> &ExampleModConfig {
        &self.config
    }

    /// Whether the mod's window should be drawn
    pub fn is_window_visible(&self) -> bool {
        self.window_open.load(Ordering::Relaxed)
    }

    /// Open or close the window, keeping the app-bar button in sync
    pub fn set_window_visible(&self, open: bool) {
        self.window_open.store(open, Ordering::Relaxed);
        if let Some(button) = self.button.lock().as_ref() {
            button.value.set(open);
        }
    }

    /// The app-bar button, once it has been added
    pub fn button(&self) -> Option<ButtonHandle> {
        self.button.lock().clone()
    }
}

/// Folder the mod's assets are read from
///
/// Path: `<game>/warpkit/plugins/example_mod/`
pub fn mod_dir() -> Option<PathBuf> {
    warpkit_base_dir()
        .ok()
        .map(|base| base.join("plugins").join(MOD_ID))
}

/// Initialize the example mod.
///
/// Loads the config and icon, then asks for the button to be added once the
/// host UI is ready.
pub fn init<S>(ctx: &mut ModContext<S>) -> ExampleMod
where
    S: SceneGraph + Send + 'static,
{
    let config = ExampleModConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load example mod config, using defaults: {}", e);
        ExampleModConfig::default()
    });

    let icon = match mod_dir() {
        Some(dir) => Icon::load(dir.join(&config.icon_file), config.icon_size),
        None => Icon::blank(config.icon_size),
    };

    init_with(ctx, config, icon)
}

/// Initialize with an explicit config and icon
pub fn init_with<S>(ctx: &mut ModContext<S>, config: ExampleModConfig, icon: Icon) -> ExampleMod
where
    S: SceneGraph + Send + 'static,
{
    tracing::info!("Hello World, I'm a warpkit mod.");

    let example = ExampleMod {
        config,
        window_open: Arc::new(AtomicBool::new(false)),
        button: Arc::new(Mutex::new(None)),
    };

    let on_toggle = example.clone();
    let registered = example.clone();
    ctx.register_app_button_with(
        ButtonDescriptor::new(BUTTON_LABEL, BUTTON_ID, icon, move |open| {
            on_toggle.set_window_visible(open);
        }),
        move |handle| *registered.button.lock() = handle,
    );

    example
}
