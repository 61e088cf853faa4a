//! Mods compiled into the plugin
//!
//! Each mod is initialised once, right after the context is created and
//! before the host has started any UI surface. Their handles stay with the
//! plugin so the host can query them later.

use std::ffi::{c_char, CString};

use example_mod::ExampleMod;
use warpkit_core::ModContext;

use crate::scene::HostScene;

/// What the host needs to draw a mod window
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ModWindow {
    pub visible: bool,
    pub width: u32,
    pub height: u32,
    /// Null-terminated, valid while the plugin is loaded
    pub title: *const c_char,
}

/// Handles of every built-in mod
pub struct BuiltinMods {
    pub example: ExampleMod,
    example_title: CString,
}

impl BuiltinMods {
    /// Window state of the example mod
    pub fn example_window(&self) -> ModWindow {
        let config = self.example.config();
        ModWindow {
            visible: self.example.is_window_visible(),
            width: config.window_width,
            height: config.window_height,
            title: self.example_title.as_ptr(),
        }
    }
}

/// Initialise every built-in mod
pub fn init_all(ctx: &mut ModContext<HostScene>) -> BuiltinMods {
    tracing::info!("Initialising mod {}", example_mod::MOD_ID);
    let example = example_mod::init(ctx);

    let example_title = CString::new(example.config().window_title.as_str()).unwrap_or_else(|_| {
        tracing::warn!("Example mod window title contains a NUL byte, leaving it empty");
        CString::default()
    });

    BuiltinMods {
        example,
        example_title,
    }
}
