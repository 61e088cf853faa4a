//! warpkit Plugin - FFI Layer
//!
//! This crate provides the FFI boundary between the host's modding loader
//! and the warpkit core. It compiles to a cdylib (.so/.dll).
//!
//! The host drives everything through the `warpkit_*` exports in [`ffi`]:
//! it passes a table of scene-graph functions on load, gets back an opaque
//! plugin pointer, and hands that pointer to every later call.

pub mod error;
pub mod ffi;
pub mod mods;
pub mod scene;

pub use error::PluginError;
pub use mods::{BuiltinMods, ModWindow};
pub use scene::{HostScene, HostSceneApi};
