//! warpkit - Core Logic
//!
//! This crate contains the mod-facing half of the warpkit modding library:
//! the "UI host ready" notifier, the host startup hook that arms it, and the
//! app-bar button registrar that waits for it.
//!
//! # Flow
//!
//! ```text
//! host HUD starts -> on_surface_started -> ReadyNotifier::arm
//!   -> on_frame ticks (simulation time) -> settle delay elapses
//!   -> ready subscribers run -> ToolbarBackend::add_button
//! ```
//!
//! # Re-exports
//!
//! This crate re-exports the SDK crate for convenience:
//! - [`sdk`] - Host handle types and well-known surface names

pub use warpkit_sdk as sdk;

pub mod assets;
pub mod clock;
pub mod config;
pub mod context;
pub mod hooks;
pub mod ready;
pub mod scene;
pub mod timers;
pub mod toolbar;

// Re-export commonly used items
pub use assets::{Icon, DEFAULT_ICON_SIZE};
pub use clock::{HostClock, TimeDomain};
pub use config::{ConfigError, ConfigResult, CoreConfig, PluginConfig};
pub use context::{ModContext, SharedScene};
pub use hooks::{GameFrameKey, StartupHook};
pub use ready::{ReadyNotifier, ReadyState, SubscriptionKey};
pub use scene::{MemoryScene, SceneGraph, ToggleListener, ToggleProperty};
pub use timers::{TimerFlags, TimerKey};
pub use toolbar::{
    ButtonDescriptor, ButtonHandle, RegistrationError, ToggleCallback, ToolbarBackend,
    ToolbarPaths,
};
