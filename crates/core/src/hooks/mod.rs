//! Host hook points
//!
//! warpkit does not patch host code. The host calls two explicit extension
//! points instead:
//! - Surface startup, handled by [`startup::StartupHook`]
//! - The per-frame UI update, which drives [`gameframe::GameFrameListeners`]

pub mod gameframe;
pub mod startup;

pub use gameframe::{FrameTiming, GameFrameCallback, GameFrameKey, GameFrameListeners};
pub use startup::{ReadinessProbe, StartupHook};
