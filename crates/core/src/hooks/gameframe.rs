//! Per-frame listeners and frame timing
//!
//! The host calls into warpkit once per UI-update tick. Everything warpkit
//! does (probe polling, the ready notifier, timers) runs from that call;
//! mods can add their own per-frame work here.

use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

use crate::clock::HostClock;

new_key_type! {
    /// Key for registered frame callbacks
    pub struct GameFrameKey;
}

/// Callback type for frame listeners
pub type GameFrameCallback = Box<dyn FnMut(&HostClock) + Send + 'static>;

/// Frames slower than this are logged
const SLOW_FRAME: Duration = Duration::from_millis(1);

/// Frame callback registry
#[derive(Default)]
pub struct GameFrameListeners {
    callbacks: SlotMap<GameFrameKey, GameFrameCallback>,
}

impl GameFrameListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback to be called every frame
    ///
    /// # Returns
    /// A key that can be used to unregister the callback
    pub fn register<F>(&mut self, callback: F) -> GameFrameKey
    where
        F: FnMut(&HostClock) + Send + 'static,
    {
        self.callbacks.insert(Box::new(callback))
    }

    /// Unregister a frame callback
    ///
    /// # Returns
    /// `true` if the callback was found and removed
    pub fn unregister(&mut self, key: GameFrameKey) -> bool {
        self.callbacks.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Fire all registered callbacks
    pub fn fire(&mut self, clock: &HostClock) {
        for (_, callback) in self.callbacks.iter_mut() {
            callback(clock);
        }
    }
}

/// Processing time of the last frame
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameTiming {
    last_frame_time_ns: u64,
}

impl FrameTiming {
    /// Get the last frame processing time in nanoseconds
    pub fn last_frame_time_ns(&self) -> u64 {
        self.last_frame_time_ns
    }

    /// Record how long warpkit's share of a frame took
    pub fn record(&mut self, elapsed: Duration, frame: u64) {
        self.last_frame_time_ns = elapsed.as_nanos() as u64;

        if elapsed > SLOW_FRAME {
            tracing::warn!(
                "Frame processing took {}ms (frame {})",
                elapsed.as_millis(),
                frame
            );
        }
    }
}
