//! One-shot "UI host ready" notifier
//!
//! The host HUD reports that it has started before its child UI elements are
//! wired up, so anything that touches the HUD's scene graph waits for this
//! notifier instead. It moves through three states:
//!
//! ```text
//! Idle --arm()--> Arming(timer) --poll() after settle delay--> Fired
//! ```
//!
//! - Arming is idempotent: `arm()` in `Arming` or `Fired` does nothing.
//! - The settle delay is measured in simulation time, so it stalls while the
//!   host is paused.
//! - Firing drains every subscriber exactly once. Subscribers added after
//!   firing are invoked immediately, inside `subscribe()`.
//!
//! The settle delay is an empirically chosen grace period, not a completion
//! signal from the host. Treat it as a tunable.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use warpkit_core::ReadyNotifier;
//!
//! let mut ready = ReadyNotifier::new(Duration::from_secs(1));
//! ready.subscribe(|| tracing::info!("HUD is ready"));
//!
//! ready.arm(&clock);
//! // ... every frame:
//! ready.poll(&clock);
//! ```

use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

use crate::clock::HostClock;
use crate::timers::{Timer, TimerFlags};

new_key_type! {
    /// Key for a pending ready subscription, used for removal
    pub struct SubscriptionKey;
}

/// Callback invoked once the host UI is ready
pub type ReadyCallback = Box<dyn FnOnce() + Send + 'static>;

/// Default settle delay between HUD startup and firing
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Notifier state
#[derive(Debug)]
pub enum ReadyState {
    /// Waiting for the startup hook
    Idle,
    /// Startup observed; waiting out the settle delay
    Arming(Timer),
    /// Subscribers have been notified
    Fired,
}

/// Fire-at-most-once broadcast with late-subscriber catch-up
pub struct ReadyNotifier {
    state: ReadyState,
    settle_delay: Duration,
    subscribers: SlotMap<SubscriptionKey, ReadyCallback>,
    /// Registration order
    order: Vec<SubscriptionKey>,
}

impl ReadyNotifier {
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            state: ReadyState::Idle,
            settle_delay,
            subscribers: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    pub fn state(&self) -> &ReadyState {
        &self.state
    }

    pub fn is_fired(&self) -> bool {
        matches!(self.state, ReadyState::Fired)
    }

    pub fn is_arming(&self) -> bool {
        matches!(self.state, ReadyState::Arming(_))
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Time left before firing, if currently arming
    pub fn remaining(&self, clock: &HostClock) -> Option<Duration> {
        match &self.state {
            ReadyState::Arming(timer) => Some(timer.remaining(clock)),
            _ => None,
        }
    }

    /// Number of subscribers still waiting to be notified
    pub fn pending_subscribers(&self) -> usize {
        self.subscribers.len()
    }

    /// Start the settle delay
    ///
    /// # Returns
    /// `true` if this call moved the notifier out of `Idle`; repeated calls
    /// return `false` and change nothing.
    pub fn arm(&mut self, clock: &HostClock) -> bool {
        if !matches!(self.state, ReadyState::Idle) {
            tracing::trace!("Ready notifier already armed, ignoring");
            return false;
        }

        let timer = Timer::new(self.settle_delay, TimerFlags::empty(), clock);
        tracing::debug!(
            "Ready notifier armed, firing after {:?} of simulation time",
            self.settle_delay
        );
        self.state = ReadyState::Arming(timer);
        true
    }

    /// Check the settle timer (called once per frame)
    ///
    /// # Returns
    /// `true` on the frame the notifier fires
    pub fn poll(&mut self, clock: &HostClock) -> bool {
        match &self.state {
            ReadyState::Arming(timer) if timer.is_due(clock) => {
                self.fire();
                true
            }
            _ => false,
        }
    }

    /// Register a callback for the ready event
    ///
    /// # Returns
    /// A key for `unsubscribe` while the callback is pending, or `None` if the
    /// notifier had already fired and the callback ran immediately.
    pub fn subscribe<F>(&mut self, callback: F) -> Option<SubscriptionKey>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_fired() {
            callback();
            return None;
        }

        let key = self.subscribers.insert(Box::new(callback));
        self.order.push(key);
        Some(key)
    }

    /// Remove a pending subscriber
    ///
    /// Returns `true` if the subscriber was found and removed.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        if self.subscribers.remove(key).is_none() {
            return false;
        }
        self.order.retain(|k| *k != key);
        true
    }

    fn fire(&mut self) {
        // Dropping the Arming state tears the settle timer down.
        self.state = ReadyState::Fired;
        let order = std::mem::take(&mut self.order);
        let mut subscribers = std::mem::take(&mut self.subscribers);

        tracing::info!("UI host ready, notifying {} subscribers", subscribers.len());
        for key in order {
            if let Some(callback) = subscribers.remove(key) {
                callback();
            }
        }
    }
}

impl Default for ReadyNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE_DELAY)
    }
}
