//! Timer system for scheduling delayed and repeating callbacks
//!
//! Timers are processed every host frame and can be configured to:
//! - Fire once after a delay
//! - Repeat at a fixed interval
//! - Measure their delay in unscaled time instead of simulation time
//!
//! The registry is owned by the [`ModContext`](crate::ModContext); there is
//! no process-wide timer list.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use warpkit_core::timers::TimerFlags;
//!
//! // One-shot timer, paused together with the game
//! let key = ctx.add_timer(Duration::from_secs(5), || {
//!     tracing::info!("5 seconds of flight passed!");
//! });
//!
//! // Repeating timer that keeps running in the pause menu
//! let key = ctx.add_timer_with_flags(
//!     Duration::from_millis(100),
//!     TimerFlags::REPEAT | TimerFlags::REAL_TIME,
//!     || { /* ... */ },
//! );
//!
//! // Cancel a timer
//! ctx.remove_timer(key);
//! ```

mod timer;

use std::time::Duration;

use slotmap::SlotMap;

use crate::clock::HostClock;

pub use timer::{Timer, TimerFlags, TimerKey};

/// Callback type for registered timers
pub type TimerCallback = Box<dyn FnMut() + Send + 'static>;

/// A timer together with the work it triggers
struct ScheduledTimer {
    timer: Timer,
    callback: TimerCallback,
}

/// Timer registry
#[derive(Default)]
pub struct TimerRegistry {
    timers: SlotMap<TimerKey, ScheduledTimer>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a timer with custom flags
    ///
    /// # Arguments
    /// * `interval` - Delay (one-shot) or interval between executions (repeating)
    /// * `flags` - Combination of `TimerFlags` to control behavior
    /// * `clock` - Clock the delay starts counting from
    /// * `callback` - Function to call when the timer fires
    ///
    /// # Returns
    /// A key that can be used to cancel the timer via `remove`
    pub fn add<F>(
        &mut self,
        interval: Duration,
        flags: TimerFlags,
        clock: &HostClock,
        callback: F,
    ) -> TimerKey
    where
        F: FnMut() + Send + 'static,
    {
        self.timers.insert(ScheduledTimer {
            timer: Timer::new(interval, flags, clock),
            callback: Box::new(callback),
        })
    }

    /// Remove/cancel a timer
    ///
    /// # Returns
    /// `true` if the timer was found and removed, `false` if not found
    pub fn remove(&mut self, key: TimerKey) -> bool {
        self.timers.remove(key).is_some()
    }

    pub fn contains(&self, key: TimerKey) -> bool {
        self.timers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Process all timers (called once per frame)
    ///
    /// Fires every timer that is due. One-shot timers are removed after
    /// firing, while repeating timers are rescheduled.
    ///
    /// # Returns
    /// The number of callbacks that ran
    pub fn process(&mut self, clock: &HostClock) -> usize {
        let mut fired = 0;
        let mut to_remove = Vec::new();

        for (key, scheduled) in self.timers.iter_mut() {
            if !scheduled.timer.is_due(clock) {
                continue;
            }

            (scheduled.callback)();
            fired += 1;

            if scheduled.timer.flags.contains(TimerFlags::REPEAT) {
                scheduled.timer.reschedule(clock);
            } else {
                to_remove.push(key);
            }
        }

        for key in to_remove {
            self.timers.remove(key);
        }

        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_one_shot_fires_once_and_is_removed() {
        let mut clock = HostClock::new();
        let mut registry = TimerRegistry::new();
        let (count, callback) = counter();

        let key = registry.add(Duration::from_secs(1), TimerFlags::empty(), &clock, callback);

        clock.advance(Duration::from_secs(1), true);
        assert_eq!(registry.process(&clock), 1);
        clock.advance(Duration::from_secs(1), true);
        assert_eq!(registry.process(&clock), 0);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!registry.contains(key));
    }

    #[test]
    fn test_repeating_timer_reschedules() {
        let mut clock = HostClock::new();
        let mut registry = TimerRegistry::new();
        let (count, callback) = counter();

        registry.add(Duration::from_millis(100), TimerFlags::REPEAT, &clock, callback);

        for _ in 0..5 {
            clock.advance(Duration::from_millis(100), true);
            registry.process(&clock);
        }

        assert_eq!(count.load(Ordering::SeqCst), 5);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_simulation_timer_waits_out_pause() {
        let mut clock = HostClock::new();
        let mut registry = TimerRegistry::new();
        let (count, callback) = counter();

        registry.add(Duration::from_secs(1), TimerFlags::empty(), &clock, callback);

        clock.advance(Duration::from_secs(5), false);
        registry.process(&clock);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        clock.advance(Duration::from_secs(1), true);
        registry.process(&clock);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove_cancels_timer() {
        let clock = HostClock::new();
        let mut registry = TimerRegistry::new();
        let (_, callback) = counter();

        let key = registry.add(Duration::from_secs(1), TimerFlags::empty(), &clock, callback);

        assert!(registry.remove(key));
        assert!(!registry.remove(key));
        assert!(registry.is_empty());
    }
}
