//! Timer struct and flags

use std::time::Duration;

use bitflags::bitflags;
use slotmap::new_key_type;

use crate::clock::{HostClock, TimeDomain};

new_key_type! {
    /// Key for registered timers
    pub struct TimerKey;
}

bitflags! {
    /// Flags that control timer behavior
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TimerFlags: u32 {
        /// Timer repeats at the specified interval until cancelled
        const REPEAT = 0x01;
        /// Delay is measured in unscaled time and keeps running while paused
        const REAL_TIME = 0x02;
    }
}

/// A countdown against the host clock
///
/// Holds no callback; owners decide what happens when it is due.
#[derive(Debug, Clone)]
pub struct Timer {
    /// Time between executions (or delay for one-shot timers)
    pub interval: Duration,
    /// Behavior flags
    pub flags: TimerFlags,
    /// Clock reading at which this timer should next fire
    pub next_fire: Duration,
}

impl Timer {
    /// Create a new timer starting at the clock's current time
    pub fn new(interval: Duration, flags: TimerFlags, clock: &HostClock) -> Self {
        let domain = Self::domain_for(flags);
        Self {
            interval,
            flags,
            next_fire: clock.now(domain) + interval,
        }
    }

    fn domain_for(flags: TimerFlags) -> TimeDomain {
        if flags.contains(TimerFlags::REAL_TIME) {
            TimeDomain::Real
        } else {
            TimeDomain::Simulation
        }
    }

    pub fn domain(&self) -> TimeDomain {
        Self::domain_for(self.flags)
    }

    /// True once the clock has reached the deadline
    pub fn is_due(&self, clock: &HostClock) -> bool {
        clock.now(self.domain()) >= self.next_fire
    }

    /// Time left before the deadline, zero if already due
    pub fn remaining(&self, clock: &HostClock) -> Duration {
        self.next_fire.saturating_sub(clock.now(self.domain()))
    }

    /// Push the deadline one interval past the current time
    pub fn reschedule(&mut self, clock: &HostClock) {
        self.next_fire = clock.now(self.domain()) + self.interval;
    }
}
