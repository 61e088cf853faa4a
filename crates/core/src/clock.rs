//! Host clock
//!
//! The host reports a frame delta and whether the game is simulating on every
//! tick. Simulation time only advances while simulating, so anything measured
//! in simulation time stops while the game is paused. Real (unscaled) time
//! always advances.

use std::time::Duration;

/// Which clock a delay is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeDomain {
    /// Host simulation time (pauses with the game)
    #[default]
    Simulation,
    /// Unscaled time (keeps running while paused)
    Real,
}

/// Time as seen by the host's UI-update loop
#[derive(Debug, Clone, Default)]
pub struct HostClock {
    sim_time: Duration,
    real_time: Duration,
    frame_count: u64,
    simulating: bool,
}

impl HostClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one host frame
    ///
    /// # Arguments
    /// * `delta` - Time since the previous frame
    /// * `simulating` - False while the host has simulation paused
    pub fn advance(&mut self, delta: Duration, simulating: bool) {
        self.frame_count += 1;
        self.simulating = simulating;
        self.real_time += delta;
        if simulating {
            self.sim_time += delta;
        }
    }

    /// Current time in the given domain
    pub fn now(&self, domain: TimeDomain) -> Duration {
        match domain {
            TimeDomain::Simulation => self.sim_time,
            TimeDomain::Real => self.real_time,
        }
    }

    pub fn sim_time(&self) -> Duration {
        self.sim_time
    }

    pub fn real_time(&self) -> Duration {
        self.real_time
    }

    /// Number of frames seen so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Whether the last frame was simulating
    pub fn is_simulating(&self) -> bool {
        self.simulating
    }
}
