//! Host UI-surface startup hook
//!
//! The host tells us when one of its UI surfaces has finished its startup
//! routine by calling [`ModContext::on_surface_started`](crate::ModContext::on_surface_started)
//! (over FFI: `warpkit_on_surface_started`). Hosts that cannot call out can
//! instead expose a readiness flag, which is polled once per frame through a
//! [`ReadinessProbe`].
//!
//! The hook only observes. It never alters the host routine and it tolerates
//! being triggered any number of times; idempotence of what it triggers is
//! the ready notifier's job.

use warpkit_sdk::HOST_SURFACES;

/// Closure returning `true` once the host surface exists
pub type ReadinessProbe = Box<dyn FnMut() -> bool + Send + 'static>;

/// Watches for the startup of one named host surface
pub struct StartupHook {
    surface: String,
    triggers: u64,
    probe: Option<ReadinessProbe>,
}

impl StartupHook {
    /// Create a hook for the given surface (e.g. `UIFlightHud`)
    pub fn new(surface: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            triggers: 0,
            probe: None,
        }
    }

    /// Name of the watched surface
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// How many times the watched surface has reported startup
    pub fn trigger_count(&self) -> u64 {
        self.triggers
    }

    /// Handle a startup signal from the host
    ///
    /// # Returns
    /// `true` if the signal was for the watched surface
    pub fn on_surface_started(&mut self, name: &str) -> bool {
        if name != self.surface {
            let label = HOST_SURFACES
                .iter()
                .find(|(_, surface)| *surface == name)
                .map(|(label, _)| *label)
                .unwrap_or("unknown");
            tracing::trace!("Ignoring startup of {} surface {:?}", label, name);
            return false;
        }

        self.triggers += 1;
        if self.triggers > 1 {
            tracing::debug!(
                "Surface {} started again (trigger #{})",
                self.surface,
                self.triggers
            );
        } else {
            tracing::debug!("Surface {} started", self.surface);
        }
        true
    }

    /// Install a readiness probe, replacing any previous one
    pub fn set_probe<F>(&mut self, probe: F)
    where
        F: FnMut() -> bool + Send + 'static,
    {
        self.probe = Some(Box::new(probe));
    }

    pub fn has_probe(&self) -> bool {
        self.probe.is_some()
    }

    /// Poll the readiness probe (called once per frame)
    ///
    /// The probe is dropped after its first `true`, so it counts as exactly
    /// one trigger.
    ///
    /// # Returns
    /// `true` on the frame the probe first reports ready
    pub fn poll_probe(&mut self) -> bool {
        let Some(probe) = self.probe.as_mut() else {
            return false;
        };

        if !probe() {
            return false;
        }

        self.probe = None;
        self.triggers += 1;
        tracing::debug!("Surface {} reported ready by probe", self.surface);
        true
    }
}
