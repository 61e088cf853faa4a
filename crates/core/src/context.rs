//! Mod context
//!
//! Everything warpkit keeps between host calls lives in one [`ModContext`],
//! created when the plugin loads and dropped when it unloads. Nothing is
//! looked up through process-wide statics: the host bridge owns the context
//! and hands it to every entry point.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::clock::HostClock;
use crate::config::CoreConfig;
use crate::hooks::{FrameTiming, GameFrameKey, GameFrameListeners, StartupHook};
use crate::ready::{ReadyNotifier, SubscriptionKey};
use crate::scene::SceneGraph;
use crate::timers::{TimerFlags, TimerKey, TimerRegistry};
use crate::toolbar::{ButtonDescriptor, ButtonHandle, ToolbarBackend};

/// Scene graph shared between the context and ready subscribers
pub type SharedScene<S> = Arc<Mutex<S>>;

/// Per-plugin state driven by host callbacks
pub struct ModContext<S> {
    config: CoreConfig,
    clock: HostClock,
    startup: StartupHook,
    ready: ReadyNotifier,
    timers: TimerRegistry,
    frame_listeners: GameFrameListeners,
    frame_timing: FrameTiming,
    toolbar: ToolbarBackend,
    scene: SharedScene<S>,
}

impl<S> ModContext<S>
where
    S: SceneGraph + Send + 'static,
{
    pub fn new(config: CoreConfig, scene: S) -> Self {
        Self::with_shared_scene(config, Arc::new(Mutex::new(scene)))
    }

    /// Create a context around a scene the caller keeps a handle to
    pub fn with_shared_scene(config: CoreConfig, scene: SharedScene<S>) -> Self {
        tracing::debug!(
            "Creating mod context (surface {}, settle delay {:?})",
            config.startup_surface,
            config.settle_delay()
        );

        Self {
            clock: HostClock::new(),
            startup: StartupHook::new(config.startup_surface.clone()),
            ready: ReadyNotifier::new(config.settle_delay()),
            timers: TimerRegistry::new(),
            frame_listeners: GameFrameListeners::new(),
            frame_timing: FrameTiming::default(),
            toolbar: ToolbarBackend::new(config.toolbar.clone()),
            scene,
            config,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn clock(&self) -> &HostClock {
        &self.clock
    }

    pub fn startup(&self) -> &StartupHook {
        &self.startup
    }

    pub fn ready(&self) -> &ReadyNotifier {
        &self.ready
    }

    pub fn toolbar(&self) -> &ToolbarBackend {
        &self.toolbar
    }

    pub fn scene(&self) -> &SharedScene<S> {
        &self.scene
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.clock.frame_count()
    }

    /// Get the last frame processing time in nanoseconds
    pub fn last_frame_time_ns(&self) -> u64 {
        self.frame_timing.last_frame_time_ns()
    }

    // === Host entry points ===

    /// Called by the host when a UI surface has finished starting
    ///
    /// # Returns
    /// `true` if this call armed the ready notifier
    pub fn on_surface_started(&mut self, surface: &str) -> bool {
        self.startup.on_surface_started(surface) && self.ready.arm(&self.clock)
    }

    /// Poll a host readiness flag instead of waiting for `on_surface_started`
    ///
    /// The probe runs once per frame until it first returns `true`.
    pub fn set_readiness_probe<F>(&mut self, probe: F)
    where
        F: FnMut() -> bool + Send + 'static,
    {
        self.startup.set_probe(probe);
    }

    /// Called by the host once per UI-update tick
    ///
    /// # Arguments
    /// * `delta` - Time since the previous frame
    /// * `simulating` - False while the host has simulation paused
    pub fn on_frame(&mut self, delta: Duration, simulating: bool) {
        let start = Instant::now();

        self.clock.advance(delta, simulating);

        if self.startup.poll_probe() {
            self.ready.arm(&self.clock);
        }
        self.ready.poll(&self.clock);

        let fired = self.timers.process(&self.clock);
        if fired > 0 {
            tracing::trace!("Fired {} timers", fired);
        }

        self.frame_listeners.fire(&self.clock);

        self.frame_timing
            .record(start.elapsed(), self.clock.frame_count());
    }

    // === Ready event ===

    /// Run `callback` once the host UI is ready
    ///
    /// Runs immediately if the UI is already ready.
    pub fn subscribe_ready<F>(&mut self, callback: F) -> Option<SubscriptionKey>
    where
        F: FnOnce() + Send + 'static,
    {
        self.ready.subscribe(callback)
    }

    pub fn unsubscribe_ready(&mut self, key: SubscriptionKey) -> bool {
        self.ready.unsubscribe(key)
    }

    // === Toolbar ===

    /// Add an app-bar button as soon as the host UI is ready
    pub fn register_app_button(&mut self, descriptor: ButtonDescriptor) -> Option<SubscriptionKey> {
        self.register_app_button_with(descriptor, |_| {})
    }

    /// Add an app-bar button as soon as the host UI is ready, then report
    /// the result to `on_registered`
    pub fn register_app_button_with<F>(
        &mut self,
        descriptor: ButtonDescriptor,
        on_registered: F,
    ) -> Option<SubscriptionKey>
    where
        F: FnOnce(Option<ButtonHandle>) + Send + 'static,
    {
        let scene = Arc::clone(&self.scene);
        let toolbar = self.toolbar.clone();

        if !self.ready.is_fired() {
            tracing::debug!("Deferring appbar button {} until UI is ready", descriptor.id);
        }

        self.ready.subscribe(move || {
            let handle = toolbar.add_button(&mut *scene.lock(), descriptor);
            on_registered(handle);
        })
    }

    // === Timers ===

    /// Add a one-shot timer measured in simulation time
    pub fn add_timer<F>(&mut self, delay: Duration, callback: F) -> TimerKey
    where
        F: FnMut() + Send + 'static,
    {
        self.add_timer_with_flags(delay, TimerFlags::empty(), callback)
    }

    /// Add a repeating timer measured in simulation time
    pub fn add_repeating_timer<F>(&mut self, interval: Duration, callback: F) -> TimerKey
    where
        F: FnMut() + Send + 'static,
    {
        self.add_timer_with_flags(interval, TimerFlags::REPEAT, callback)
    }

    pub fn add_timer_with_flags<F>(&mut self, interval: Duration, flags: TimerFlags, callback: F) -> TimerKey
    where
        F: FnMut() + Send + 'static,
    {
        self.timers.add(interval, flags, &self.clock, callback)
    }

    pub fn remove_timer(&mut self, key: TimerKey) -> bool {
        self.timers.remove(key)
    }

    // === Frame listeners ===

    /// Register a callback to be called every frame
    pub fn register_frame_callback<F>(&mut self, callback: F) -> GameFrameKey
    where
        F: FnMut(&HostClock) + Send + 'static,
    {
        self.frame_listeners.register(callback)
    }

    pub fn unregister_frame_callback(&mut self, key: GameFrameKey) -> bool {
        self.frame_listeners.unregister(key)
    }
}
