//! C-compatible exports called by the host loader

use std::ffi::{c_char, CStr};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use tracing::instrument;
use tracing_subscriber::EnvFilter;

use warpkit_core::{CoreConfig, ModContext, SharedScene};
use warpkit_sdk::NodeId;

use crate::error::PluginError;
use crate::mods::{self, BuiltinMods, ModWindow};
use crate::scene::{HostScene, HostSceneApi};

// Plugin metadata - static strings with null terminators for C compatibility
static AUTHOR: &[u8] = b"dollan\0";
static NAME: &[u8] = b"warpkit\0";
static DESCRIPTION: &[u8] = b"Toolbar and UI lifecycle support for game mods\0";
static URL: &[u8] = b"https://github.com/dollannn/warpkit\0";
static LICENSE: &[u8] = b"MIT\0";
static VERSION: &[u8] = b"0.1.0\0";
static LOG_TAG: &[u8] = b"WARPKIT\0";

/// Opaque plugin state handed to the host
///
/// Exports only ever take shared references to it, since the host may call
/// back into warpkit while an export is still running.
pub struct WarpkitPlugin {
    ctx: Mutex<ModContext<HostScene>>,
    scene: SharedScene<HostScene>,
    /// Toggle changes reported while the scene was locked
    pending_toggles: Mutex<Vec<(NodeId, bool)>>,
    mods: BuiltinMods,
}

impl WarpkitPlugin {
    pub fn context(&self) -> MutexGuard<'_, ModContext<HostScene>> {
        self.ctx.lock()
    }

    pub fn mods(&self) -> &BuiltinMods {
        &self.mods
    }

    fn on_frame(&self, delta: Duration, simulating: bool) {
        match self.ctx.try_lock() {
            Some(mut ctx) => ctx.on_frame(delta, simulating),
            None => tracing::warn!("Frame reported from inside a warpkit call, skipping it"),
        }
        self.deliver_pending_toggles();
    }

    fn on_surface_started(&self, surface: &str) {
        match self.ctx.try_lock() {
            Some(mut ctx) => {
                ctx.on_surface_started(surface);
            }
            None => tracing::warn!(
                "Startup of {} reported from inside a warpkit call, ignoring it",
                surface
            ),
        }
    }

    /// Deliver a toggle change now, or queue it if the scene is in use
    fn on_toggle(&self, node: NodeId, state: bool) {
        let Some(mut scene) = self.scene.try_lock() else {
            tracing::debug!("Scene busy, queueing toggle change on {}", node);
            self.pending_toggles.lock().push((node, state));
            return;
        };

        let queued = std::mem::take(&mut *self.pending_toggles.lock());
        for (queued_node, queued_state) in queued {
            dispatch_toggle(&mut scene, queued_node, queued_state);
        }
        dispatch_toggle(&mut scene, node, state);
    }

    fn deliver_pending_toggles(&self) {
        let queued = std::mem::take(&mut *self.pending_toggles.lock());
        if queued.is_empty() {
            return;
        }

        let Some(mut scene) = self.scene.try_lock() else {
            // Still inside a host call; keep them, oldest first, for the next frame
            let mut pending = self.pending_toggles.lock();
            let newer = std::mem::replace(&mut *pending, queued);
            pending.extend(newer);
            return;
        };
        tracing::debug!("Delivering {} queued toggle changes", queued.len());
        for (node, state) in queued {
            dispatch_toggle(&mut scene, node, state);
        }
    }

    fn toggle_value(&self, node: NodeId) -> bool {
        match self.scene.try_lock() {
            Some(scene) => scene.toggle_value(node).unwrap_or(false),
            None => {
                tracing::trace!("Scene busy, reporting {} as off", node);
                false
            }
        }
    }
}

fn dispatch_toggle(scene: &mut HostScene, node: NodeId, state: bool) {
    if !scene.dispatch_toggle(node, state) {
        tracing::trace!("Toggle change on unwatched {}", node);
    }
}

/// Run an export body, stopping a panic at the FFI boundary
///
/// Only effective in unwinding builds; the release profile aborts on panic.
fn guarded<R>(export: &str, fallback: R, body: impl FnOnce() -> R) -> R {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(body)) {
        Ok(result) => result,
        Err(_) => {
            tracing::error!("Panic in {}", export);
            fallback
        }
    }
}

/// Install the tracing subscriber
///
/// `RUST_LOG` wins over the config's debug flag.
fn init_logging(config: &CoreConfig) {
    let default = if config.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

unsafe fn load(
    api: *const HostSceneApi,
    config_path: *const c_char,
) -> Result<Box<WarpkitPlugin>, PluginError> {
    let api = api.as_ref().copied().ok_or(PluginError::NullSceneApi)?;

    let config = if config_path.is_null() {
        CoreConfig::load()?
    } else {
        let path = CStr::from_ptr(config_path).to_str()?;
        CoreConfig::load_from(Path::new(path))?
    };

    init_logging(&config);
    tracing::info!("warpkit loading...");

    let mut ctx = ModContext::new(config, HostScene::new(api));
    let mods = mods::init_all(&mut ctx);

    tracing::info!("warpkit loaded, waiting for {}", ctx.config().startup_surface);
    Ok(Box::new(WarpkitPlugin {
        scene: Arc::clone(ctx.scene()),
        ctx: Mutex::new(ctx),
        pending_toggles: Mutex::new(Vec::new()),
        mods,
    }))
}

/// Called when the host loads the plugin
///
/// # Returns
/// Plugin pointer to pass to every other export, or null on failure with a
/// message written to `error`.
///
/// # Safety
/// - `api` must point to a valid `HostSceneApi` (copied; need not outlive the call)
/// - `config_path` must be a valid null-terminated C string, or null for the default path
/// - `error` must be a valid pointer to a buffer of at least `maxlen` bytes, or null
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn warpkit_plugin_load(
    api: *const HostSceneApi,
    config_path: *const c_char,
    error: *mut c_char,
    maxlen: usize,
) -> *mut WarpkitPlugin {
    let loaded = guarded("warpkit_plugin_load", Err(PluginError::Panicked), || {
        load(api, config_path)
    });
    match loaded {
        Ok(plugin) => Box::into_raw(plugin),
        Err(e) => {
            tracing::error!("Failed to load warpkit: {}", e);
            write_error(error, maxlen, &e.to_string());
            std::ptr::null_mut()
        }
    }
}

/// Called when the host unloads the plugin
///
/// # Safety
/// - `plugin` must come from `warpkit_plugin_load` and not be used afterwards
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn warpkit_plugin_unload(plugin: *mut WarpkitPlugin) -> bool {
    if plugin.is_null() {
        return false;
    }
    tracing::info!("warpkit unloading...");

    let plugin = Box::from_raw(plugin);
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || drop(plugin))) {
        Ok(()) => true,
        Err(_) => {
            tracing::error!("Panic during shutdown");
            false
        }
    }
}

// Metadata exports - these return static strings for the host to display

#[no_mangle]
pub extern "C" fn warpkit_get_author() -> *const c_char {
    AUTHOR.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn warpkit_get_name() -> *const c_char {
    NAME.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn warpkit_get_description() -> *const c_char {
    DESCRIPTION.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn warpkit_get_url() -> *const c_char {
    URL.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn warpkit_get_license() -> *const c_char {
    LICENSE.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn warpkit_get_version() -> *const c_char {
    VERSION.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn warpkit_get_log_tag() -> *const c_char {
    LOG_TAG.as_ptr() as *const c_char
}

/// Called from the host every UI-update tick
///
/// # Safety
/// - `plugin` must be a live pointer from `warpkit_plugin_load` or null
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn warpkit_on_frame(plugin: *const WarpkitPlugin, delta_secs: f32, simulating: bool) {
    let Some(plugin) = plugin.as_ref() else {
        return;
    };
    let delta = Duration::try_from_secs_f32(delta_secs).unwrap_or(Duration::ZERO);
    guarded("warpkit_on_frame", (), || plugin.on_frame(delta, simulating));
}

/// Called from the host when a UI surface finishes its startup routine
///
/// # Safety
/// - `plugin` must be a live pointer from `warpkit_plugin_load` or null
/// - `surface` must be a valid null-terminated C string or null
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn warpkit_on_surface_started(plugin: *const WarpkitPlugin, surface: *const c_char) {
    let Some(plugin) = plugin.as_ref() else {
        return;
    };
    if surface.is_null() {
        return;
    }
    let name = CStr::from_ptr(surface).to_string_lossy();
    guarded("warpkit_on_surface_started", (), || plugin.on_surface_started(&name));
}

/// Called from the host when a watched toggle changes value
///
/// May be called from inside a host scene function; see [`HostSceneApi`].
///
/// # Safety
/// - `plugin` must be a live pointer from `warpkit_plugin_load` or null
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn warpkit_on_toggle(plugin: *const WarpkitPlugin, node: u64, state: bool) {
    let (Some(plugin), Some(node)) = (plugin.as_ref(), NodeId::from_raw(node)) else {
        return;
    };
    guarded("warpkit_on_toggle", (), || plugin.on_toggle(node, state));
}

/// Value a warpkit button should currently display
///
/// # Safety
/// - `plugin` must be a live pointer from `warpkit_plugin_load` or null
#[no_mangle]
pub unsafe extern "C" fn warpkit_toggle_value(plugin: *const WarpkitPlugin, node: u64) -> bool {
    let (Some(plugin), Some(node)) = (plugin.as_ref(), NodeId::from_raw(node)) else {
        return false;
    };
    guarded("warpkit_toggle_value", false, || plugin.toggle_value(node))
}

/// Fill `out` with the example mod's window state
///
/// # Safety
/// - `plugin` must be a live pointer from `warpkit_plugin_load` or null
/// - `out` must be a valid pointer to a `ModWindow` or null
#[no_mangle]
pub unsafe extern "C" fn warpkit_example_window(plugin: *const WarpkitPlugin, out: *mut ModWindow) -> bool {
    let (Some(plugin), Some(out)) = (plugin.as_ref(), out.as_mut()) else {
        return false;
    };
    *out = plugin.mods.example_window();
    true
}

/// Called from the host when the example mod's window is closed or opened
/// by other means than its app-bar button
///
/// # Safety
/// - `plugin` must be a live pointer from `warpkit_plugin_load` or null
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn warpkit_set_example_window_visible(plugin: *const WarpkitPlugin, visible: bool) {
    let Some(plugin) = plugin.as_ref() else {
        return;
    };
    guarded("warpkit_set_example_window_visible", (), || {
        plugin.mods.example.set_window_visible(visible)
    });
}

/// Helper to write an error message to a C buffer
///
/// # Safety
/// - `error` must be a valid pointer or null
/// - `maxlen` must accurately reflect the buffer size
unsafe fn write_error(error: *mut c_char, maxlen: usize, msg: &str) {
    if !error.is_null() && maxlen > 0 {
        let bytes = msg.as_bytes();
        let len = bytes.len().min(maxlen - 1);
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), error as *mut u8, len);
        *error.add(len) = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    use warpkit_core::{MemoryScene, SceneGraph};
    use warpkit_sdk::{surfaces, ActionId};

    use crate::scene::tests::fake_api;

    fn temp_config(name: &str) -> CString {
        let dir = std::env::temp_dir().join(format!("warpkit-plugin-{}-{}", std::process::id(), name));
        CString::new(dir.join("core.toml").to_str().unwrap()).unwrap()
    }

    fn hud() -> CString {
        CString::new(surfaces::FLIGHT_HUD).unwrap()
    }

    #[test]
    fn test_null_api_reports_error() {
        let mut buf = [0 as c_char; 64];
        let plugin = unsafe {
            warpkit_plugin_load(std::ptr::null(), std::ptr::null(), buf.as_mut_ptr(), buf.len())
        };

        assert!(plugin.is_null());
        let msg = unsafe { CStr::from_ptr(buf.as_ptr()) }.to_str().unwrap();
        assert_eq!(msg, "Host scene API is null");
    }

    #[test]
    fn test_write_error_truncates() {
        let mut buf = [0x7f as c_char; 4];
        unsafe { write_error(buf.as_mut_ptr(), buf.len(), "abcdef") };

        let msg = unsafe { CStr::from_ptr(buf.as_ptr()) }.to_str().unwrap();
        assert_eq!(msg, "abc");
    }

    #[test]
    fn test_null_plugin_is_ignored() {
        let mut window = ModWindow {
            visible: true,
            width: 0,
            height: 0,
            title: std::ptr::null(),
        };
        unsafe {
            warpkit_on_frame(std::ptr::null(), 0.016, true);
            warpkit_on_surface_started(std::ptr::null(), std::ptr::null());
            warpkit_on_toggle(std::ptr::null(), 1, true);
            warpkit_set_example_window_visible(std::ptr::null(), true);
            assert!(!warpkit_toggle_value(std::ptr::null(), 1));
            assert!(!warpkit_example_window(std::ptr::null(), &mut window));
            assert!(!warpkit_plugin_unload(std::ptr::null_mut()));
        }
    }

    #[test]
    fn test_host_lifecycle_registers_example_button() {
        let config = CoreConfig::default();
        let (api, fake) = fake_api(MemoryScene::stock_app_bar(&config.toolbar, ActionId(5)));
        let config_path = temp_config("lifecycle");
        let hud = hud();

        unsafe {
            let plugin = warpkit_plugin_load(&api, config_path.as_ptr(), std::ptr::null_mut(), 0);
            assert!(!plugin.is_null());

            warpkit_on_surface_started(plugin, hud.as_ptr());
            for _ in 0..5 {
                warpkit_on_frame(plugin, 0.25, true);
            }

            let container = fake.scene.find(&config.toolbar.container).unwrap();
            let button = fake
                .scene
                .child(container, example_mod::BUTTON_ID)
                .expect("example mod button registered");

            warpkit_on_toggle(plugin, button.0, true);
            assert!(warpkit_toggle_value(plugin, button.0));

            let mut window = std::mem::zeroed::<ModWindow>();
            assert!(warpkit_example_window(plugin, &mut window));
            assert!(window.visible);
            let example_config = (*plugin).mods().example.config().clone();
            assert_eq!(window.width, example_config.window_width);
            assert_eq!(window.height, example_config.window_height);
            assert_eq!(
                CStr::from_ptr(window.title).to_str().unwrap(),
                example_config.window_title
            );

            // Closing the window from the host resets the button
            warpkit_set_example_window_visible(plugin, false);
            assert!(!warpkit_toggle_value(plugin, button.0));

            assert!(warpkit_plugin_unload(plugin));
        }
    }

    #[test]
    fn test_toggle_reported_during_registration_is_queued() {
        let config = CoreConfig::default();
        let (api, fake) = fake_api(MemoryScene::stock_app_bar(&config.toolbar, ActionId(5)));
        let config_path = temp_config("reentrant");
        let hud = hud();

        unsafe {
            let plugin = warpkit_plugin_load(&api, config_path.as_ptr(), std::ptr::null_mut(), 0);
            assert!(!plugin.is_null());

            // Host raises the toggle's change event from inside set_toggle_value
            let reported = Arc::new(Mutex::new(Vec::new()));
            let seen = reported.clone();
            let plugin_addr = plugin as usize;
            fake.on_value_set = Some(Box::new(move |node, _| {
                seen.lock().push(node);
                warpkit_on_toggle(plugin_addr as *const WarpkitPlugin, node, true);
            }));

            warpkit_on_surface_started(plugin, hud.as_ptr());
            for _ in 0..4 {
                warpkit_on_frame(plugin, 0.25, true);
            }

            let container = fake.scene.find(&config.toolbar.container).unwrap();
            let button = fake
                .scene
                .child(container, example_mod::BUTTON_ID)
                .expect("example mod button registered");
            assert_eq!(*reported.lock(), vec![button.0]);

            // Delivered at the end of the frame that registered the button
            assert!((*plugin).pending_toggles.lock().is_empty());
            assert!(warpkit_toggle_value(plugin, button.0));
            assert!((*plugin).mods().example.is_window_visible());

            fake.on_value_set = None;
            assert!(warpkit_plugin_unload(plugin));
        }
    }

    #[test]
    fn test_panicking_frame_callback_is_contained() {
        let config = CoreConfig::default();
        let (api, _) = fake_api(MemoryScene::stock_app_bar(&config.toolbar, ActionId(5)));
        let config_path = temp_config("panic");
        let hud = hud();

        unsafe {
            let plugin = warpkit_plugin_load(&api, config_path.as_ptr(), std::ptr::null_mut(), 0);
            assert!(!plugin.is_null());

            let key = (*plugin)
                .context()
                .register_frame_callback(|_| panic!("mod callback failed"));
            warpkit_on_frame(plugin, 0.25, true);
            assert!((*plugin).context().unregister_frame_callback(key));

            warpkit_on_surface_started(plugin, hud.as_ptr());
            warpkit_on_frame(plugin, 0.25, true);
            assert_eq!((*plugin).context().frame_count(), 2);
            assert!((*plugin).context().ready().is_arming());

            assert!(warpkit_plugin_unload(plugin));
        }
    }
}
