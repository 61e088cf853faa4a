//! Host scene graph over FFI
//!
//! The host hands us a table of C functions on load. [`HostScene`] wraps that
//! table in the [`SceneGraph`] trait. Toggle listeners cannot cross the FFI
//! boundary, so they stay on the Rust side: the host is asked to watch a
//! toggle and reports changes back through `warpkit_on_toggle`, which lands
//! in [`HostScene::dispatch_toggle`].

use std::collections::HashMap;
use std::ffi::{c_char, c_void, CString};

use warpkit_core::{Icon, SceneGraph, ToggleListener, ToggleProperty};
use warpkit_sdk::{ActionId, ComponentKind, NodeId};

/// Scene-graph functions exported by the host
///
/// Node and action handles are passed as raw `u64`; 0 means "none".
/// Strings are null-terminated UTF-8 and only borrowed for the call.
///
/// # Re-entrancy
/// While one of these functions runs, warpkit holds its scene lock. The host
/// may call `warpkit_on_toggle` from inside any of them (for example when
/// `set_toggle_value` raises a value-changed event synchronously): the change
/// is queued and delivered once the lock is released, at the latest at the
/// end of the current `warpkit_on_frame`. Re-entrant `warpkit_on_frame` and
/// `warpkit_on_surface_started` calls are dropped with a warning.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct HostSceneApi {
    /// Opaque host pointer passed back as the first argument of every call
    pub host: *mut c_void,
    pub find: extern "C" fn(*mut c_void, *const c_char) -> u64,
    pub child: extern "C" fn(*mut c_void, u64, *const c_char) -> u64,
    pub has_component: extern "C" fn(*mut c_void, u64, u32) -> bool,
    pub instantiate: extern "C" fn(*mut c_void, u64, u64) -> u64,
    pub destroy: extern "C" fn(*mut c_void, u64),
    pub set_name: extern "C" fn(*mut c_void, u64, *const c_char) -> bool,
    pub set_text: extern "C" fn(*mut c_void, u64, *const c_char) -> bool,
    /// Encoded image bytes, byte length, edge length in pixels
    pub set_icon: extern "C" fn(*mut c_void, u64, *const u8, usize, u32) -> bool,
    /// Start forwarding value changes of this toggle to `warpkit_on_toggle`
    pub watch_toggle: extern "C" fn(*mut c_void, u64) -> bool,
    pub set_toggle_value: extern "C" fn(*mut c_void, u64, bool) -> bool,
    pub toggle_action: extern "C" fn(*mut c_void, u64) -> u64,
    pub bind_toggle_action: extern "C" fn(*mut c_void, u64, u64) -> bool,
}

/// Scene graph backed by host function pointers
pub struct HostScene {
    api: HostSceneApi,
    toggle_listeners: HashMap<NodeId, Vec<ToggleListener>>,
    toggle_values: HashMap<NodeId, ToggleProperty>,
}

// SAFETY: The host pointer is only dereferenced by host functions, and the
// host only calls into warpkit from its UI-update thread.
unsafe impl Send for HostScene {}

impl HostScene {
    pub fn new(api: HostSceneApi) -> Self {
        Self {
            api,
            toggle_listeners: HashMap::new(),
            toggle_values: HashMap::new(),
        }
    }

    /// Deliver a toggle change reported by the host
    ///
    /// # Returns
    /// `false` if nothing on the Rust side was watching `node`
    pub fn dispatch_toggle(&mut self, node: NodeId, state: bool) -> bool {
        if let Some(value) = self.toggle_values.get(&node) {
            value.set(state);
        }

        match self.toggle_listeners.get_mut(&node) {
            Some(listeners) => {
                for listener in listeners.iter_mut() {
                    listener(state);
                }
                true
            }
            None => false,
        }
    }

    /// Value bound to a toggle through `bind_toggle_value`
    pub fn toggle_value(&self, node: NodeId) -> Option<bool> {
        self.toggle_values.get(&node).map(ToggleProperty::get)
    }
}

/// Convert to a C string, rejecting interior NULs
fn c_string(s: &str) -> Option<CString> {
    match CString::new(s) {
        Ok(c) => Some(c),
        Err(_) => {
            tracing::warn!("String {:?} contains a NUL byte, not passing it to host", s);
            None
        }
    }
}

impl SceneGraph for HostScene {
    fn find(&self, path: &str) -> Option<NodeId> {
        let path = c_string(path)?;
        NodeId::from_raw((self.api.find)(self.api.host, path.as_ptr()))
    }

    fn child(&self, node: NodeId, name: &str) -> Option<NodeId> {
        let name = c_string(name)?;
        NodeId::from_raw((self.api.child)(self.api.host, node.0, name.as_ptr()))
    }

    fn has_component(&self, node: NodeId, kind: ComponentKind) -> bool {
        (self.api.has_component)(self.api.host, node.0, kind as u32)
    }

    fn instantiate(&mut self, template: NodeId, parent: NodeId) -> Option<NodeId> {
        NodeId::from_raw((self.api.instantiate)(self.api.host, template.0, parent.0))
    }

    fn destroy(&mut self, node: NodeId) {
        self.toggle_listeners.remove(&node);
        self.toggle_values.remove(&node);
        (self.api.destroy)(self.api.host, node.0);
    }

    fn set_name(&mut self, node: NodeId, name: &str) -> bool {
        c_string(name).is_some_and(|name| (self.api.set_name)(self.api.host, node.0, name.as_ptr()))
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> bool {
        c_string(text).is_some_and(|text| (self.api.set_text)(self.api.host, node.0, text.as_ptr()))
    }

    fn set_icon(&mut self, node: NodeId, icon: &Icon) -> bool {
        let bytes = icon.bytes();
        (self.api.set_icon)(self.api.host, node.0, bytes.as_ptr(), bytes.len(), icon.size())
    }

    fn add_toggle_listener(&mut self, node: NodeId, listener: ToggleListener) -> bool {
        if !self.toggle_listeners.contains_key(&node)
            && !(self.api.watch_toggle)(self.api.host, node.0)
        {
            return false;
        }

        self.toggle_listeners.entry(node).or_default().push(listener);
        true
    }

    fn bind_toggle_value(&mut self, node: NodeId, value: ToggleProperty) -> bool {
        if !(self.api.set_toggle_value)(self.api.host, node.0, value.get()) {
            return false;
        }
        self.toggle_values.insert(node, value);
        true
    }

    fn toggle_action(&self, node: NodeId) -> Option<ActionId> {
        ActionId::from_raw((self.api.toggle_action)(self.api.host, node.0))
    }

    fn bind_toggle_action(&mut self, node: NodeId, action: ActionId) -> bool {
        (self.api.bind_toggle_action)(self.api.host, node.0, action.0)
    }
}
