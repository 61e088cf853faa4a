//! Host scene-graph access
//!
//! warpkit never owns the UI tree; it reaches into the host's through the
//! [`SceneGraph`] trait. Every lookup can fail and returns `Option`, since
//! hierarchical paths into a third-party UI break whenever the host is
//! updated. Every mutation reports success as `bool`.
//!
//! Implementations:
//! - [`MemoryScene`] - in-process tree for tests and headless runs
//! - `HostScene` in the plugin crate - forwards to host function pointers

pub mod memory;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use warpkit_sdk::{ActionId, ComponentKind, NodeId};

use crate::assets::Icon;

pub use memory::MemoryScene;

/// Listener attached to a toggle's value-changed notification
pub type ToggleListener = Box<dyn FnMut(bool) + Send + 'static>;

/// Shared boolean bound to a toggle's displayed state
#[derive(Debug, Clone, Default)]
pub struct ToggleProperty(Arc<AtomicBool>);

impl ToggleProperty {
    pub fn new(initial: bool) -> Self {
        Self(Arc::new(AtomicBool::new(initial)))
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, value: bool) {
        self.0.store(value, Ordering::Relaxed);
    }
}

/// Operations warpkit needs from the host scene graph
pub trait SceneGraph {
    /// Find a node by `/`-separated path from a scene root
    fn find(&self, path: &str) -> Option<NodeId>;

    /// Find a direct child by name
    fn child(&self, node: NodeId, name: &str) -> Option<NodeId>;

    /// Check whether a node carries a component
    fn has_component(&self, node: NodeId, kind: ComponentKind) -> bool;

    /// Deep-copy `template` and attach the copy under `parent`
    fn instantiate(&mut self, template: NodeId, parent: NodeId) -> Option<NodeId>;

    /// Remove a node and its subtree
    fn destroy(&mut self, node: NodeId);

    fn set_name(&mut self, node: NodeId, name: &str) -> bool;

    /// Replace the text of a node's text component
    fn set_text(&mut self, node: NodeId, text: &str) -> bool;

    /// Replace the sprite of a node's image component
    fn set_icon(&mut self, node: NodeId, icon: &Icon) -> bool;

    /// Subscribe to a toggle's value changes
    fn add_toggle_listener(&mut self, node: NodeId, listener: ToggleListener) -> bool;

    /// Bind the value a toggle displays
    fn bind_toggle_value(&mut self, node: NodeId, value: ToggleProperty) -> bool;

    /// Action run when the toggle is pressed
    fn toggle_action(&self, node: NodeId) -> Option<ActionId>;

    fn bind_toggle_action(&mut self, node: NodeId, action: ActionId) -> bool;

    /// Follow a chain of child names from `node`
    fn descendant(&self, node: NodeId, names: &[&str]) -> Option<NodeId> {
        names
            .iter()
            .try_fold(node, |current, name| self.child(current, name))
    }
}
