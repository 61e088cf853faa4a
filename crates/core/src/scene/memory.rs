//! In-memory scene graph
//!
//! A small stand-in for the host's UI tree. It supports exactly what
//! [`SceneGraph`] needs plus builder and inspection helpers, and drives
//! toggle listeners the way the host's toggle component would.

use std::collections::HashMap;

use warpkit_sdk::{ActionId, ComponentKind, NodeId};

use super::{SceneGraph, ToggleListener, ToggleProperty};
use crate::assets::Icon;
use crate::toolbar::ToolbarPaths;

#[derive(Default)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    components: Vec<ComponentKind>,
    text: Option<String>,
    icon: Option<Icon>,
    toggle_state: bool,
    toggle_listeners: Vec<ToggleListener>,
    toggle_value: Option<ToggleProperty>,
    action: Option<ActionId>,
}

/// In-process scene graph
pub struct MemoryScene {
    nodes: HashMap<NodeId, Node>,
    roots: Vec<NodeId>,
    next_id: u64,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            roots: Vec::new(),
            // 0 is the host's null handle
            next_id: 1,
        }
    }

    /// Build a scene shaped like the host's app bar
    ///
    /// Creates the container at `paths.container` holding a template button
    /// with label, icon, toggle, value binding and a close-tray action.
    pub fn stock_app_bar(paths: &ToolbarPaths, close_tray: ActionId) -> Self {
        let mut scene = Self::new();
        let container = scene.build_path(&paths.container);

        let template = scene.add_child(container, &paths.template);
        for kind in [
            ComponentKind::Toggle,
            ComponentKind::ToggleValue,
            ComponentKind::ToggleAction,
        ] {
            scene.add_component(template, kind);
        }
        scene.set_action(template, close_tray);

        let content = scene.add_child(template, &paths.content);
        let title = scene.add_child(content, &paths.title);
        scene.add_component(title, ComponentKind::Text);
        scene.set_text(title, "Resource Manager");

        let icon_group = scene.add_child(content, &paths.icon_group);
        let icon = scene.add_child(icon_group, &paths.icon);
        scene.add_component(icon, ComponentKind::Image);

        scene
    }

    fn allocate(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                name: name.to_string(),
                parent,
                ..Node::default()
            },
        );
        id
    }

    /// Add a top-level node
    pub fn add_root(&mut self, name: &str) -> NodeId {
        let id = self.allocate(name, None);
        self.roots.push(id);
        id
    }

    /// Add a child under `parent`
    ///
    /// # Panics
    /// Panics if `parent` is not in the scene
    pub fn add_child(&mut self, parent: NodeId, name: &str) -> NodeId {
        assert!(self.nodes.contains_key(&parent), "unknown parent {parent}");
        let id = self.allocate(name, Some(parent));
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(id);
        }
        id
    }

    /// Create any missing nodes along a `/`-separated path
    pub fn build_path(&mut self, path: &str) -> NodeId {
        let mut segments = path.trim_start_matches('/').split('/');
        let root_name = segments.next().unwrap_or_default();
        let mut current = match self.find_root(root_name) {
            Some(root) => root,
            None => self.add_root(root_name),
        };

        for segment in segments {
            current = match self.child(current, segment) {
                Some(child) => child,
                None => self.add_child(current, segment),
            };
        }
        current
    }

    pub fn add_component(&mut self, node: NodeId, kind: ComponentKind) {
        if let Some(node) = self.nodes.get_mut(&node) {
            if !node.components.contains(&kind) {
                node.components.push(kind);
            }
        }
    }

    pub fn remove_component(&mut self, node: NodeId, kind: ComponentKind) {
        if let Some(node) = self.nodes.get_mut(&node) {
            node.components.retain(|k| *k != kind);
        }
    }

    /// Set the action a toggle runs when pressed
    pub fn set_action(&mut self, node: NodeId, action: ActionId) {
        if let Some(node) = self.nodes.get_mut(&node) {
            node.action = Some(action);
        }
    }

    fn find_root(&self, name: &str) -> Option<NodeId> {
        self.roots
            .iter()
            .copied()
            .find(|id| self.nodes.get(id).is_some_and(|n| n.name == name))
    }

    fn get(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(&node)
    }

    /// Get a node only if it carries `kind`
    fn with_component(&mut self, node: NodeId, kind: ComponentKind) -> Option<&mut Node> {
        self.nodes
            .get_mut(&node)
            .filter(|n| n.components.contains(&kind))
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.get(node).map(|n| n.name.as_str())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.get(node).and_then(|n| n.text.as_deref())
    }

    pub fn icon(&self, node: NodeId) -> Option<&Icon> {
        self.get(node).and_then(|n| n.icon.as_ref())
    }

    /// Current value of the toggle's bound property, if one is bound
    pub fn toggle_value(&self, node: NodeId) -> Option<bool> {
        self.get(node)
            .and_then(|n| n.toggle_value.as_ref())
            .map(ToggleProperty::get)
    }

    /// Action bound to the toggle, ignoring whether the component exists
    pub fn bound_action(&self, node: NodeId) -> Option<ActionId> {
        self.get(node).and_then(|n| n.action)
    }

    /// Simulate the user flipping a toggle
    ///
    /// Updates the bound property and notifies listeners.
    ///
    /// # Returns
    /// `false` if the node has no toggle
    pub fn press_toggle(&mut self, node: NodeId, state: bool) -> bool {
        let Some(node) = self.with_component(node, ComponentKind::Toggle) else {
            return false;
        };

        node.toggle_state = state;
        if let Some(value) = &node.toggle_value {
            value.set(state);
        }
        for listener in node.toggle_listeners.iter_mut() {
            listener(state);
        }
        true
    }

    fn clone_subtree(&mut self, source: NodeId, parent: NodeId, name: String) -> Option<NodeId> {
        let (components, text, icon, action, toggle_state, children) = {
            let node = self.get(source)?;
            (
                node.components.clone(),
                node.text.clone(),
                node.icon.clone(),
                node.action,
                node.toggle_state,
                node.children.clone(),
            )
        };

        let id = self.add_child(parent, &name);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.components = components;
            node.text = text;
            node.icon = icon;
            node.action = action;
            node.toggle_state = toggle_state;
        }

        for child in children {
            let child_name = self.get(child)?.name.clone();
            self.clone_subtree(child, id, child_name)?;
        }
        Some(id)
    }
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph for MemoryScene {
    fn find(&self, path: &str) -> Option<NodeId> {
        let mut segments = path.trim_start_matches('/').split('/');
        let root = self.find_root(segments.next()?)?;
        segments.try_fold(root, |current, name| self.child(current, name))
    }

    fn child(&self, node: NodeId, name: &str) -> Option<NodeId> {
        self.get(node)?
            .children
            .iter()
            .copied()
            .find(|id| self.get(*id).is_some_and(|n| n.name == name))
    }

    fn has_component(&self, node: NodeId, kind: ComponentKind) -> bool {
        self.get(node).is_some_and(|n| n.components.contains(&kind))
    }

    fn instantiate(&mut self, template: NodeId, parent: NodeId) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let name = format!("{}(Clone)", self.get(template)?.name);
        self.clone_subtree(template, parent, name)
    }

    fn destroy(&mut self, node: NodeId) {
        let Some(removed) = self.nodes.remove(&node) else {
            return;
        };

        match removed.parent {
            Some(parent) => {
                if let Some(parent) = self.nodes.get_mut(&parent) {
                    parent.children.retain(|c| *c != node);
                }
            }
            None => self.roots.retain(|r| *r != node),
        }

        for child in removed.children {
            self.destroy(child);
        }
    }

    fn set_name(&mut self, node: NodeId, name: &str) -> bool {
        match self.nodes.get_mut(&node) {
            Some(node) => {
                node.name = name.to_string();
                true
            }
            None => false,
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> bool {
        match self.with_component(node, ComponentKind::Text) {
            Some(node) => {
                node.text = Some(text.to_string());
                true
            }
            None => false,
        }
    }

    fn set_icon(&mut self, node: NodeId, icon: &Icon) -> bool {
        match self.with_component(node, ComponentKind::Image) {
            Some(node) => {
                node.icon = Some(icon.clone());
                true
            }
            None => false,
        }
    }

    fn add_toggle_listener(&mut self, node: NodeId, listener: ToggleListener) -> bool {
        match self.with_component(node, ComponentKind::Toggle) {
            Some(node) => {
                node.toggle_listeners.push(listener);
                true
            }
            None => false,
        }
    }

    fn bind_toggle_value(&mut self, node: NodeId, value: ToggleProperty) -> bool {
        match self.with_component(node, ComponentKind::ToggleValue) {
            Some(node) => {
                node.toggle_state = value.get();
                node.toggle_value = Some(value);
                true
            }
            None => false,
        }
    }

    fn toggle_action(&self, node: NodeId) -> Option<ActionId> {
        self.get(node)
            .filter(|n| n.components.contains(&ComponentKind::ToggleAction))
            .and_then(|n| n.action)
    }

    fn bind_toggle_action(&mut self, node: NodeId, action: ActionId) -> bool {
        match self.with_component(node, ComponentKind::ToggleAction) {
            Some(node) => {
                node.action = Some(action);
                true
            }
            None => false,
        }
    }
}
