//! Host UI handle type definitions
//!
//! These are opaque handles representing objects owned by the host's scene
//! graph. We don't need their internal structure - only a stable identity
//! that the host can resolve back to its own object.

use std::fmt;

/// Handle to a node (game object) in the host scene graph
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Sentinel the host uses for "no node"
    pub const NULL: NodeId = NodeId(0);

    /// Convert a raw host value, mapping the null sentinel to `None`
    pub fn from_raw(raw: u64) -> Option<Self> {
        (raw != 0).then_some(NodeId(raw))
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Handle to a host UI action (e.g. "close the app tray")
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(pub u64);

impl ActionId {
    pub fn from_raw(raw: u64) -> Option<Self> {
        (raw != 0).then_some(ActionId(raw))
    }
}

/// Component types looked up on a node
///
/// Discriminants are part of the host ABI.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Text label (TextMeshPro on the reference host)
    Text = 1,
    /// Image with a replaceable sprite
    Image = 2,
    /// Toggle with a boolean state and change notifications
    Toggle = 3,
    /// Binding that writes a boolean property into a toggle
    ToggleValue = 4,
    /// Binding that runs a host action when the toggle is pressed
    ToggleAction = 5,
}

impl ComponentKind {
    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Text => "Text",
            ComponentKind::Image => "Image",
            ComponentKind::Toggle => "Toggle",
            ComponentKind::ToggleValue => "ToggleValue",
            ComponentKind::ToggleAction => "ToggleAction",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
