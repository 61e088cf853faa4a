//! Error types for app-bar button registration

use warpkit_sdk::ComponentKind;

/// Why a button could not be added
///
/// All of these are expected outcomes on a host whose UI layout differs
/// from the configured paths.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// Container path did not resolve
    #[error("Couldn't find appbar container at {0:?}")]
    ContainerMissing(String),

    /// Template button is not under the container
    #[error("Couldn't find template button {0:?} in appbar")]
    TemplateMissing(String),

    /// Expected child below the template or clone is missing
    #[error("Couldn't find {0:?} under the button")]
    ChildMissing(String),

    /// Node lacks a required component
    #[error("{node:?} has no {kind} component")]
    ComponentMissing { node: String, kind: ComponentKind },

    /// Template toggle has no action to share
    #[error("Template button has no toggle action")]
    ActionMissing,

    /// Host refused to clone the template
    #[error("Failed to clone template button")]
    CloneFailed,

    /// Host rejected a mutation on the clone
    #[error("Failed to {0} on the new button")]
    UpdateFailed(&'static str),
}
