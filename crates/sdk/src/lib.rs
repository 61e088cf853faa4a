//! warpkit SDK - Host UI Type Definitions
//!
//! This crate contains the plain type definitions shared between the host
//! bridge and the warpkit core. It has no dependencies and compiles quickly,
//! allowing parallel compilation of dependent crates.
//!
//! # Modules
//!
//! - [`interfaces`] - Node, action and component handles passed across the host boundary
//! - [`surfaces`] - Well-known host surface names and scene-graph paths

pub mod interfaces;
pub mod surfaces;

pub use interfaces::*;
pub use surfaces::HOST_SURFACES;
