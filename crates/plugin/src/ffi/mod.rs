//! C-compatible entry points

pub mod exports;

pub use exports::WarpkitPlugin;
