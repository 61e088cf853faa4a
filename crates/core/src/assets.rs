//! Icon loading
//!
//! Icons are read from disk as encoded image bytes and handed to the host,
//! which decodes and uploads them. A missing file is not an error: the icon
//! falls back to a blank square so the button still renders.

use std::path::Path;

/// Default icon edge length in pixels
pub const DEFAULT_ICON_SIZE: u32 = 24;

/// Encoded icon image plus its intended edge length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    size: u32,
    data: Vec<u8>,
}

impl Icon {
    /// A blank (transparent) square icon
    pub fn blank(size: u32) -> Self {
        Self {
            size,
            data: Vec::new(),
        }
    }

    /// Wrap already-encoded image bytes
    pub fn from_bytes(data: Vec<u8>, size: u32) -> Self {
        Self { size, data }
    }

    /// Load an icon from an image file
    ///
    /// Returns a blank icon if the file does not exist or cannot be read.
    pub fn load(path: impl AsRef<Path>, size: u32) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!("Icon {:?} not found, using blank icon", path);
            return Self::blank(size);
        }

        match std::fs::read(path) {
            Ok(data) => Self::from_bytes(data, size),
            Err(e) => {
                tracing::warn!("Failed to read icon {:?}: {}", path, e);
                Self::blank(size)
            }
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Encoded image bytes (empty for a blank icon)
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn is_blank(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for Icon {
    fn default() -> Self {
        Self::blank(DEFAULT_ICON_SIZE)
    }
}
