//! Calibration Image Overlay
//!
//! Reads the cells a map addresses out of a raw memory image and reduces them
//! to minimum and maximum values.

mod overlay;

pub use overlay::{MapData, OverlayError, Region};

use std::io;
use std::path::Path;

/// A raw memory image, addressed from offset 0.
///
/// The image has no byte order of its own: multi-byte cells are read in the
/// order their [`ValueEncoding`](crate::mappack::ValueEncoding) names.
#[derive(Debug, Clone, Default)]
pub struct MemoryImage {
    data: Vec<u8>,
}

impl MemoryImage {
    /// Wrap image bytes already in memory
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Load an image file
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let data = std::fs::read(path)?;
        Ok(Self::new(data))
    }

    /// The whole image
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Image size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the image holds no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
