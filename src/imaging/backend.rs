//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the batch driver
//! needs: identify, read_metadata, and render.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! and `imageproc` crates. Tests use a recording mock.

use super::params::{Orientation, RenderParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image too large: {width}x{height} exceeds {max_pixels} pixels")]
    TooLarge {
        width: u32,
        height: u32,
        max_pixels: u64,
    },
    #[error("Font error: {0}")]
    Font(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Embedded image metadata extracted from EXIF IFD0.
///
/// - `orientation`: EXIF Orientation (`0x0112`); `None` when absent or invalid
/// - `description`: EXIF ImageDescription (`0x010E`); `None` when absent or blank
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageMetadata {
    pub orientation: Option<Orientation>,
    pub description: Option<String>,
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Get image dimensions as stored (before orientation).
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Read embedded EXIF metadata (orientation, description).
    fn read_metadata(&self, path: &Path) -> Result<ImageMetadata, BackendError>;

    /// Decode, orient, resize, caption and encode one image.
    fn render(&self, params: &RenderParams) -> Result<Dimensions, BackendError>;
}
