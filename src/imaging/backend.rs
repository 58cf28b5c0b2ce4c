//! Raster backend trait and shared types.
//!
//! The [`RasterBackend`] trait is the capability the resource engine drives
//! when it replays queued actions: identify a file, load it into an in-memory
//! handle, resize the handle, expose and replace its pixels, and encode it
//! back to disk.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording `MockBackend` below.

use image::RgbaImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of a raster handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Metadata read from an image file without keeping it decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// MIME type sniffed from the file contents, e.g. `image/png`.
    pub mime_type: String,
}

/// Trait for raster image backends.
///
/// A handle is an owned, decoded image. `Clone` must produce an independent
/// deep copy: thumbnails are rendered from a clone while the original keeps
/// accumulating mutations.
pub trait RasterBackend {
    type Handle: Clone;

    /// Read dimensions and format of a file on disk.
    fn identify(&self, path: &Path) -> Result<ImageInfo, BackendError>;

    /// Decode a file into a new handle.
    fn load(&self, path: &Path) -> Result<Self::Handle, BackendError>;

    /// Resize the handle in place to the requested dimensions.
    fn resize(&self, handle: &mut Self::Handle, width: u32, height: u32)
    -> Result<(), BackendError>;

    /// Encode the handle to `path`. The format follows the file extension.
    fn save(&self, handle: &Self::Handle, path: &Path) -> Result<(), BackendError>;

    fn dimensions(&self, handle: &Self::Handle) -> Dimensions;

    /// Copy of the handle's pixels as straight RGBA.
    fn pixel_buffer(&self, handle: &Self::Handle) -> RgbaImage;

    /// Replace the handle's pixels (and dimensions) with `buffer`.
    fn set_pixel_buffer(&self, handle: &mut Self::Handle, buffer: RgbaImage);
}
