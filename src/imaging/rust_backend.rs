//! Pure Rust raster backend over the `image` crate.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `ImageReader::with_guessed_format` + `into_dimensions` |
//! | Decode (JPEG, PNG, GIF) | `ImageReader::decode` (format sniffed from content) |
//! | Resize | `DynamicImage::resize` with `Lanczos3`, fitting within the box |
//! | Pixel access | `DynamicImage::to_rgba8` / `DynamicImage::ImageRgba8` |
//! | Encode | `DynamicImage::save_with_format`, format from the target extension |

use super::backend::{BackendError, Dimensions, ImageInfo, RasterBackend};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Backend using the `image` crate. Handles are [`DynamicImage`]s.
///
/// Resizing keeps the aspect ratio and fits the result inside the requested
/// box.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Open a file and detect its format from the leading bytes.
fn open_sniffed(path: &Path) -> Result<ImageReader<BufReader<File>>, BackendError> {
    Ok(ImageReader::open(path)?.with_guessed_format()?)
}

impl RasterBackend for RustBackend {
    type Handle = DynamicImage;

    fn identify(&self, path: &Path) -> Result<ImageInfo, BackendError> {
        let reader = open_sniffed(path)?;
        let format = reader.format().ok_or_else(|| {
            BackendError::ProcessingFailed(format!("Unrecognized image format: {}", path.display()))
        })?;
        let (width, height) = reader.into_dimensions().map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(ImageInfo {
            width,
            height,
            mime_type: format.to_mime_type().to_string(),
        })
    }

    fn load(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        open_sniffed(path)?.decode().map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
    }

    fn resize(
        &self,
        handle: &mut DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<(), BackendError> {
        if width == 0 || height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "Invalid target size {width}x{height}"
            )));
        }
        *handle = handle.resize(width, height, FilterType::Lanczos3);
        Ok(())
    }

    fn save(&self, handle: &DynamicImage, path: &Path) -> Result<(), BackendError> {
        let format = ImageFormat::from_path(path).map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "Cannot pick output format for {}: {}",
                path.display(),
                e
            ))
        })?;

        // JPEG has no alpha channel, GIF frames are always RGBA
        let encoded = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(handle.to_rgb8()),
            ImageFormat::Gif => DynamicImage::ImageRgba8(handle.to_rgba8()),
            ImageFormat::Png => handle.clone(),
            other => {
                return Err(BackendError::ProcessingFailed(format!(
                    "Unsupported output format: {:?}",
                    other
                )));
            }
        };

        encoded
            .save_with_format(path, format)
            .map_err(|e| BackendError::ProcessingFailed(format!("Encode failed: {}", e)))
    }

    fn dimensions(&self, handle: &DynamicImage) -> Dimensions {
        Dimensions {
            width: handle.width(),
            height: handle.height(),
        }
    }

    fn pixel_buffer(&self, handle: &DynamicImage) -> RgbaImage {
        handle.to_rgba8()
    }

    fn set_pixel_buffer(&self, handle: &mut DynamicImage, buffer: RgbaImage) {
        *handle = DynamicImage::ImageRgba8(buffer);
    }
}
