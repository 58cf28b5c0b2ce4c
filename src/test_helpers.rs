//! Shared test utilities.
//!
//! Synthetic image writers plus a sandboxed [`Storage`] whose root and
//! upload directory both live in temp dirs, so resource tests can move
//! files around without touching anything real.
//!
//! ```rust,ignore
//! let sandbox = Sandbox::new();
//! let upload = sandbox.stage_upload("phpA1b2", b"bytes", "image/png");
//! let target = sandbox.site_path("img/photo.png");
//! ```

use crate::config::StorageConfig;
use crate::resolver::Storage;
use crate::resource::UploadedFile;
use image::{ImageEncoder, RgbImage, RgbaImage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =========================================================================
// Synthetic images
// =========================================================================

/// Write a small valid JPEG with a gradient so resizes have something to do.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a PNG with the same gradient, fully opaque.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

// =========================================================================
// Storage sandbox
// =========================================================================

/// A site root and an upload directory, removed on drop.
pub struct Sandbox {
    pub site: TempDir,
    pub uploads: TempDir,
    pub storage: Storage,
}

impl Sandbox {
    pub fn new() -> Self {
        let site = TempDir::new().unwrap();
        let uploads = TempDir::new().unwrap();
        let storage = Storage::new(StorageConfig {
            filesystem_root: site.path().to_path_buf(),
            public_root: "https://example.com/".into(),
            upload_dir: uploads.path().to_path_buf(),
        });
        Self {
            site,
            uploads,
            storage,
        }
    }

    /// Absolute path of `relative` under the site root.
    pub fn site_path(&self, relative: &str) -> PathBuf {
        self.site.path().join(relative)
    }

    /// Drop `bytes` into the upload directory the way a transport would.
    pub fn stage_upload(&self, tmp_name: &str, bytes: &[u8], mime_type: &str) -> UploadedFile {
        let tmp_path = self.uploads.path().join(tmp_name);
        std::fs::write(&tmp_path, bytes).unwrap();
        UploadedFile::new(tmp_path, mime_type)
    }
}
