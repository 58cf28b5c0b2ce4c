//! Filename conventions for derived thumbnail artifacts.
//!
//! A thumbnail lives next to its main image and shares its stem:
//!
//! ```text
//! /img/photo.jpg               main image
//! /img/photo-thumb.png         default thumbnail
//! /img/photo-thumb-small.png   thumbnail named "small"
//! ```
//!
//! Thumbnails are always PNG, whatever the main image format is. The same
//! convention drives cleanup: deleting a resource removes the main file and
//! every `<stem>-thumb*.png` sibling.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Suffix inserted between the stem and the optional thumbnail name.
pub const THUMB_SUFFIX: &str = "-thumb";

/// Extension every thumbnail is encoded with.
pub const THUMB_EXTENSION: &str = "png";

/// Derive the thumbnail path for `path`.
///
/// - `"/img/photo.jpg"`, `None` → `"/img/photo-thumb.png"`
/// - `"/img/photo.jpg"`, `Some("small")` → `"/img/photo-thumb-small.png"`
/// - `"/img/photo"`, `None` → `"/img/photo-thumb.png"`
///
/// Path separators in `name` become `-`, so a thumbnail always lands next to
/// its image.
pub fn thumbnail_path(path: &Path, name: Option<&str>) -> PathBuf {
    let stem = path
        .file_stem()
        .map(OsStr::to_string_lossy)
        .unwrap_or_default();
    let label = name
        .map(|n| format!("-{}", n.replace(['/', '\\'], "-")))
        .unwrap_or_default();
    path.with_file_name(format!("{stem}{THUMB_SUFFIX}{label}.{THUMB_EXTENSION}"))
}

/// Whether `file_name` is a thumbnail artifact of an image with stem `stem`.
///
/// Matches `<stem>-thumb*.png`; the extension match is case-sensitive like
/// the names [`thumbnail_path`] produces.
pub fn is_thumbnail_of(stem: &str, file_name: &str) -> bool {
    let Some(rest) = file_name.strip_prefix(stem) else {
        return false;
    };
    rest.starts_with(THUMB_SUFFIX) && rest.ends_with(&format!(".{THUMB_EXTENSION}"))
}
