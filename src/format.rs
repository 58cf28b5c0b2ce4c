//! Supported image formats and their MIME/extension mapping.
//!
//! The set is closed: JPEG, PNG and GIF. Every accepted MIME spelling maps to
//! exactly one canonical file extension:
//!
//! | MIME type | Extension |
//! |---|---|
//! | `image/jpeg`, `image/jpg`, `image/pjpeg` | `jpg` |
//! | `image/png` | `png` |
//! | `image/gif` | `gif` |
//!
//! Anything else is rejected before a resource queues work for it.

use std::path::{Path, PathBuf};

/// MIME spellings accepted from upload transports, with the format each maps to.
const SUPPORTED_MIME_TYPES: &[(&str, ImageType)] = &[
    ("image/jpeg", ImageType::Jpeg),
    ("image/jpg", ImageType::Jpeg),
    ("image/pjpeg", ImageType::Jpeg),
    ("image/png", ImageType::Png),
    ("image/gif", ImageType::Gif),
];

/// A supported main-image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageType {
    Jpeg,
    Png,
    Gif,
}

impl ImageType {
    /// Look up a declared MIME type. Matching ignores ASCII case and
    /// surrounding whitespace; parameters such as `; charset=` are not accepted.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim();
        SUPPORTED_MIME_TYPES
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(mime))
            .map(|(_, image_type)| *image_type)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageType::Jpeg),
            "png" => Some(ImageType::Png),
            "gif" => Some(ImageType::Gif),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageType::Jpeg => "jpg",
            ImageType::Png => "png",
            ImageType::Gif => "gif",
        }
    }

    /// Canonical MIME type.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageType::Jpeg => "image/jpeg",
            ImageType::Png => "image/png",
            ImageType::Gif => "image/gif",
        }
    }
}

/// Replace the extension of `path` with `ext`.
///
/// A path without an extension gets one appended.
pub fn replace_extension(path: &Path, ext: &str) -> PathBuf {
    path.with_extension(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jpeg_spellings_map_to_jpg() {
        for mime in ["image/jpeg", "image/jpg", "image/pjpeg"] {
            let t = ImageType::from_mime(mime).unwrap();
            assert_eq!(t, ImageType::Jpeg);
            assert_eq!(t.extension(), "jpg");
        }
    }

    #[test]
    fn png_and_gif_map_to_own_extension() {
        assert_eq!(ImageType::from_mime("image/png").unwrap().extension(), "png");
        assert_eq!(ImageType::from_mime("image/gif").unwrap().extension(), "gif");
    }

    #[test]
    fn unsupported_mime_rejected() {
        for mime in ["image/webp", "image/tiff", "text/plain", "", "image/"] {
            assert_eq!(ImageType::from_mime(mime), None, "{mime} should be rejected");
        }
    }

    #[test]
    fn mime_lookup_ignores_case_and_whitespace() {
        assert_eq!(ImageType::from_mime(" Image/PNG "), Some(ImageType::Png));
    }

    #[test]
    fn every_supported_mime_round_trips_through_canonical() {
        for (mime, expected) in SUPPORTED_MIME_TYPES {
            let t = ImageType::from_mime(mime).unwrap();
            assert_eq!(t, *expected);
            assert_eq!(ImageType::from_mime(t.mime_type()), Some(t));
            assert_eq!(ImageType::from_extension(t.extension()), Some(t));
        }
    }

    #[test]
    fn from_path_reads_extension() {
        assert_eq!(
            ImageType::from_path(Path::new("/img/a.JPEG")),
            Some(ImageType::Jpeg)
        );
        assert_eq!(ImageType::from_path(Path::new("/img/a.webp")), None);
        assert_eq!(ImageType::from_path(Path::new("/img/noext")), None);
    }

    #[test]
    fn replace_extension_swaps_last_extension() {
        assert_eq!(
            replace_extension(Path::new("/img/photo.jpeg"), "png"),
            PathBuf::from("/img/photo.png")
        );
        assert_eq!(
            replace_extension(Path::new("/img/photo.tar.gz"), "gif"),
            PathBuf::from("/img/photo.tar.gif")
        );
    }

    #[test]
    fn replace_extension_appends_when_missing() {
        assert_eq!(
            replace_extension(Path::new("/tmp/upload123"), "jpg"),
            PathBuf::from("/tmp/upload123.jpg")
        );
    }
}
