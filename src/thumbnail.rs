//! Thumbnail descriptors.

use crate::naming::thumbnail_path;
use crate::resolver::PathResolver;
use std::path::{Path, PathBuf};

/// Where a thumbnail lives and the URL it is served at.
///
/// A descriptor says nothing about whether the file exists: it is created
/// by queueing a thumbnail action on the parent resource and saving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    path: PathBuf,
    url: Option<String>,
}

impl Thumbnail {
    /// Describe the thumbnail called `name` of the image at `image_path`.
    pub fn for_image(image_path: &Path, name: Option<&str>, resolver: &dyn PathResolver) -> Self {
        let path = thumbnail_path(image_path, name);
        let url = resolver.resolve(&path);
        Self { path, url }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when the thumbnail is outside the public root.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}
