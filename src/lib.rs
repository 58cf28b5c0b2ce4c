//! # Image Resource
//!
//! Managed image files for web applications: accept an upload, resize it,
//! cut thumbnails, stamp a watermark, move it into place, and delete it again
//! together with everything derived from it.
//!
//! # Architecture: Queue, Then Save
//!
//! An [`ImageResource`] never touches the disk when you ask it to change.
//! Each request is validated and recorded as an [`Action`]; [`ImageResource::save`]
//! replays the queue in order.
//!
//! ```text
//! from_upload ─▶ [delete old] [upload] [resize] [thumbnail] [move] ─save()─▶ disk
//! ```
//!
//! This keeps validation errors (wrong file type, oversized upload) separate
//! from I/O errors, and lets a form handler build up a full set of changes
//! before committing any of them.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`resource`] | The resource, its action queue, upload validation and the save engine |
//! | [`imaging`] | Raster backend trait, the pure-Rust backend, overlay placement |
//! | [`thumbnail`] | Path and URL descriptors for derived thumbnails |
//! | [`resolver`] | Filesystem path to public URL mapping, bundled with config as [`Storage`] |
//! | [`config`] | `image-resource.toml` loading, merging over defaults, validation |
//! | [`format`] | The supported MIME types and their file extensions |
//! | [`naming`] | Thumbnail file naming convention |
//!
//! # Design Decisions
//!
//! ## Injected Storage
//!
//! The site root, the public URL root, and the upload directory are passed in
//! as a [`Storage`] value rather than read from globals or the environment.
//! Tests build a storage over temp dirs; applications load one with
//! [`config::load_config`] and share it across requests.
//!
//! ## Pluggable Raster Backend
//!
//! Pixel work goes through [`imaging::RasterBackend`]. The stock
//! [`RustBackend`] uses the `image` crate and needs no system libraries. The
//! engine only ever sees an opaque handle, so tests run against an in-memory
//! mock that records every call.
//!
//! ## Thumbnails Are Always PNG
//!
//! Whatever the source format, thumbnails are written as
//! `<stem>-thumb[-<name>].png` next to the image. Deleting the image removes
//! every file matching that pattern.

pub mod config;
pub mod format;
pub mod imaging;
pub mod naming;
pub mod resolver;
pub mod resource;
pub mod thumbnail;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::StorageConfig;
pub use format::ImageType;
pub use imaging::{Corner, Padding, RustBackend};
pub use resolver::{PathResolver, RootResolver, Storage};
pub use resource::{Action, ImageResource, ResourceError, UploadStatus, UploadedFile};
pub use thumbnail::Thumbnail;
