//! The image resource and its deferred action engine.
//!
//! An [`ImageResource`] collects intent first and touches the disk later.
//! Mutators ([`upload`](ImageResource::upload),
//! [`resize`](ImageResource::resize),
//! [`create_thumbnail`](ImageResource::create_thumbnail),
//! [`overlay`](ImageResource::overlay), [`move_to`](ImageResource::move_to))
//! validate their input and append an [`Action`] to a FIFO queue.
//! [`save`](ImageResource::save) replays the queue in order and writes the
//! result once.
//!
//! ```text
//! resize(800, 600) ─┐
//! create_thumbnail ─┼─▶ queue ──save()──▶ load ▶ resize ▶ thumb ▶ move ▶ flush
//! move_to(...)   ───┘
//! ```
//!
//! ## Ordering
//!
//! The queue is never reordered or deduplicated. Replacing an existing image
//! queues `delete` before `upload`; swapping them would delete the new file.
//!
//! ## The raster handle
//!
//! The first action that needs pixels decodes the file at the current path.
//! Every later action in the same `save` reuses that handle, and it is
//! encoded back to the *current* path (which `move_to` or `upload` may have
//! changed) exactly once, after the last action. Thumbnails render from a
//! clone and never disturb it.
//!
//! ## Failure
//!
//! An error aborts `save` at the failing action. Actions already executed are
//! not rolled back, the rest stay queued, and the unflushed pixels are dropped.
//!
//! ## Metadata
//!
//! [`width`](ImageResource::width), [`height`](ImageResource::height) and
//! [`mime_type`](ImageResource::mime_type) read the file on disk on first use
//! and cache the answer. They ignore queued changes. A successful `save` that
//! changed the file clears the cache, so the next read sees the new file.

mod action;
mod error;
mod files;
mod upload;

pub use action::Action;
pub use error::ResourceError;
pub use upload::{UploadStatus, UploadedFile};

use crate::format::{ImageType, replace_extension};
use crate::imaging::{Corner, ImageInfo, Padding, RasterBackend, composite_overlay, render_resized_copy};
use crate::naming::thumbnail_path;
use crate::resolver::Storage;
use crate::thumbnail::Thumbnail;
use action::ActionQueue;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Result type for resource operations.
pub type Result<T> = std::result::Result<T, ResourceError>;

/// A single image file plus the changes queued against it.
pub struct ImageResource<'a, B: RasterBackend> {
    backend: &'a B,
    storage: &'a Storage,
    path: Option<PathBuf>,
    exists: bool,
    info: Option<ImageInfo>,
    queue: ActionQueue,
    raster: Option<B::Handle>,
    thumbs: HashMap<Option<String>, Thumbnail>,
}

impl<'a, B: RasterBackend> ImageResource<'a, B> {
    fn with_path(backend: &'a B, storage: &'a Storage, path: Option<PathBuf>) -> Self {
        let exists = path.as_deref().is_some_and(Path::exists);
        Self {
            backend,
            storage,
            path,
            exists,
            info: None,
            queue: ActionQueue::default(),
            raster: None,
            thumbs: HashMap::new(),
        }
    }

    /// A resource at `path`, which may not exist yet (e.g. an upload target).
    pub fn new(backend: &'a B, storage: &'a Storage, path: impl Into<PathBuf>) -> Self {
        Self::with_path(backend, storage, Some(path.into()))
    }

    /// A resource with no path. Nothing can be saved until one is assigned.
    #[deprecated(note = "pass the target path to `ImageResource::new` or `from_upload`")]
    pub fn without_path(backend: &'a B, storage: &'a Storage) -> Self {
        warn!("image resource created without a path; this call path is deprecated");
        Self::with_path(backend, storage, None)
    }

    /// Open an existing image file.
    ///
    /// Reads its metadata right away and rejects formats outside the
    /// supported set.
    pub fn open(backend: &'a B, storage: &'a Storage, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(ResourceError::io(
                "open image",
                path,
                std::io::ErrorKind::NotFound.into(),
            ));
        }

        let info = backend.identify(&path)?;
        if ImageType::from_mime(&info.mime_type).is_none() {
            return Err(ResourceError::Validation(format!(
                "unsupported file type: {}",
                info.mime_type
            )));
        }

        let mut resource = Self::with_path(backend, storage, Some(path));
        resource.info = Some(info);
        Ok(resource)
    }

    /// Build a resource from a freshly received upload.
    ///
    /// With a `destination`, the upload lands there (with its extension fixed
    /// to match the file type), replacing any image already at that path.
    /// Without one, it lands next to the transport's temp file and can be
    /// relocated with [`move_to`](Self::move_to) before saving.
    ///
    /// An empty form field yields a resource with nothing queued; check
    /// [`is_changed`](Self::is_changed).
    pub fn from_upload(
        backend: &'a B,
        storage: &'a Storage,
        file: &UploadedFile,
        destination: Option<PathBuf>,
    ) -> Result<Self> {
        let mut resource = Self::with_path(backend, storage, destination);
        resource.queue_upload(file)?;
        Ok(resource)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Public URL of the image, if its path is under the storage root.
    pub fn url(&self) -> Option<String> {
        self.storage.url_for(self.path.as_deref()?)
    }

    /// Whether the file existed when the resource was created or its path was
    /// last set, or has since been uploaded.
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Point the resource somewhere else without moving any file.
    ///
    /// [`exists`](Self::exists) is re-read for the new path.
    pub fn set_path(&mut self, path: Option<PathBuf>) {
        if path.is_none() {
            warn!("clearing an image resource path is deprecated");
        }
        self.exists = path.as_deref().is_some_and(Path::exists);
        self.assign_path(path);
    }

    /// Queue replacing this image with an uploaded file.
    ///
    /// Returns `Ok(false)` when the form field was empty.
    #[deprecated(note = "build the resource with `ImageResource::from_upload`")]
    pub fn upload(&mut self, file: &UploadedFile) -> Result<bool> {
        warn!("ImageResource::upload is deprecated; use ImageResource::from_upload");
        self.queue_upload(file)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> &mut Self {
        self.queue.push(Action::Resize { width, height });
        self
    }

    /// Queue a thumbnail. `None` names the default thumbnail.
    pub fn create_thumbnail(&mut self, name: Option<&str>, width: u32, height: u32) -> &mut Self {
        self.queue.push(Action::Thumbnail {
            name: name.map(str::to_string),
            width,
            height,
        });
        self
    }

    /// Queue stamping the image at `source` onto this one.
    ///
    /// If `source` does not exist when the queue runs, the step is skipped.
    pub fn overlay(
        &mut self,
        source: impl Into<PathBuf>,
        corner: Corner,
        padding: Padding,
    ) -> &mut Self {
        self.queue.push(Action::Overlay {
            source: source.into(),
            corner,
            padding,
        });
        self
    }

    /// Queue moving the image to `destination`, replacing any file there.
    pub fn move_to(&mut self, destination: impl Into<PathBuf>) -> &mut Self {
        self.queue.push(Action::MoveTo {
            destination: destination.into(),
        });
        self
    }

    /// Delete the image and its thumbnails now.
    ///
    /// Anything queued before is discarded.
    pub fn delete(&mut self) -> Result<()> {
        match self.path.clone() {
            Some(target) => self.queue.reset_to(Action::Delete { target }),
            None => self.queue.clear(),
        }
        self.save()
    }

    pub fn is_changed(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Queued actions, in the order `save` will run them.
    pub fn pending_actions(&self) -> impl Iterator<Item = &Action> {
        self.queue.iter()
    }

    /// Run every queued action, then write the pixels back if any were loaded.
    ///
    /// A resource without a path has nowhere to save to: its queue is
    /// dropped and nothing happens.
    pub fn save(&mut self) -> Result<()> {
        if self.path.is_none() {
            if self.is_changed() {
                debug!("discarding queued actions of a resource without a path");
            }
            self.queue.clear();
            return Ok(());
        }

        let result = self.drain();
        if result.is_err() {
            self.raster = None;
        }
        result
    }

    fn drain(&mut self) -> Result<()> {
        let mut changed = false;
        while let Some(action) = self.queue.pop() {
            changed |= action.changes_file();
            if changed {
                self.info = None;
            }
            self.execute(action)?;
        }

        if let Some(raster) = self.raster.take() {
            let path = self.target()?;
            debug!(path = %path.display(), "writing image");
            self.backend.save(&raster, &path)?;
            changed = true;
        }

        if changed {
            self.info = None;
        }
        Ok(())
    }

    fn execute(&mut self, action: Action) -> Result<()> {
        debug!(
            action = action.kind(),
            path = %self.path.as_deref().unwrap_or(Path::new("")).display(),
            "running image action"
        );
        match action {
            Action::Delete { target } => self.run_delete(&target),
            Action::Upload { file } => self.run_upload(&file),
            Action::Resize { width, height } => self.run_resize(width, height),
            Action::Thumbnail {
                name,
                width,
                height,
            } => self.run_thumbnail(name.as_deref(), width, height),
            Action::Overlay {
                source,
                corner,
                padding,
            } => self.run_overlay(&source, corner, padding),
            Action::MoveTo { destination } => self.run_move(destination),
        }
    }

    /// Path of the thumbnail called `name`. `None` names the default one.
    pub fn thumb_name(&self, name: Option<&str>) -> Option<PathBuf> {
        Some(thumbnail_path(self.path.as_deref()?, name))
    }

    /// Descriptor of the thumbnail called `name`.
    ///
    /// The file only exists once a matching
    /// [`create_thumbnail`](Self::create_thumbnail) has been saved.
    pub fn thumb(&mut self, name: Option<&str>) -> Option<&Thumbnail> {
        let path = self.path.as_deref()?;
        let resolver = self.storage.resolver();
        Some(
            self.thumbs
                .entry(name.map(str::to_string))
                .or_insert_with(|| Thumbnail::for_image(path, name, resolver)),
        )
    }

    /// Metadata of the file on disk, read once and cached.
    pub fn info(&mut self) -> Result<&ImageInfo> {
        let info = match self.info.take() {
            Some(info) => info,
            None => self.backend.identify(&self.target()?)?,
        };
        Ok(self.info.insert(info))
    }

    pub fn width(&mut self) -> Result<u32> {
        Ok(self.info()?.width)
    }

    pub fn height(&mut self) -> Result<u32> {
        Ok(self.info()?.height)
    }

    pub fn mime_type(&mut self) -> Result<&str> {
        Ok(self.info()?.mime_type.as_str())
    }

    fn queue_upload(&mut self, file: &UploadedFile) -> Result<bool> {
        let Some(image_type) = upload::check(file)? else {
            if !self.exists {
                self.assign_path(None);
            }
            return Ok(false);
        };

        let destination = match self.path.clone() {
            Some(path) => {
                if self.exists {
                    self.queue.push(Action::Delete {
                        target: path.clone(),
                    });
                }
                path
            }
            // a synthesized destination never replaces anything
            None => file.tmp_path.clone(),
        };

        self.assign_path(Some(replace_extension(
            &destination,
            image_type.extension(),
        )));
        self.queue.push(Action::Upload { file: file.clone() });
        Ok(true)
    }

    fn assign_path(&mut self, path: Option<PathBuf>) {
        if self.path != path {
            self.thumbs.clear();
        }
        self.path = path;
    }

    fn target(&self) -> Result<PathBuf> {
        self.path
            .clone()
            .ok_or_else(|| ResourceError::Logic("image resource has no path".into()))
    }

    /// The raster handle, decoded from the current path on first use.
    fn raster(&mut self) -> Result<&mut B::Handle> {
        let handle = match self.raster.take() {
            Some(handle) => handle,
            None => self.backend.load(&self.target()?)?,
        };
        Ok(self.raster.insert(handle))
    }

    fn run_delete(&mut self, target: &Path) -> Result<()> {
        let removed = files::remove_image_files(target);
        debug!(target = %target.display(), removed = removed.len(), "removed image files");
        self.exists = false;
        Ok(())
    }

    fn run_upload(&mut self, file: &UploadedFile) -> Result<()> {
        let config = self.storage.config();
        let source = upload::verify_genuine(file, &config.upload_dir)?;
        let destination = self.target()?;

        if let Some(parent) = destination.parent() {
            files::ensure_directories(&config.filesystem_root, parent)?;
        }
        files::move_file(&source, &destination)?;
        files::set_file_mode(&destination);

        self.exists = true;
        Ok(())
    }

    fn run_resize(&mut self, width: u32, height: u32) -> Result<()> {
        let backend = self.backend;
        backend.resize(self.raster()?, width, height)?;
        Ok(())
    }

    fn run_thumbnail(&mut self, name: Option<&str>, width: u32, height: u32) -> Result<()> {
        let output = thumbnail_path(&self.target()?, name);
        let backend = self.backend;
        render_resized_copy(backend, self.raster()?, width, height, &output)?;
        files::set_file_mode(&output);
        Ok(())
    }

    fn run_overlay(&mut self, source: &Path, corner: Corner, padding: Padding) -> Result<()> {
        if !source.is_file() {
            debug!(source = %source.display(), "overlay source missing, skipping");
            return Ok(());
        }

        let backend = self.backend;
        let stamp = backend.load(source)?;
        let (x, y) = composite_overlay(backend, self.raster()?, &stamp, corner, padding);
        debug!(source = %source.display(), %corner, x, y, "overlay applied");
        Ok(())
    }

    fn run_move(&mut self, destination: PathBuf) -> Result<()> {
        let current = self.target()?;
        if let Some(parent) = destination.parent() {
            files::ensure_directories(&self.storage.config().filesystem_root, parent)?;
        }
        files::move_file(&current, &destination)?;
        self.assign_path(Some(destination));
        Ok(())
    }
}

impl<B: RasterBackend> std::fmt::Debug for ImageResource<'_, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageResource")
            .field("path", &self.path)
            .field("exists", &self.exists)
            .field("info", &self.info)
            .field("queue", &self.queue)
            .field("raster_loaded", &self.raster.is_some())
            .finish_non_exhaustive()
    }
}
