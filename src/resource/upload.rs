//! Upload descriptors and their validation.
//!
//! The HTTP transport hands over an [`UploadedFile`]: where it parked the
//! bytes, what MIME type the client declared, and how the transfer ended.
//! [`check`] turns that into either "nothing was uploaded" or the validated
//! [`ImageType`], before anything is queued. [`verify_genuine`] runs later,
//! when the upload action executes, and refuses temp paths the transport did
//! not produce.

use super::error::ResourceError;
use crate::format::ImageType;
use std::path::{Path, PathBuf};

/// How the transport finished receiving a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadStatus {
    #[default]
    Ok,
    /// The form field was left empty.
    NoFile,
    /// Larger than the server-wide upload limit.
    IniSize,
    /// Larger than the limit declared by the form.
    FormSize,
    /// The transfer was cut off.
    Partial,
}

/// A file received by the upload transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub tmp_path: PathBuf,
    /// MIME type declared by the client.
    pub mime_type: String,
    pub status: UploadStatus,
}

impl UploadedFile {
    /// A completed upload.
    pub fn new(tmp_path: impl Into<PathBuf>, mime_type: impl Into<String>) -> Self {
        Self {
            tmp_path: tmp_path.into(),
            mime_type: mime_type.into(),
            status: UploadStatus::Ok,
        }
    }

    /// An empty form field.
    pub fn empty() -> Self {
        Self {
            tmp_path: PathBuf::new(),
            mime_type: String::new(),
            status: UploadStatus::NoFile,
        }
    }

    pub fn with_status(mut self, status: UploadStatus) -> Self {
        self.status = status;
        self
    }
}

/// Validate an upload descriptor.
///
/// Returns `Ok(None)` when no file was sent, and the accepted format otherwise.
pub fn check(file: &UploadedFile) -> Result<Option<ImageType>, ResourceError> {
    match file.status {
        UploadStatus::NoFile => return Ok(None),
        UploadStatus::IniSize | UploadStatus::FormSize => {
            return Err(ResourceError::Validation("file too large".into()));
        }
        UploadStatus::Partial => {
            return Err(ResourceError::Validation("upload incomplete, retry".into()));
        }
        UploadStatus::Ok => {}
    }

    ImageType::from_mime(&file.mime_type).map(Some).ok_or_else(|| {
        ResourceError::Validation(format!("unsupported file type: {}", file.mime_type))
    })
}

/// Confirm `file` is a regular file the transport left inside `upload_dir`.
///
/// Both paths are canonicalized first, so `..` segments and symlinks cannot
/// smuggle in a file from elsewhere. Returns the canonical temp path.
pub fn verify_genuine(file: &UploadedFile, upload_dir: &Path) -> Result<PathBuf, ResourceError> {
    let rejected = || ResourceError::NotUploaded(file.tmp_path.clone());

    let dir = upload_dir.canonicalize().map_err(|_| rejected())?;
    let tmp = file.tmp_path.canonicalize().map_err(|_| rejected())?;

    if tmp != dir && tmp.starts_with(&dir) && tmp.is_file() {
        Ok(tmp)
    } else {
        Err(rejected())
    }
}
