use crate::imaging::{BackendError, UnknownCorner};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while queueing or saving resource changes.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// Caused by what the user sent. Safe to show, and the user can retry
    /// with a different file.
    #[error("{0}")]
    Validation(String),
    #[error("{action} failed for {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("not a valid uploaded file: {}", .0.display())]
    NotUploaded(PathBuf),
    /// Broken invariant inside the host application or this crate.
    #[error("logic error: {0}")]
    Logic(String),
    #[error("image backend error: {0}")]
    Backend(#[from] BackendError),
}

impl ResourceError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ResourceError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Whether the end user can fix this by sending something else.
    pub fn is_user_error(&self) -> bool {
        matches!(self, ResourceError::Validation(_))
    }
}

impl From<UnknownCorner> for ResourceError {
    fn from(err: UnknownCorner) -> Self {
        ResourceError::Logic(err.to_string())
    }
}
