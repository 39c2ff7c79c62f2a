//! Batch-level errors returned by the fetcher.
//!
//! Only problems that make the whole batch pointless end up here. Per-URL
//! problems (unreachable host, non-200 status, non-image content) are logged or
//! recorded in the failure report instead.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The manifest path does not exist.
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The output path is missing or is not a directory.
    #[error("output path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The manifest exists but could not be read (permissions, invalid UTF-8).
    #[error("failed to read manifest {}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing an image to the output directory failed.
    #[error("failed to write {}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    /// True for the two checks made before any request is issued.
    pub fn is_precondition(&self) -> bool {
        matches!(self, FetchError::InputNotFound(_) | FetchError::NotADirectory(_))
    }

    /// Underlying IO error kind, if any.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            FetchError::Manifest { source, .. } | FetchError::Storage { source, .. } => {
                Some(source.kind())
            }
            FetchError::InputNotFound(_) => Some(io::ErrorKind::NotFound),
            FetchError::NotADirectory(_) => None,
        }
    }
}
