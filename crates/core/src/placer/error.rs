//! Error types for the placer module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during file placement.
///
/// An existing destination is not an error; see
/// [`PlacementResult::SkippedExisting`](super::PlacementResult::SkippedExisting).
#[derive(Debug, Error)]
pub enum PlacerError {
    /// Source file not found.
    #[error("Source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Failed to create destination directory.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create the hard link (e.g. across filesystems).
    #[error("Failed to hard link {from} to {to}")]
    LinkFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to move the file into the library.
    #[error("Failed to move file from {from} to {to}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlacerError {
    /// Creates a link failed error.
    pub fn link_failed(from: PathBuf, to: PathBuf, error: std::io::Error) -> Self {
        Self::LinkFailed { from, to, error }
    }

    /// Creates a move failed error.
    pub fn move_failed(from: PathBuf, to: PathBuf, error: std::io::Error) -> Self {
        Self::MoveFailed { from, to, error }
    }
}
