//! Domain error types
//!
//! [`DomainError`] covers validation of domain values (ids, names, paths).
//! [`SyncError`] is the failure taxonomy of the synchronization use cases.
//!
//! A lookup that finds nothing is not an error: the directory index returns
//! `Ok(None)` and callers branch on it. An unknown content type is not an
//! error either: the upsert falls back to a generic binary type and logs a
//! warning.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when constructing domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid remote ID format
    #[error("Invalid remote ID: {0}")]
    InvalidRemoteId(String),

    /// Invalid entry name (empty, or containing a path separator)
    #[error("Invalid entry name: {0}")]
    InvalidEntryName(String),

    /// Invalid remote path format
    #[error("Invalid remote path: {0}")]
    InvalidRemotePath(String),
}

/// Errors surfaced by the synchronization use cases
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The remote store could not be reached or rejected the request
    #[error("Remote store unavailable: {0}")]
    RemoteUnavailable(String),

    /// A local file exists but could not be read
    #[error("Failed to read local file {path}: {reason}")]
    LocalReadFailure {
        /// The file that could not be read
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// A local path that was required to exist does not
    #[error("Local path not found: {0}")]
    LocalPathNotFound(PathBuf),

    /// A local file or directory could not be written
    #[error("Failed to write {path}: {reason}")]
    LocalWriteFailure {
        /// The file or directory that could not be written
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// A domain value was rejected during the operation
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl SyncError {
    /// Wraps a transport-level error as [`SyncError::RemoteUnavailable`]
    ///
    /// The full context chain is preserved in the message.
    pub fn remote(err: anyhow::Error) -> Self {
        Self::RemoteUnavailable(format!("{err:#}"))
    }

    /// Returns true if the failure originated on the remote side
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteUnavailable(_))
    }
}
