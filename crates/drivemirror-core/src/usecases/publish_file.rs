//! Publish use case
//!
//! Uploads a local file into a remote folder under its base name, replacing
//! any live file of the same name there.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::{DomainError, ParentRef, SyncError};
use crate::ports::ILocalFileSystem;

use super::upsert_file::{FileUpsert, UpsertedFile};

pub struct TreePublisher {
    upsert: Arc<FileUpsert>,
    local_fs: Arc<dyn ILocalFileSystem + Send + Sync>,
}

impl TreePublisher {
    pub fn new(upsert: Arc<FileUpsert>, local_fs: Arc<dyn ILocalFileSystem + Send + Sync>) -> Self {
        Self { upsert, local_fs }
    }

    /// Publishes `local_file` into `folder`
    ///
    /// # Errors
    ///
    /// - [`SyncError::LocalPathNotFound`] if `local_file` does not exist
    /// - [`SyncError::LocalReadFailure`] if it is a directory or unreadable
    /// - [`SyncError::RemoteUnavailable`] if the upload fails
    #[instrument(skip(self), fields(local = %local_file.display(), folder = %folder))]
    pub async fn publish(
        &self,
        local_file: &Path,
        folder: &ParentRef,
    ) -> Result<UpsertedFile, SyncError> {
        let state = self
            .local_fs
            .get_state(local_file)
            .await
            .map_err(|e| read_failure(local_file, format!("{e:#}")))?;

        if !state.exists {
            return Err(SyncError::LocalPathNotFound(local_file.to_path_buf()));
        }
        if !state.is_regular_file() {
            return Err(read_failure(local_file, "not a regular file"));
        }

        let name = local_file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DomainError::InvalidEntryName(local_file.display().to_string()))?;

        let content = self
            .local_fs
            .read_file(local_file)
            .await
            .map_err(|e| read_failure(local_file, format!("{e:#}")))?;

        let uploaded = self.upsert.upsert(&content, name, folder, None).await?;
        info!(id = %uploaded.id, bytes = content.len(), "Published file");
        Ok(uploaded)
    }
}

fn read_failure(path: &Path, reason: impl Into<String>) -> SyncError {
    SyncError::LocalReadFailure {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}
