//! File upsert use case
//!
//! Writes content into a remote folder under a given name. If a live file
//! with that name is already there its content is replaced in place and the
//! id is kept; otherwise a new file is created.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::domain::{DomainError, EntryKind, ParentRef, RemoteId, SyncError};
use crate::ports::IRemoteStore;

use super::content_type::{infer_content_type, DEFAULT_CONTENT_TYPE};
use super::directory_index::DirectoryIndex;
use super::locks::KeyedLocks;

/// Whether an upsert created a file or overwrote one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Created,
    Updated,
}

/// Result of a successful upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertedFile {
    pub id: RemoteId,
    pub action: UpsertAction,
    pub content_type: String,
}

/// Create-or-overwrite for remote files
pub struct FileUpsert {
    index: DirectoryIndex,
    remote_store: Arc<dyn IRemoteStore + Send + Sync>,
    locks: KeyedLocks,
}

impl FileUpsert {
    /// Creates a new FileUpsert
    ///
    /// # Arguments
    ///
    /// * `remote_store` - Store holding the destination folder
    pub fn new(remote_store: Arc<dyn IRemoteStore + Send + Sync>) -> Self {
        Self {
            index: DirectoryIndex::new(Arc::clone(&remote_store)),
            remote_store,
            locks: KeyedLocks::new(),
        }
    }

    /// Places `content` at `(parent, name)`
    ///
    /// `content_type` overrides inference from the name's extension. When
    /// neither yields a type, `application/octet-stream` is used.
    ///
    /// # Errors
    ///
    /// - [`DomainError::InvalidEntryName`] for an empty name
    /// - [`SyncError::RemoteUnavailable`] if lookup, create or update fails
    #[instrument(skip(self, content), fields(parent = %parent, bytes = content.len()))]
    pub async fn upsert(
        &self,
        content: &[u8],
        name: &str,
        parent: &ParentRef,
        content_type: Option<&str>,
    ) -> Result<UpsertedFile, SyncError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidEntryName(name.to_string()).into());
        }

        let content_type = match content_type.or_else(|| infer_content_type(name)) {
            Some(ct) => ct,
            None => {
                warn!(name, fallback = DEFAULT_CONTENT_TYPE, "Could not infer content type");
                DEFAULT_CONTENT_TYPE
            }
        };

        let _guard = self.locks.acquire(parent, name).await;

        let existing = self
            .index
            .find_child(parent, name, Some(EntryKind::File))
            .await?;

        let (entry, action) = match existing {
            Some(file) => {
                let updated = self
                    .remote_store
                    .update_file_content(&file.id, content_type, content)
                    .await
                    .map_err(SyncError::remote)?;
                (updated, UpsertAction::Updated)
            }
            None => {
                let created = self
                    .remote_store
                    .create_file(name, parent, content_type, content)
                    .await
                    .map_err(SyncError::remote)?;
                (created, UpsertAction::Created)
            }
        };

        info!(id = %entry.id, ?action, content_type, "Upserted file");
        Ok(UpsertedFile {
            id: entry.id,
            action,
            content_type: content_type.to_string(),
        })
    }
}
