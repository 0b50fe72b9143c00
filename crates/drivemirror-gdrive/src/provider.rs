//! DriveRemoteStore - IRemoteStore implementation for Google Drive
//!
//! Wraps the [`DriveClient`] and translates between Drive file resources and
//! the core [`RemoteEntry`] type. Drive errors are converted to `anyhow` with
//! context at this boundary; the use cases map them to
//! `SyncError::RemoteUnavailable`.

use anyhow::{Context, Result};
use tracing::debug;

use drivemirror_core::domain::{EntryKind, ParentRef, RemoteEntry, RemoteId};
use drivemirror_core::ports::{EntryQuery, IRemoteStore};

use crate::client::{DriveClient, DriveFile};
use crate::query::{build_query, parent_id};

/// Converts a Drive file resource into a port-level [`RemoteEntry`]
fn to_entry(file: DriveFile) -> Result<RemoteEntry> {
    let id = RemoteId::new(file.id).context("Drive returned an unusable file id")?;
    Ok(RemoteEntry {
        id,
        kind: EntryKind::from_content_type(&file.mime_type),
        name: file.name,
        content_type: file.mime_type,
    })
}

/// Google Drive adapter for the remote-store port
pub struct DriveRemoteStore {
    client: DriveClient,
}

impl DriveRemoteStore {
    pub fn new(client: DriveClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl IRemoteStore for DriveRemoteStore {
    async fn list_entries(&self, query: &EntryQuery) -> Result<Vec<RemoteEntry>> {
        let q = build_query(query);
        debug!(q = %q, "DriveRemoteStore::list_entries");

        let files = self
            .client
            .list_files(&q)
            .await
            .with_context(|| format!("Failed to list children of {}", query.parent))?;

        let entries = files
            .into_iter()
            .map(to_entry)
            .collect::<Result<Vec<_>>>()?;
        Ok(entries.into_iter().filter(|e| query.matches(e)).collect())
    }

    async fn create_folder(&self, name: &str, parent: &ParentRef) -> Result<RemoteEntry> {
        debug!(name, parent = %parent, "DriveRemoteStore::create_folder");
        let file = self
            .client
            .create_folder(name, parent_id(parent))
            .await
            .with_context(|| format!("Failed to create folder '{name}' in {parent}"))?;
        to_entry(file)
    }

    async fn create_file(
        &self,
        name: &str,
        parent: &ParentRef,
        content_type: &str,
        data: &[u8],
    ) -> Result<RemoteEntry> {
        debug!(name, parent = %parent, "DriveRemoteStore::create_file");
        let file = self
            .client
            .create_file(name, parent_id(parent), content_type, data)
            .await
            .with_context(|| format!("Failed to upload '{name}' to {parent}"))?;
        to_entry(file)
    }

    async fn update_file_content(
        &self,
        id: &RemoteId,
        content_type: &str,
        data: &[u8],
    ) -> Result<RemoteEntry> {
        debug!(id = %id, "DriveRemoteStore::update_file_content");
        let file = self
            .client
            .update_content(id.as_str(), content_type, data)
            .await
            .with_context(|| format!("Failed to update content of {id}"))?;
        to_entry(file)
    }

    async fn download_file(&self, id: &RemoteId) -> Result<Vec<u8>> {
        debug!(id = %id, "DriveRemoteStore::download_file");
        self.client
            .download(id.as_str())
            .await
            .with_context(|| format!("Failed to download {id}"))
    }
}
