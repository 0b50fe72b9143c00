//! Remote directory index
//!
//! Name + parent lookups against the remote store. Read-only; a lookup that
//! finds nothing returns `Ok(None)`.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{EntryKind, ParentRef, RemoteEntry, SyncError};
use crate::ports::{EntryQuery, IRemoteStore};

/// Lookup facade over [`IRemoteStore::list_entries`]
#[derive(Clone)]
pub struct DirectoryIndex {
    remote_store: Arc<dyn IRemoteStore + Send + Sync>,
}

impl DirectoryIndex {
    pub fn new(remote_store: Arc<dyn IRemoteStore + Send + Sync>) -> Self {
        Self { remote_store }
    }

    /// Finds the child of `parent` named `name`, optionally of one kind
    ///
    /// When the store holds several matching entries the first one in
    /// listing order wins. Listing order is not guaranteed to be stable, so
    /// the duplicate is reported at warn level.
    ///
    /// # Errors
    ///
    /// [`SyncError::RemoteUnavailable`] if the store cannot be queried
    pub async fn find_child(
        &self,
        parent: &ParentRef,
        name: &str,
        kind: Option<EntryKind>,
    ) -> Result<Option<RemoteEntry>, SyncError> {
        let mut query = EntryQuery::named(parent.clone(), name);
        query.kind = kind;

        let mut matches = self
            .remote_store
            .list_entries(&query)
            .await
            .map_err(SyncError::remote)?;

        if matches.len() > 1 {
            warn!(
                %parent,
                name,
                duplicates = matches.len(),
                chosen = %matches[0].id,
                "Several entries share this name, using the first one listed"
            );
        }

        if matches.is_empty() {
            debug!(%parent, name, "No matching child");
            return Ok(None);
        }
        Ok(Some(matches.swap_remove(0)))
    }

    /// Lists the non-trashed children of `parent` in store order
    ///
    /// # Errors
    ///
    /// [`SyncError::RemoteUnavailable`] if the store cannot be queried
    pub async fn list_children(&self, parent: &ParentRef) -> Result<Vec<RemoteEntry>, SyncError> {
        let children = self
            .remote_store
            .list_entries(&EntryQuery::children_of(parent.clone()))
            .await
            .map_err(SyncError::remote)?;

        if children.is_empty() {
            debug!(%parent, "Folder has no accessible children");
        }
        Ok(children)
    }
}
