//! Remote store port (driven/secondary port)
//!
//! This module defines the interface for interacting with the remote
//! hierarchical object store. The primary implementation targets Google
//! Drive, but the trait only assumes folders and files addressed by name
//! within a parent and identified by opaque ids.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are adapter-specific;
//!   use cases classify them as [`SyncError::RemoteUnavailable`](crate::domain::SyncError).
//! - Implementations must not retry internally. A failed call is reported once.
//! - Every listing excludes trashed entries.

use crate::domain::entry::{EntryKind, RemoteEntry};
use crate::domain::newtypes::{ParentRef, RemoteId};

/// Filter for [`IRemoteStore::list_entries`]
///
/// Matches non-trashed entries directly under `parent`, optionally narrowed
/// to an exact `name` and/or a `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryQuery {
    pub parent: ParentRef,
    pub name: Option<String>,
    pub kind: Option<EntryKind>,
}

impl EntryQuery {
    /// All children of `parent`
    pub fn children_of(parent: impl Into<ParentRef>) -> Self {
        Self {
            parent: parent.into(),
            name: None,
            kind: None,
        }
    }

    /// Children of `parent` named exactly `name`
    pub fn named(parent: impl Into<ParentRef>, name: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            name: Some(name.into()),
            kind: None,
        }
    }

    /// Narrows the query to one entry kind
    pub fn of_kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Returns true if `entry` satisfies the name and kind filters
    ///
    /// The parent and trashed filters are the store's responsibility.
    pub fn matches(&self, entry: &RemoteEntry) -> bool {
        self.name.as_deref().map_or(true, |n| n == entry.name)
            && self.kind.map_or(true, |k| k == entry.kind)
    }
}

/// Port trait for remote store operations
///
/// All methods assume that valid credentials are available; acquiring and
/// refreshing them is the adapter's concern.
#[async_trait::async_trait]
pub trait IRemoteStore: Send + Sync {
    /// Lists non-trashed entries matching `query`, in store order
    async fn list_entries(&self, query: &EntryQuery) -> anyhow::Result<Vec<RemoteEntry>>;

    /// Creates a folder named `name` under `parent`
    ///
    /// Does not check for an existing folder with the same name.
    async fn create_folder(&self, name: &str, parent: &ParentRef) -> anyhow::Result<RemoteEntry>;

    /// Creates a new file named `name` under `parent` with the given content
    async fn create_file(
        &self,
        name: &str,
        parent: &ParentRef,
        content_type: &str,
        data: &[u8],
    ) -> anyhow::Result<RemoteEntry>;

    /// Replaces the content of an existing file, keeping its id and name
    async fn update_file_content(
        &self,
        id: &RemoteId,
        content_type: &str,
        data: &[u8],
    ) -> anyhow::Result<RemoteEntry>;

    /// Downloads a file's content by its id
    async fn download_file(&self, id: &RemoteId) -> anyhow::Result<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_matches_name_and_kind() {
        let id = RemoteId::new("F1".to_string()).unwrap();
        let folder = RemoteEntry::folder(id.clone(), "train");
        let file = RemoteEntry::file(id.clone(), "train", "text/plain");

        let query = EntryQuery::named(&id, "train").of_kind(EntryKind::Folder);
        assert!(query.matches(&folder));
        assert!(!query.matches(&file));

        let any = EntryQuery::children_of(ParentRef::Root);
        assert!(any.matches(&folder));
        assert!(any.matches(&file));
        assert_eq!(any.parent, ParentRef::Root);
    }
}
