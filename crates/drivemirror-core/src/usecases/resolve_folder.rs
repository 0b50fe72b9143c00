//! Folder resolution use case
//!
//! Turns a folder name (or a slash-separated path of names) into a remote
//! folder id, creating whatever is missing. Repeated calls with the same
//! arguments yield the same id.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::domain::{DomainError, EntryKind, ParentRef, RemoteId, RemotePath, SyncError};
use crate::ports::IRemoteStore;

use super::directory_index::DirectoryIndex;
use super::locks::KeyedLocks;

/// Get-or-create for remote folders
///
/// Lookup and creation for one `(parent, name)` run under a per-key lock, so
/// concurrent callers sharing a resolver observe a single folder.
pub struct FolderResolver {
    index: DirectoryIndex,
    remote_store: Arc<dyn IRemoteStore + Send + Sync>,
    locks: KeyedLocks,
}

impl FolderResolver {
    /// Creates a new FolderResolver
    ///
    /// # Arguments
    ///
    /// * `remote_store` - Store used for both lookup and creation
    pub fn new(remote_store: Arc<dyn IRemoteStore + Send + Sync>) -> Self {
        Self {
            index: DirectoryIndex::new(Arc::clone(&remote_store)),
            remote_store,
            locks: KeyedLocks::new(),
        }
    }

    /// Returns the id of folder `name` under `parent`, creating it if absent
    ///
    /// # Errors
    ///
    /// - [`DomainError::InvalidEntryName`] for an empty or slash-containing name
    /// - [`SyncError::RemoteUnavailable`] if lookup or creation fails
    #[instrument(skip(self), fields(parent = %parent))]
    pub async fn resolve(&self, name: &str, parent: &ParentRef) -> Result<RemoteId, SyncError> {
        validate_name(name)?;

        let _guard = self.locks.acquire(parent, name).await;

        if let Some(existing) = self
            .index
            .find_child(parent, name, Some(EntryKind::Folder))
            .await?
        {
            debug!(id = %existing.id, "Folder already exists");
            return Ok(existing.id);
        }

        let created = self
            .remote_store
            .create_folder(name, parent)
            .await
            .map_err(SyncError::remote)?;
        info!(id = %created.id, "Created folder");
        Ok(created.id)
    }

    /// Resolves every segment of `path` in order, starting from `root`
    ///
    /// An empty path resolves to `root` itself. Each segment is get-or-created
    /// under the folder produced by the previous one.
    ///
    /// # Errors
    ///
    /// The first failing segment aborts the walk. Folders created for earlier
    /// segments are left in place.
    pub async fn resolve_path(
        &self,
        path: &RemotePath,
        root: &ParentRef,
    ) -> Result<ParentRef, SyncError> {
        let mut current = root.clone();
        for segment in path.segments() {
            let id = self.resolve(segment, &current).await?;
            current = ParentRef::Folder(id);
        }
        Ok(current)
    }
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() || name.contains('/') {
        return Err(DomainError::InvalidEntryName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryRemoteStore;

    fn resolver(store: &Arc<InMemoryRemoteStore>) -> FolderResolver {
        FolderResolver::new(store.clone())
    }

    #[tokio::test]
    async fn creates_missing_folder() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let id = resolver(&store)
            .resolve("Mis_Datos_Analisis", &ParentRef::Root)
            .await
            .unwrap();

        let live = store.live_named(ParentRef::Root, "Mis_Datos_Analisis");
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, id);
        assert!(live[0].is_folder());
    }

    #[tokio::test]
    async fn resolve_is_idempotent() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let r = resolver(&store);
        let first = r.resolve("data", &ParentRef::Root).await.unwrap();
        let second = r.resolve("data", &ParentRef::Root).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.create_count(), 1);
    }

    #[tokio::test]
    async fn reuses_existing_folder_and_ignores_same_named_file() {
        let store = Arc::new(InMemoryRemoteStore::new());
        store.add_file(ParentRef::Root, "train", b"x");
        let existing = store.add_folder(ParentRef::Root, "train");

        let id = resolver(&store).resolve("train", &ParentRef::Root).await.unwrap();
        assert_eq!(id, existing);
        assert_eq!(store.create_count(), 0);
    }

    #[tokio::test]
    async fn trashed_folder_is_not_reused() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let old = store.add_folder(ParentRef::Root, "data");
        store.trash(&old);

        let id = resolver(&store).resolve("data", &ParentRef::Root).await.unwrap();
        assert_ne!(id, old);
    }

    #[tokio::test]
    async fn rejects_invalid_names() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let r = resolver(&store);
        for bad in ["", "  ", "a/b"] {
            let err = r.resolve(bad, &ParentRef::Root).await.unwrap_err();
            assert!(matches!(err, SyncError::Domain(DomainError::InvalidEntryName(_))));
        }
        assert_eq!(store.create_count(), 0);
    }

    #[tokio::test]
    async fn concurrent_resolves_create_one_folder() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let r = Arc::new(resolver(&store));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let r = Arc::clone(&r);
                tokio::spawn(async move { r.resolve("shared", &ParentRef::Root).await })
            })
            .collect();

        let mut ids = Vec::new();
        for t in tasks {
            ids.push(t.await.unwrap().unwrap());
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(store.live_named(ParentRef::Root, "shared").len(), 1);
    }

    #[tokio::test]
    async fn resolve_path_builds_nested_chain() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let r = resolver(&store);
        let path: RemotePath = "Datos_YOLO/Emotions/train".parse().unwrap();

        let leaf = r.resolve_path(&path, &ParentRef::Root).await.unwrap();

        let yolo = &store.live_named(ParentRef::Root, "Datos_YOLO")[0];
        let emotions = &store.live_named(&yolo.id, "Emotions")[0];
        let train = &store.live_named(&emotions.id, "train")[0];
        assert_eq!(leaf, ParentRef::Folder(train.id.clone()));

        // second walk reuses everything
        let again = r.resolve_path(&path, &ParentRef::Root).await.unwrap();
        assert_eq!(again, leaf);
        assert_eq!(store.create_count(), 3);
    }

    #[tokio::test]
    async fn resolve_path_empty_returns_root() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let base = store.add_folder(ParentRef::Root, "base");
        let root = ParentRef::from(&base);

        let resolved = resolver(&store)
            .resolve_path(&RemotePath::default(), &root)
            .await
            .unwrap();
        assert_eq!(resolved, root);
    }

    #[tokio::test]
    async fn creation_failure_is_remote_unavailable() {
        let store = Arc::new(InMemoryRemoteStore::new());
        store.fail_creates();

        let err = resolver(&store)
            .resolve("new", &ParentRef::Root)
            .await
            .unwrap_err();
        assert!(err.is_remote());
    }
}
