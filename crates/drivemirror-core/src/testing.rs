//! In-memory port implementations for tests
//!
//! [`InMemoryRemoteStore`] behaves like a remote store that does not enforce
//! name uniqueness, lists entries in insertion order, and hides trashed
//! entries. [`InMemoryFileSystem`] is a path-keyed map of directories and
//! files. Both support failure injection per path or id.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};

use crate::domain::{EntryKind, ParentRef, RemoteEntry, RemoteId};
use crate::ports::{EntryQuery, FileSystemState, ILocalFileSystem, IRemoteStore};
use crate::usecases::content_type::{infer_content_type, DEFAULT_CONTENT_TYPE};

#[derive(Debug, Clone)]
struct StoredEntry {
    entry: RemoteEntry,
    parent: ParentRef,
    trashed: bool,
    content: Vec<u8>,
}

#[derive(Debug, Default)]
struct StoreState {
    entries: Vec<StoredEntry>,
    fail_list: HashSet<ParentRef>,
    fail_download: HashSet<RemoteId>,
    fail_create: bool,
    offline: bool,
}

/// Remote store double backed by a vector of entries
#[derive(Debug, Default)]
pub struct InMemoryRemoteStore {
    state: Mutex<StoreState>,
    next_id: AtomicUsize,
    creates: AtomicUsize,
    updates: AtomicUsize,
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self, prefix: &str) -> RemoteId {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        RemoteId::new(format!("{prefix}{n:04}")).expect("generated ids are valid")
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().expect("store mutex poisoned")
    }

    /// Seeds a folder without going through the port
    pub fn add_folder(&self, parent: impl Into<ParentRef>, name: &str) -> RemoteId {
        let id = self.allocate_id("folder");
        self.lock().entries.push(StoredEntry {
            entry: RemoteEntry::folder(id.clone(), name),
            parent: parent.into(),
            trashed: false,
            content: Vec::new(),
        });
        id
    }

    /// Seeds a file without going through the port
    pub fn add_file(&self, parent: impl Into<ParentRef>, name: &str, content: &[u8]) -> RemoteId {
        let id = self.allocate_id("file");
        let content_type = infer_content_type(name).unwrap_or(DEFAULT_CONTENT_TYPE);
        self.lock().entries.push(StoredEntry {
            entry: RemoteEntry::file(id.clone(), name, content_type),
            parent: parent.into(),
            trashed: false,
            content: content.to_vec(),
        });
        id
    }

    /// Moves an entry to the trash
    pub fn trash(&self, id: &RemoteId) {
        for stored in self.lock().entries.iter_mut() {
            if &stored.entry.id == id {
                stored.trashed = true;
            }
        }
    }

    /// Makes every listing of `parent` fail
    pub fn fail_listing(&self, parent: impl Into<ParentRef>) {
        self.lock().fail_list.insert(parent.into());
    }

    /// Makes every download of `id` fail
    pub fn fail_download(&self, id: &RemoteId) {
        self.lock().fail_download.insert(id.clone());
    }

    /// Makes folder and file creation fail
    pub fn fail_creates(&self) {
        self.lock().fail_create = true;
    }

    /// Makes every call fail as if the network were down
    pub fn go_offline(&self) {
        self.lock().offline = true;
    }

    /// Live (non-trashed) entries named `name` directly under `parent`
    pub fn live_named(&self, parent: impl Into<ParentRef>, name: &str) -> Vec<RemoteEntry> {
        let parent = parent.into();
        self.lock()
            .entries
            .iter()
            .filter(|s| !s.trashed && s.parent == parent && s.entry.name == name)
            .map(|s| s.entry.clone())
            .collect()
    }

    /// Current content of a file
    pub fn content_of(&self, id: &RemoteId) -> Option<Vec<u8>> {
        self.lock()
            .entries
            .iter()
            .find(|s| &s.entry.id == id)
            .map(|s| s.content.clone())
    }

    /// Content type currently recorded for an entry
    pub fn content_type_of(&self, id: &RemoteId) -> Option<String> {
        self.lock()
            .entries
            .iter()
            .find(|s| &s.entry.id == id)
            .map(|s| s.entry.content_type.clone())
    }

    /// Number of successful create calls (folders and files)
    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    /// Number of successful content updates
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    fn check_online(state: &StoreState) -> Result<()> {
        if state.offline {
            bail!("connection refused");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl IRemoteStore for InMemoryRemoteStore {
    async fn list_entries(&self, query: &EntryQuery) -> Result<Vec<RemoteEntry>> {
        // Yield so that concurrent callers interleave between check and act.
        tokio::task::yield_now().await;
        let state = self.lock();
        Self::check_online(&state)?;
        if state.fail_list.contains(&query.parent) {
            bail!("listing {} failed: internal error", query.parent);
        }
        Ok(state
            .entries
            .iter()
            .filter(|s| !s.trashed && s.parent == query.parent && query.matches(&s.entry))
            .map(|s| s.entry.clone())
            .collect())
    }

    async fn create_folder(&self, name: &str, parent: &ParentRef) -> Result<RemoteEntry> {
        tokio::task::yield_now().await;
        {
            let state = self.lock();
            Self::check_online(&state)?;
            if state.fail_create {
                bail!("create rejected: insufficient permissions");
            }
        }
        let id = self.add_folder(parent.clone(), name);
        self.creates.fetch_add(1, Ordering::SeqCst);
        Ok(RemoteEntry::folder(id, name))
    }

    async fn create_file(
        &self,
        name: &str,
        parent: &ParentRef,
        content_type: &str,
        data: &[u8],
    ) -> Result<RemoteEntry> {
        tokio::task::yield_now().await;
        {
            let state = self.lock();
            Self::check_online(&state)?;
            if state.fail_create {
                bail!("create rejected: insufficient permissions");
            }
        }
        let id = self.allocate_id("file");
        let entry = RemoteEntry::file(id, name, content_type);
        self.lock().entries.push(StoredEntry {
            entry: entry.clone(),
            parent: parent.clone(),
            trashed: false,
            content: data.to_vec(),
        });
        self.creates.fetch_add(1, Ordering::SeqCst);
        Ok(entry)
    }

    async fn update_file_content(
        &self,
        id: &RemoteId,
        content_type: &str,
        data: &[u8],
    ) -> Result<RemoteEntry> {
        let mut state = self.lock();
        Self::check_online(&state)?;
        let stored = state
            .entries
            .iter_mut()
            .find(|s| &s.entry.id == id && !s.trashed && s.entry.kind == EntryKind::File)
            .ok_or_else(|| anyhow!("file {id} not found"))?;
        stored.content = data.to_vec();
        stored.entry.content_type = content_type.to_string();
        let entry = stored.entry.clone();
        drop(state);
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(entry)
    }

    async fn download_file(&self, id: &RemoteId) -> Result<Vec<u8>> {
        let state = self.lock();
        Self::check_online(&state)?;
        if state.fail_download.contains(id) {
            bail!("download of {id} failed: 500 Internal Server Error");
        }
        state
            .entries
            .iter()
            .find(|s| &s.entry.id == id && s.entry.kind == EntryKind::File)
            .map(|s| s.content.clone())
            .ok_or_else(|| anyhow!("file {id} not found"))
    }
}

#[derive(Debug, Default)]
struct FsState {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
    fail_mkdir: HashSet<PathBuf>,
    fail_write: HashSet<PathBuf>,
}

/// Local filesystem double keyed by path
#[derive(Debug, Default)]
pub struct InMemoryFileSystem {
    state: Mutex<FsState>,
}

impl InMemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FsState> {
        self.state.lock().expect("fs mutex poisoned")
    }

    /// Seeds a file (and its parent directories)
    pub fn put_file(&self, path: impl AsRef<Path>, data: &[u8]) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.lock();
        if let Some(parent) = path.parent() {
            for ancestor in parent.ancestors() {
                state.dirs.insert(ancestor.to_path_buf());
            }
        }
        state.files.insert(path, data.to_vec());
    }

    /// Makes creating `path` as a directory fail
    pub fn fail_mkdir(&self, path: impl AsRef<Path>) {
        self.lock().fail_mkdir.insert(path.as_ref().to_path_buf());
    }

    /// Makes writing `path` fail
    pub fn fail_write(&self, path: impl AsRef<Path>) {
        self.lock().fail_write.insert(path.as_ref().to_path_buf());
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.lock().files.get(path.as_ref()).cloned()
    }

    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.lock().dirs.contains(path.as_ref())
    }

    /// All file paths, sorted
    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.lock().files.keys().cloned().collect()
    }
}

#[async_trait::async_trait]
impl ILocalFileSystem for InMemoryFileSystem {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.file(path)
            .ok_or_else(|| anyhow!("No such file or directory: {}", path.display()))
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        if self.lock().fail_write.contains(path) {
            bail!("Permission denied: {}", path.display());
        }
        self.put_file(path, data);
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> Result<()> {
        self.lock()
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| anyhow!("No such file or directory: {}", path.display()))
    }

    async fn get_state(&self, path: &Path) -> Result<FileSystemState> {
        let state = self.lock();
        if let Some(data) = state.files.get(path) {
            return Ok(FileSystemState {
                exists: true,
                is_file: true,
                size: data.len() as u64,
            });
        }
        if state.dirs.contains(path) {
            return Ok(FileSystemState {
                exists: true,
                is_file: false,
                size: 0,
            });
        }
        Ok(FileSystemState::not_found())
    }

    async fn create_directory(&self, path: &Path) -> Result<()> {
        let mut state = self.lock();
        if state.fail_mkdir.contains(path) {
            bail!("Permission denied: {}", path.display());
        }
        if state.files.contains_key(path) {
            bail!("File exists: {}", path.display());
        }
        for ancestor in path.ancestors() {
            state.dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }
}
