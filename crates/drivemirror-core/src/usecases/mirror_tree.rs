//! Tree mirror use case
//!
//! Reproduces a remote folder hierarchy under a local directory. Subfolders
//! are walked from an explicit work queue (breadth first), so deep trees do
//! not grow the stack. Files are downloaded only when their extension is on
//! the allowlist.
//!
//! A failure on one entry never aborts the walk: it becomes a `Failed`
//! record in the returned [`MirrorReport`] and siblings continue.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::domain::{
    is_safe_local_name, EntryKind, MirrorReport, ParentRef, RemoteEntry, RemoteId, SyncError,
    TransferOutcome, TransferRecord,
};
use crate::ports::{ILocalFileSystem, IRemoteStore};

use super::directory_index::DirectoryIndex;

/// Extensions downloaded when no allowlist is configured
pub const DEFAULT_MIRROR_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "txt", "yaml", "yml", "cfg",
];

/// Case-insensitive set of file extensions eligible for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionAllowlist {
    extensions: BTreeSet<String>,
}

impl ExtensionAllowlist {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { extensions }
    }

    /// Returns true if `entry`'s extension is on the list
    pub fn allows(&self, entry: &RemoteEntry) -> bool {
        entry
            .extension()
            .is_some_and(|ext| self.extensions.contains(&ext))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}

impl Default for ExtensionAllowlist {
    fn default() -> Self {
        Self::new(DEFAULT_MIRROR_EXTENSIONS)
    }
}

/// Remote-to-local folder mirror
pub struct TreeMirror {
    index: DirectoryIndex,
    remote_store: Arc<dyn IRemoteStore + Send + Sync>,
    local_fs: Arc<dyn ILocalFileSystem + Send + Sync>,
    allowlist: ExtensionAllowlist,
}

impl TreeMirror {
    /// Creates a new TreeMirror
    ///
    /// # Arguments
    ///
    /// * `remote_store` - Store the tree is read from
    /// * `local_fs` - Filesystem the mirror is written to
    /// * `allowlist` - Extensions eligible for download
    pub fn new(
        remote_store: Arc<dyn IRemoteStore + Send + Sync>,
        local_fs: Arc<dyn ILocalFileSystem + Send + Sync>,
        allowlist: ExtensionAllowlist,
    ) -> Self {
        Self {
            index: DirectoryIndex::new(Arc::clone(&remote_store)),
            remote_store,
            local_fs,
            allowlist,
        }
    }

    /// Mirrors the subtree rooted at `root` into `local_root`
    ///
    /// Existing local files at target paths are overwritten. Local files with
    /// no remote counterpart are left alone.
    #[instrument(skip(self), fields(root = %root, local_root = %local_root.display()))]
    pub async fn mirror(&self, root: &RemoteId, local_root: &Path) -> MirrorReport {
        let mut report = MirrorReport::new();
        let mut queue: VecDeque<(RemoteId, PathBuf)> = VecDeque::new();
        queue.push_back((root.clone(), local_root.to_path_buf()));

        while let Some((folder_id, local_dir)) = queue.pop_front() {
            if let Err(e) = self.local_fs.create_directory(&local_dir).await {
                warn!(folder = %folder_id, dir = %local_dir.display(), error = %e, "Cannot create local directory, skipping subtree");
                report.push(TransferRecord::failed(
                    &folder_id,
                    &local_dir,
                    format!("cannot create directory: {e:#}"),
                ));
                continue;
            }

            let children = match self.index.list_children(&ParentRef::from(&folder_id)).await {
                Ok(children) => children,
                Err(e) => {
                    warn!(folder = %folder_id, error = %e, "Cannot list folder, skipping subtree");
                    report.push(TransferRecord::failed(&folder_id, &local_dir, e.to_string()));
                    continue;
                }
            };
            debug!(folder = %folder_id, children = children.len(), "Listed folder");

            // Local names already taken in this directory; the first listed entry keeps it.
            let mut claimed: HashSet<String> = HashSet::new();
            for child in children {
                if !is_safe_local_name(&child.name) {
                    warn!(id = %child.id, name = %child.name, "Name cannot be used as a local path component");
                    report.push(TransferRecord::failed(
                        &child.id,
                        &local_dir,
                        format!("unsafe local name {:?}", child.name),
                    ));
                    continue;
                }

                let target = local_dir.join(&child.name);
                if !claimed.insert(child.name.clone()) {
                    warn!(id = %child.id, name = %child.name, "Duplicate name in folder, keeping first listed entry");
                    report.push(TransferRecord::skipped(
                        &child.id,
                        &target,
                        "duplicate name, first listed entry kept",
                    ));
                    continue;
                }
                match child.kind {
                    EntryKind::Folder => queue.push_back((child.id, target)),
                    EntryKind::File if !self.allowlist.allows(&child) => {
                        debug!(name = %child.name, "Extension not allowed");
                        report.push(TransferRecord::skipped(
                            &child.id,
                            &target,
                            "extension not allowed",
                        ));
                    }
                    EntryKind::File => {
                        let record = match self.download_to(&child.id, &target).await {
                            Ok(()) => TransferRecord::downloaded(&child.id, &target),
                            Err(e) => {
                                warn!(id = %child.id, target = %target.display(), error = %e, "Download failed");
                                TransferRecord::failed(&child.id, &target, e.to_string())
                            }
                        };
                        report.push(record);
                    }
                }
            }
        }

        info!(
            downloaded = report.count(TransferOutcome::Success),
            skipped = report.count(TransferOutcome::Skipped),
            failed = report.count(TransferOutcome::Failed),
            "Mirror finished"
        );
        report
    }

    async fn download_to(&self, id: &RemoteId, target: &Path) -> Result<(), SyncError> {
        let data = self
            .remote_store
            .download_file(id)
            .await
            .map_err(SyncError::remote)?;
        self.local_fs
            .write_file(target, &data)
            .await
            .map_err(|e| SyncError::LocalWriteFailure {
                path: target.to_path_buf(),
                reason: format!("{e:#}"),
            })
    }
}
