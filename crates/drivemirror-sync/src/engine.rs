//! Workflow orchestration
//!
//! The [`SyncEngine`] wires the core use cases to a remote store and a local
//! filesystem and runs the three configured workflows:
//!
//! 1. **Analysis**: locate the analysis folder, download the first data file
//!    into a temporary file and summarize it
//! 2. **Training**: mirror each dataset split into the local training root
//! 3. **Publish**: upload configured local files to folder paths
//!
//! Every workflow returns a serializable summary. Failures of individual
//! splits or publish targets are recorded in the summary; the run continues.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use drivemirror_core::config::Config;
use drivemirror_core::domain::{
    is_safe_local_name, DomainError, EntryKind, MirrorReport, ParentRef, RemoteEntry, RemoteId,
    RemotePath, SyncError, TransferOutcome, TransferRecord,
};
use drivemirror_core::ports::{ILocalFileSystem, IRemoteStore};
use drivemirror_core::usecases::{
    DirectoryIndex, FileUpsert, FolderResolver, TreeMirror, TreePublisher, UpsertedFile,
};

use crate::temp::{TempDownload, TextPreview};
use crate::EngineError;

// ============================================================================
// Workflow selection and summaries
// ============================================================================

/// Which configured workflow(s) to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Workflow {
    Analysis,
    Training,
    Publish,
    All,
}

impl Workflow {
    fn includes(self, other: Workflow) -> bool {
        self == Workflow::All || self == other
    }
}

/// The data file picked by the analysis workflow
#[derive(Debug, Clone, Serialize)]
pub struct InspectedFile {
    pub id: RemoteId,
    pub name: String,
    /// Where the temporary copy lived; it no longer exists once reported
    pub temp_path: PathBuf,
    pub preview: TextPreview,
}

/// Result of the analysis workflow
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub folder_id: RemoteId,
    /// `None` when the folder holds no file with the inspected extension
    pub inspected: Option<InspectedFile>,
}

/// Result of mirroring one dataset split
#[derive(Debug, Clone, Serialize)]
pub struct SplitOutcome {
    pub split: String,
    pub local_dir: PathBuf,
    /// Present when the split folder was resolved and mirrored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<MirrorReport>,
    /// Present when the split folder could not be resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SplitOutcome {
    pub fn is_clean(&self) -> bool {
        self.error.is_none() && self.report.as_ref().map_or(true, MirrorReport::is_clean)
    }
}

/// Result of the training workflow
#[derive(Debug, Clone, Serialize)]
pub struct TrainingSummary {
    /// Id of the resolved dataset folder (`root` for the top level)
    pub dataset_folder: String,
    pub splits: Vec<SplitOutcome>,
}

impl TrainingSummary {
    /// Transfer counts summed over every mirrored split
    pub fn count(&self, outcome: TransferOutcome) -> usize {
        self.splits
            .iter()
            .filter_map(|s| s.report.as_ref())
            .map(|r| r.count(outcome))
            .sum()
    }
}

/// Result of the publish workflow, one record per configured target
#[derive(Debug, Clone, Default, Serialize)]
pub struct PublishSummary {
    pub records: Vec<TransferRecord>,
}

impl PublishSummary {
    pub fn count(&self, outcome: TransferOutcome) -> usize {
        self.records.iter().filter(|r| r.outcome == outcome).count()
    }
}

/// A workflow that could not run at all
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowFailure {
    pub workflow: Workflow,
    pub error: String,
}

/// Everything one `run` produced
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training: Option<TrainingSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish: Option<PublishSummary>,
    pub failures: Vec<WorkflowFailure>,
}

impl RunSummary {
    /// Returns true if no workflow, split, file or target failed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
            && self
                .training
                .as_ref()
                .map_or(true, |t| t.splits.iter().all(SplitOutcome::is_clean))
            && self
                .publish
                .as_ref()
                .map_or(true, |p| p.count(TransferOutcome::Failed) == 0)
    }
}

// ============================================================================
// SyncEngine
// ============================================================================

/// Orchestrates the configured workflows over the core use cases
///
/// ## Dependencies
///
/// - `remote_store`: Remote folder/file operations
/// - `local_fs`: Local file I/O and directory creation
/// - `config`: Folder names, paths, allowlist and publish targets
pub struct SyncEngine {
    config: Config,
    remote_store: Arc<dyn IRemoteStore + Send + Sync>,
    local_fs: Arc<dyn ILocalFileSystem + Send + Sync>,
    index: DirectoryIndex,
    resolver: FolderResolver,
    mirror: TreeMirror,
    publisher: TreePublisher,
}

impl SyncEngine {
    /// Creates a new `SyncEngine`
    ///
    /// # Arguments
    /// * `config` - Application configuration
    /// * `remote_store` - Remote store adapter
    /// * `local_fs` - Local filesystem adapter
    pub fn new(
        config: Config,
        remote_store: Arc<dyn IRemoteStore + Send + Sync>,
        local_fs: Arc<dyn ILocalFileSystem + Send + Sync>,
    ) -> Self {
        let upsert = Arc::new(FileUpsert::new(Arc::clone(&remote_store)));
        Self {
            index: DirectoryIndex::new(Arc::clone(&remote_store)),
            resolver: FolderResolver::new(Arc::clone(&remote_store)),
            mirror: TreeMirror::new(
                Arc::clone(&remote_store),
                Arc::clone(&local_fs),
                config.allowlist(),
            ),
            publisher: TreePublisher::new(upsert, Arc::clone(&local_fs)),
            config,
            remote_store,
            local_fs,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the selected workflow(s)
    ///
    /// With [`Workflow::All`] a workflow that fails outright is recorded in
    /// [`RunSummary::failures`] and the remaining ones still run.
    #[instrument(skip(self))]
    pub async fn run(&self, workflow: Workflow) -> RunSummary {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut summary = RunSummary {
            started_at,
            duration_ms: 0,
            analysis: None,
            training: None,
            publish: None,
            failures: Vec::new(),
        };

        info!(?workflow, root = %self.config.project_root(), "Starting run");

        if workflow.includes(Workflow::Analysis) {
            match self.run_analysis().await {
                Ok(analysis) => summary.analysis = Some(analysis),
                Err(e) => summary.failures.push(failure(Workflow::Analysis, &e)),
            }
        }
        if workflow.includes(Workflow::Training) {
            match self.run_training().await {
                Ok(training) => summary.training = Some(training),
                Err(e) => summary.failures.push(failure(Workflow::Training, &e)),
            }
        }
        if workflow.includes(Workflow::Publish) {
            summary.publish = Some(self.run_publish().await);
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            duration_ms = summary.duration_ms,
            failures = summary.failures.len(),
            clean = summary.is_clean(),
            "Run finished"
        );
        summary
    }

    /// Resolves the analysis folder and inspects its first data file
    ///
    /// The file is downloaded into a temporary file that is removed before
    /// this returns, on every path.
    ///
    /// # Errors
    /// Fails if the folder cannot be resolved or listed, or if the selected
    /// file cannot be downloaded or parked in a temporary file.
    #[instrument(skip(self))]
    pub async fn run_analysis(&self) -> Result<AnalysisSummary, EngineError> {
        let analysis = &self.config.workflows.analysis;
        let root = self.config.project_root();
        let folder_id = self.resolver.resolve(&analysis.folder, &root).await?;
        info!(folder = %analysis.folder, id = %folder_id, "Analysis folder ready");

        let suffix = format!(
            ".{}",
            analysis.inspect_extension.trim_start_matches('.').to_ascii_lowercase()
        );
        let children = self.index.list_children(&ParentRef::from(&folder_id)).await?;
        let candidate = children
            .into_iter()
            .find(|e| e.kind == EntryKind::File && e.name.to_ascii_lowercase().ends_with(&suffix));

        let Some(entry) = candidate else {
            info!(suffix = %suffix, "No file to inspect in analysis folder");
            return Ok(AnalysisSummary {
                folder_id,
                inspected: None,
            });
        };

        let data = self
            .remote_store
            .download_file(&entry.id)
            .await
            .map_err(SyncError::remote)?;
        let temp = TempDownload::write(analysis.temp_dir.clone(), suffix, data).await?;
        let temp_path = temp.path().to_path_buf();
        let preview = temp.preview().await?;
        drop(temp);

        info!(
            name = %entry.name,
            bytes = preview.bytes,
            lines = preview.lines,
            "Inspected data file"
        );
        Ok(AnalysisSummary {
            folder_id,
            inspected: Some(InspectedFile {
                id: entry.id,
                name: entry.name,
                temp_path,
                preview,
            }),
        })
    }

    /// Mirrors every configured split of the dataset folder
    ///
    /// # Errors
    /// Fails only if the dataset folder path cannot be resolved. A split that
    /// cannot be resolved is recorded and the next split is attempted.
    #[instrument(skip(self))]
    pub async fn run_training(&self) -> Result<TrainingSummary, EngineError> {
        let training = &self.config.workflows.training;
        let dataset = self
            .resolver
            .resolve_path(&training.folder_path, &self.config.project_root())
            .await?;
        info!(path = %training.folder_path, folder = %dataset, "Dataset folder ready");

        let mut splits = Vec::with_capacity(training.splits.len());
        for split in &training.splits {
            let local_dir = training.local_root.join(split);
            let outcome = match self.resolver.resolve(split, &dataset).await {
                Ok(split_id) => {
                    let report = self.mirror.mirror(&split_id, &local_dir).await;
                    SplitOutcome {
                        split: split.clone(),
                        local_dir,
                        report: Some(report),
                        error: None,
                    }
                }
                Err(e) => {
                    warn!(split = %split, error = %e, "Cannot resolve split folder, skipping");
                    SplitOutcome {
                        split: split.clone(),
                        local_dir,
                        report: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            splits.push(outcome);
        }

        Ok(TrainingSummary {
            dataset_folder: dataset.to_string(),
            splits,
        })
    }

    /// Publishes every configured target; failures are recorded per target
    #[instrument(skip(self))]
    pub async fn run_publish(&self) -> PublishSummary {
        let mut summary = PublishSummary::default();
        for target in &self.config.workflows.publish {
            let record = match self
                .publish_file_to_path(&target.local, &target.remote_path)
                .await
            {
                Ok(uploaded) => TransferRecord::uploaded(&target.local, &uploaded.id),
                Err(e) => {
                    warn!(local = %target.local.display(), remote = %target.remote_path, error = %e, "Publish failed");
                    TransferRecord::upload_failed(
                        &target.local,
                        target.remote_path.to_string(),
                        e.to_string(),
                    )
                }
            };
            summary.records.push(record);
        }
        summary
    }

    /// Mirrors an arbitrary remote folder into `local_dir`
    pub async fn mirror_folder(&self, folder: &RemoteId, local_dir: &Path) -> MirrorReport {
        self.mirror.mirror(folder, local_dir).await
    }

    /// Resolves `remote_path` under the project root, then publishes `local_file`
    ///
    /// # Errors
    /// - [`SyncError::LocalPathNotFound`] / [`SyncError::LocalReadFailure`] for
    ///   the local side
    /// - [`SyncError::RemoteUnavailable`] if resolution or upload fails
    pub async fn publish_file_to_path(
        &self,
        local_file: &Path,
        remote_path: &RemotePath,
    ) -> Result<UpsertedFile, SyncError> {
        // Check the local file first so a bad path does not create remote folders.
        let state = self
            .local_fs
            .get_state(local_file)
            .await
            .map_err(|e| SyncError::LocalReadFailure {
                path: local_file.to_path_buf(),
                reason: format!("{e:#}"),
            })?;
        if !state.exists {
            return Err(SyncError::LocalPathNotFound(local_file.to_path_buf()));
        }
        if !state.is_regular_file() {
            return Err(SyncError::LocalReadFailure {
                path: local_file.to_path_buf(),
                reason: "not a regular file".to_string(),
            });
        }

        let folder = self
            .resolver
            .resolve_path(remote_path, &self.config.project_root())
            .await?;
        self.publisher.publish(local_file, &folder).await
    }

    /// Downloads the file named `name` from `folder` into `dest_dir`
    ///
    /// `dest_dir` is created if missing. Returns the written path.
    ///
    /// # Errors
    /// [`EngineError::FileNotFound`] if `folder` has no such file
    #[instrument(skip(self), fields(folder = %folder, dest = %dest_dir.display()))]
    pub async fn fetch_file(
        &self,
        name: &str,
        folder: &ParentRef,
        dest_dir: &Path,
    ) -> Result<PathBuf, EngineError> {
        if !is_safe_local_name(name) {
            return Err(SyncError::from(DomainError::InvalidEntryName(name.to_string())).into());
        }

        let entry = self
            .index
            .find_child(folder, name, Some(EntryKind::File))
            .await?
            .ok_or_else(|| EngineError::FileNotFound {
                name: name.to_string(),
                folder: folder.to_string(),
            })?;

        let data = self
            .remote_store
            .download_file(&entry.id)
            .await
            .map_err(SyncError::remote)?;

        let target = dest_dir.join(name);
        let write_failure = |e: anyhow::Error, path: &Path| SyncError::LocalWriteFailure {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        };
        self.local_fs
            .create_directory(dest_dir)
            .await
            .map_err(|e| write_failure(e, dest_dir))?;
        self.local_fs
            .write_file(&target, &data)
            .await
            .map_err(|e| write_failure(e, &target))?;

        info!(id = %entry.id, bytes = data.len(), target = %target.display(), "Fetched file");
        Ok(target)
    }

    /// Lists the live children of `folder`
    pub async fn list_folder(&self, folder: &ParentRef) -> Result<Vec<RemoteEntry>, SyncError> {
        let entries = self.index.list_children(folder).await?;
        debug!(folder = %folder, count = entries.len(), "Listed folder");
        Ok(entries)
    }
}

fn failure(workflow: Workflow, err: &EngineError) -> WorkflowFailure {
    warn!(?workflow, error = %err, "Workflow failed");
    WorkflowFailure {
        workflow,
        error: err.to_string(),
    }
}
