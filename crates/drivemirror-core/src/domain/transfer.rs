//! Transfer records
//!
//! Ephemeral per-run reporting types. A [`TransferRecord`] is produced for
//! every entry a tree walk touches so that no outcome silently disappears.
//! Nothing here is persisted.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::newtypes::RemoteId;

/// Where a transfer read its content from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TransferSource {
    Remote(RemoteId),
    Local(PathBuf),
}

/// Result of one transfer attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferOutcome {
    Success,
    Skipped,
    Failed,
}

/// Outcome of one download or upload attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRecord {
    /// Remote id or local path the content came from
    pub source: TransferSource,
    /// Local path or remote file id the content was written to
    pub destination: String,
    /// What happened
    pub outcome: TransferOutcome,
    /// Why the entry was skipped or failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TransferRecord {
    /// A remote entry that was downloaded to `destination`
    pub fn downloaded(id: &RemoteId, destination: &Path) -> Self {
        Self {
            source: TransferSource::Remote(id.clone()),
            destination: destination.display().to_string(),
            outcome: TransferOutcome::Success,
            reason: None,
        }
    }

    /// A remote entry that was deliberately not downloaded
    pub fn skipped(id: &RemoteId, destination: &Path, reason: impl Into<String>) -> Self {
        Self {
            source: TransferSource::Remote(id.clone()),
            destination: destination.display().to_string(),
            outcome: TransferOutcome::Skipped,
            reason: Some(reason.into()),
        }
    }

    /// A remote entry (file or whole subtree) that could not be materialized
    pub fn failed(id: &RemoteId, destination: &Path, reason: impl Into<String>) -> Self {
        Self {
            source: TransferSource::Remote(id.clone()),
            destination: destination.display().to_string(),
            outcome: TransferOutcome::Failed,
            reason: Some(reason.into()),
        }
    }

    /// A local file that now lives in the remote store as `file`
    pub fn uploaded(path: &Path, file: &RemoteId) -> Self {
        Self {
            source: TransferSource::Local(path.to_path_buf()),
            destination: file.to_string(),
            outcome: TransferOutcome::Success,
            reason: None,
        }
    }

    /// A local file that could not be uploaded
    pub fn upload_failed(path: &Path, destination: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source: TransferSource::Local(path.to_path_buf()),
            destination: destination.into(),
            outcome: TransferOutcome::Failed,
            reason: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == TransferOutcome::Success
    }
}

/// All records produced by one tree mirror, in traversal order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MirrorReport {
    pub records: Vec<TransferRecord>,
}

impl MirrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: TransferRecord) {
        self.records.push(record);
    }

    /// Local paths of successfully downloaded files
    pub fn downloaded_paths(&self) -> Vec<PathBuf> {
        self.records
            .iter()
            .filter(|r| r.outcome == TransferOutcome::Success)
            .map(|r| PathBuf::from(&r.destination))
            .collect()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &TransferRecord> {
        self.with_outcome(TransferOutcome::Skipped)
    }

    pub fn failed(&self) -> impl Iterator<Item = &TransferRecord> {
        self.with_outcome(TransferOutcome::Failed)
    }

    /// Number of records with the given outcome
    pub fn count(&self, outcome: TransferOutcome) -> usize {
        self.with_outcome(outcome).count()
    }

    /// Returns true if nothing failed
    pub fn is_clean(&self) -> bool {
        self.count(TransferOutcome::Failed) == 0
    }

    fn with_outcome(&self, outcome: TransferOutcome) -> impl Iterator<Item = &TransferRecord> {
        self.records.iter().filter(move |r| r.outcome == outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> RemoteId {
        RemoteId::new(s.to_string()).unwrap()
    }

    #[test]
    fn report_partitions_by_outcome() {
        let mut report = MirrorReport::new();
        report.push(TransferRecord::downloaded(&id("a"), Path::new("/m/a.jpg")));
        report.push(TransferRecord::skipped(&id("b"), Path::new("/m/b.pdf"), "extension not allowed"));
        report.push(TransferRecord::failed(&id("c"), Path::new("/m/c.txt"), "boom"));

        assert_eq!(report.downloaded_paths(), vec![PathBuf::from("/m/a.jpg")]);
        assert_eq!(report.count(TransferOutcome::Skipped), 1);
        assert_eq!(report.failed().count(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn record_serializes_with_tagged_source() {
        let record = TransferRecord::uploaded(Path::new("/tmp/x.txt"), &id("F1"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["source"]["type"], "local");
        assert_eq!(json["destination"], "F1");
        assert_eq!(json["outcome"], "success");
        assert!(json.get("reason").is_none());
    }
}
