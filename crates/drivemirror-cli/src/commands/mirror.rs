//! Mirror command - Copy a remote folder tree into a local directory

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use drivemirror_core::domain::{RemoteId, TransferOutcome};
use tracing::info;

use super::{build_engine, load_config, GlobalArgs};
use crate::output::{get_formatter, plural};

#[derive(Debug, Args)]
pub struct MirrorCommand {
    /// Id of the remote folder to mirror
    pub folder_id: RemoteId,

    /// Local directory to mirror into (created if missing)
    pub local_dir: PathBuf,
}

impl MirrorCommand {
    pub async fn execute(&self, globals: &GlobalArgs) -> Result<()> {
        let formatter = get_formatter(globals.format);
        let engine = build_engine(load_config(&globals.config_path)?)?;

        info!(folder = %self.folder_id, dest = %self.local_dir.display(), "Mirroring folder");
        let report = engine.mirror_folder(&self.folder_id, &self.local_dir).await;

        if globals.format.is_json() {
            let json = serde_json::json!({
                "folder_id": self.folder_id,
                "local_dir": self.local_dir.display().to_string(),
                "downloaded": report.count(TransferOutcome::Success),
                "skipped": report.count(TransferOutcome::Skipped),
                "failed": report.count(TransferOutcome::Failed),
                "records": serde_json::to_value(&report.records)
                    .context("Failed to encode mirror report")?,
            });
            formatter.print_json(&json);
        } else {
            formatter.success(&format!(
                "Mirrored {} into {}",
                plural(report.count(TransferOutcome::Success), "file"),
                self.local_dir.display()
            ));
            let skipped = report.count(TransferOutcome::Skipped);
            if skipped > 0 {
                formatter.info(&format!("Skipped: {}", plural(skipped, "file")));
            }
            for record in report.records.iter().filter(|r| !r.is_success()) {
                formatter.transfer(record);
            }
        }

        if !report.is_clean() {
            bail!(
                "Mirror finished with {}",
                plural(report.count(TransferOutcome::Failed), "failure")
            );
        }
        Ok(())
    }
}
