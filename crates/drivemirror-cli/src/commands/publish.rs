//! Publish command - Upload a local file under the project root

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use drivemirror_core::domain::RemotePath;
use drivemirror_core::usecases::UpsertAction;
use tracing::info;

use super::{build_engine, load_config, GlobalArgs};
use crate::output::get_formatter;

#[derive(Debug, Args)]
pub struct PublishCommand {
    /// Local file to upload
    pub local_file: PathBuf,

    /// Slash-separated folder path under the project root, e.g. `results/run1`
    #[arg(long = "to", default_value = "")]
    pub remote_path: RemotePath,
}

impl PublishCommand {
    pub async fn execute(&self, globals: &GlobalArgs) -> Result<()> {
        let formatter = get_formatter(globals.format);
        let engine = build_engine(load_config(&globals.config_path)?)?;

        info!(local = %self.local_file.display(), remote_path = %self.remote_path, "Publishing file");
        let uploaded = engine
            .publish_file_to_path(&self.local_file, &self.remote_path)
            .await
            .with_context(|| format!("Failed to publish {}", self.local_file.display()))?;

        let action = match uploaded.action {
            UpsertAction::Created => "created",
            UpsertAction::Updated => "updated",
        };
        if globals.format.is_json() {
            formatter.print_json(&serde_json::json!({
                "local": self.local_file.display().to_string(),
                "remote_path": self.remote_path,
                "id": uploaded.id,
                "action": action,
                "content_type": uploaded.content_type,
            }));
        } else {
            formatter.success(&format!(
                "Published {} ({action})",
                self.local_file.display()
            ));
            formatter.info(&format!("Remote id:    {}", uploaded.id));
            formatter.info(&format!("Content type: {}", uploaded.content_type));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        cmd: PublishCommand,
    }

    #[test]
    fn test_to_is_parsed_as_remote_path() {
        let h = Harness::try_parse_from(["publish", "runs/best.pt", "--to", "Yolo/results"]).unwrap();
        assert_eq!(h.cmd.local_file, PathBuf::from("runs/best.pt"));
        assert_eq!(h.cmd.remote_path.segments(), ["Yolo", "results"]);
    }

    #[test]
    fn test_to_defaults_to_root() {
        let h = Harness::try_parse_from(["publish", "notes.txt"]).unwrap();
        assert!(h.cmd.remote_path.is_root());
    }

    #[test]
    fn test_invalid_remote_path_is_rejected() {
        assert!(Harness::try_parse_from(["publish", "a.txt", "--to", "a//b"]).is_err());
    }
}
