//! Fetch command - Download one named file from a folder

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use drivemirror_core::domain::{ParentRef, RemoteId};
use drivemirror_sync::EngineError;
use tracing::info;

use super::{build_engine, load_config, GlobalArgs};
use crate::output::get_formatter;

#[derive(Debug, Args)]
pub struct FetchCommand {
    /// Name of the file to download
    pub name: String,

    /// Folder to look in (top-level container when omitted)
    #[arg(long)]
    pub folder: Option<RemoteId>,

    /// Local directory to write into (created if missing)
    #[arg(long, default_value = ".")]
    pub dest: PathBuf,
}

impl FetchCommand {
    pub async fn execute(&self, globals: &GlobalArgs) -> Result<()> {
        let formatter = get_formatter(globals.format);
        let engine = build_engine(load_config(&globals.config_path)?)?;
        let folder = ParentRef::from(self.folder.clone());

        info!(name = %self.name, folder = %folder, "Fetching file");
        match engine.fetch_file(&self.name, &folder, &self.dest).await {
            Ok(path) => {
                if globals.format.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "name": self.name,
                        "folder": folder.to_string(),
                        "path": path.display().to_string(),
                    }));
                } else {
                    formatter.success(&format!("Fetched {} to {}", self.name, path.display()));
                }
                Ok(())
            }
            Err(e @ EngineError::FileNotFound { .. }) => {
                if globals.format.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "name": self.name,
                        "folder": folder.to_string(),
                        "found": false,
                    }));
                } else {
                    formatter.warn(&e.to_string());
                }
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}
