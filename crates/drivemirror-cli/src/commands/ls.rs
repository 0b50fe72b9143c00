//! Ls command - List the live children of a folder

use anyhow::{Context, Result};
use clap::Args;
use drivemirror_core::domain::{EntryKind, ParentRef, RemoteId};
use tracing::debug;

use super::{build_engine, load_config, GlobalArgs};
use crate::output::{get_formatter, plural};

#[derive(Debug, Args)]
pub struct LsCommand {
    /// Folder to list (top-level container when omitted)
    pub folder_id: Option<RemoteId>,
}

impl LsCommand {
    pub async fn execute(&self, globals: &GlobalArgs) -> Result<()> {
        let formatter = get_formatter(globals.format);
        let engine = build_engine(load_config(&globals.config_path)?)?;
        let folder = ParentRef::from(self.folder_id.clone());

        let mut entries = engine
            .list_folder(&folder)
            .await
            .with_context(|| format!("Failed to list {folder}"))?;
        debug!(folder = %folder, count = entries.len(), "Listing folder");
        // Folders first, then by name.
        entries.sort_by(|a, b| {
            (a.kind != EntryKind::Folder, &a.name).cmp(&(b.kind != EntryKind::Folder, &b.name))
        });

        if globals.format.is_json() {
            let json = serde_json::json!({
                "folder": folder.to_string(),
                "entries": serde_json::to_value(&entries).context("Failed to encode entries")?,
            });
            formatter.print_json(&json);
            return Ok(());
        }

        if entries.is_empty() {
            formatter.info(&format!("{folder} is empty"));
            return Ok(());
        }
        for entry in &entries {
            let name = if entry.is_folder() {
                format!("{}/", entry.name)
            } else {
                entry.name.clone()
            };
            formatter.info(&format!("{:<40} {}", name, entry.id));
        }
        formatter.success(&plural(entries.len(), "item"));
        Ok(())
    }
}
