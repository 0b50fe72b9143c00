//! Sync command - Run the configured workflows
//!
//! Provides the `drivemirror sync` CLI command which:
//! 1. Loads and validates the configuration
//! 2. Reads the access token from the configured environment variable
//! 3. Creates the Drive and filesystem adapters
//! 4. Runs the SyncEngine and displays the per-workflow results

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use drivemirror_core::domain::TransferOutcome;
use drivemirror_sync::engine::{RunSummary, Workflow};
use tracing::info;

use super::{build_engine, load_config, GlobalArgs};
use crate::output::{get_formatter, plural, OutputFormatter};

/// Workflow selector accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WorkflowArg {
    Analysis,
    Training,
    Publish,
    All,
}

impl From<WorkflowArg> for Workflow {
    fn from(arg: WorkflowArg) -> Self {
        match arg {
            WorkflowArg::Analysis => Workflow::Analysis,
            WorkflowArg::Training => Workflow::Training,
            WorkflowArg::Publish => Workflow::Publish,
            WorkflowArg::All => Workflow::All,
        }
    }
}

#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Which workflow to run
    #[arg(long, value_enum, default_value_t = WorkflowArg::All)]
    pub workflow: WorkflowArg,
}

impl SyncCommand {
    pub async fn execute(&self, globals: &GlobalArgs) -> Result<()> {
        let formatter = get_formatter(globals.format);
        let config = load_config(&globals.config_path)?;

        let errors = config.validate();
        if !errors.is_empty() {
            for error in &errors {
                formatter.error(&error.to_string());
            }
            bail!(
                "Configuration has {}; run 'drivemirror config validate'",
                plural(errors.len(), "error")
            );
        }

        let engine = build_engine(config)?;
        let workflow = Workflow::from(self.workflow);
        info!(?workflow, "Running sync");
        formatter.info("Starting synchronization...");

        let summary = engine.run(workflow).await;

        if globals.format.is_json() {
            let json = serde_json::to_value(&summary).context("Failed to encode run summary")?;
            formatter.print_json(&json);
        } else {
            render_human(&summary, formatter.as_ref());
        }

        if !summary.is_clean() {
            bail!("Sync finished with failures");
        }
        Ok(())
    }
}

fn duration_display(ms: u64) -> String {
    if ms >= 1000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        format!("{ms}ms")
    }
}

fn render_human(summary: &RunSummary, formatter: &dyn OutputFormatter) {
    if let Some(analysis) = &summary.analysis {
        match &analysis.inspected {
            Some(file) => {
                formatter.success(&format!("Analysis: inspected {}", file.name));
                formatter.info(&format!(
                    "{} bytes, {}",
                    file.preview.bytes,
                    plural(file.preview.lines, "line")
                ));
                if let Some(header) = &file.preview.header {
                    formatter.info(&format!("Header: {header}"));
                }
            }
            None => formatter.warn(&format!(
                "Analysis: no matching file in folder {}",
                analysis.folder_id
            )),
        }
    }

    if let Some(training) = &summary.training {
        formatter.success(&format!(
            "Training: {} downloaded from {}",
            plural(training.count(TransferOutcome::Success), "file"),
            plural(training.splits.len(), "split")
        ));
        for split in &training.splits {
            match (&split.report, &split.error) {
                (_, Some(error)) => formatter.error(&format!("{}: {error}", split.split)),
                (Some(report), None) => {
                    formatter.info(&format!(
                        "{:<8} -> {} ({} downloaded, {} skipped, {} failed)",
                        split.split,
                        split.local_dir.display(),
                        report.count(TransferOutcome::Success),
                        report.count(TransferOutcome::Skipped),
                        report.count(TransferOutcome::Failed),
                    ));
                    for failed in report.failed() {
                        formatter.transfer(failed);
                    }
                }
                (None, None) => {}
            }
        }
    }

    if let Some(publish) = &summary.publish {
        formatter.success(&format!(
            "Publish: {} uploaded",
            plural(publish.count(TransferOutcome::Success), "file")
        ));
        for record in &publish.records {
            formatter.transfer(record);
        }
    }

    for failure in &summary.failures {
        formatter.error(&format!("{:?} workflow failed: {}", failure.workflow, failure.error));
    }

    formatter.info(&format!("Finished in {}", duration_display(summary.duration_ms)));
}
