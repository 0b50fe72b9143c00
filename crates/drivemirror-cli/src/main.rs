//! drivemirror CLI - Command-line interface for drivemirror
//!
//! Provides commands for:
//! - Running the configured analysis, training and publish workflows
//! - Mirroring a Drive folder to a local directory
//! - Publishing a local file under the project root
//! - Fetching a single file and listing folders
//! - Inspecting the configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use drivemirror_core::config::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{
    config::ConfigCommand, fetch::FetchCommand, ls::LsCommand, mirror::MirrorCommand,
    publish::PublishCommand, sync::SyncCommand, GlobalArgs,
};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "drivemirror",
    version,
    about = "Mirror Google Drive folders and publish results back"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the configured workflows
    Sync(SyncCommand),
    /// Mirror a remote folder into a local directory
    Mirror(MirrorCommand),
    /// Upload a local file under the project root
    Publish(PublishCommand),
    /// Download one named file from a folder
    Fetch(FetchCommand),
    /// List the children of a folder
    Ls(LsCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Picks the log filter: `-v` flags win, then `RUST_LOG`, then the config
fn env_filter(verbose: u8, config_level: &str) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_level)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn init_tracing(verbose: u8, config: &Config) {
    let filter = env_filter(verbose, &config.logging.level);
    // Logs go to stderr so `--json` output on stdout stays parseable.
    if config.logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    // Unreadable files surface through `config validate`; logging falls back to defaults.
    init_tracing(cli.verbose, &Config::load_or_default(&config_path));

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let globals = GlobalArgs {
        format,
        config_path,
    };

    match cli.command {
        Commands::Sync(cmd) => cmd.execute(&globals).await,
        Commands::Mirror(cmd) => cmd.execute(&globals).await,
        Commands::Publish(cmd) => cmd.execute(&globals).await,
        Commands::Fetch(cmd) => cmd.execute(&globals).await,
        Commands::Ls(cmd) => cmd.execute(&globals).await,
        Commands::Config(cmd) => cmd.execute(&globals).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "drivemirror",
            "ls",
            "--json",
            "-vv",
            "--config",
            "/tmp/dm.yaml",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/dm.yaml")));
        assert!(matches!(cli.command, Commands::Ls(_)));
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["drivemirror"]).is_err());
    }
}
