//! CLI command implementations
//!
//! Every command receives the parsed [`GlobalArgs`]. Commands that talk to
//! Drive go through [`build_engine`], which wires the real adapters into a
//! [`SyncEngine`].

pub mod config;
pub mod fetch;
pub mod ls;
pub mod mirror;
pub mod publish;
pub mod sync;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use drivemirror_core::config::Config;
use drivemirror_gdrive::client::DriveClient;
use drivemirror_gdrive::provider::DriveRemoteStore;
use drivemirror_sync::engine::SyncEngine;
use drivemirror_sync::filesystem::LocalFileSystemAdapter;
use tracing::{debug, info};

use crate::output::OutputFormat;

/// Flags shared by every subcommand
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub format: OutputFormat,
    pub config_path: PathBuf,
}

/// Loads the config file, or the defaults when it does not exist
///
/// A file that exists but cannot be parsed is an error.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(config_path = %path.display(), "No configuration file, using defaults");
        return Ok(Config::default());
    }
    let config = Config::load(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    info!(config_path = %path.display(), "Loaded configuration");
    Ok(config)
}

/// Reads the access token from the environment variable named in the config
pub fn access_token(config: &Config) -> Result<String> {
    let var = &config.auth.token_env;
    match std::env::var(var) {
        Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Ok(_) => bail!("Environment variable {var} is empty"),
        Err(_) => bail!("No access token found. Export a Drive OAuth access token in {var}"),
    }
}

/// Builds a [`SyncEngine`] backed by Google Drive and the local filesystem
pub fn build_engine(config: Config) -> Result<SyncEngine> {
    let token = access_token(&config)?;
    let client = DriveClient::with_base_urls(
        token,
        &config.remote.api_base_url,
        &config.remote.upload_base_url,
    );
    let remote_store = Arc::new(DriveRemoteStore::new(client));
    let local_fs = Arc::new(LocalFileSystemAdapter::new());
    Ok(SyncEngine::new(config, remote_store, local_fs))
}
