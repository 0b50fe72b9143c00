//! drivemirror Sync - Mirror and publish workflows
//!
//! Provides:
//! - The local filesystem adapter
//! - Scoped temporary downloads with a text preview
//! - The [`engine::SyncEngine`] orchestrator running the configured workflows
//!
//! ## Modules
//!
//! - [`engine`] - Workflow orchestration over the core use cases
//! - [`filesystem`] - Local filesystem adapter (atomic writes)
//! - [`temp`] - Temporary download guard

pub mod engine;
pub mod filesystem;
pub mod temp;

use thiserror::Error;

use drivemirror_core::domain::SyncError;

/// Errors surfaced by the orchestrator
#[derive(Debug, Error)]
pub enum EngineError {
    /// A core use case failed
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// A named file was looked up and is not in the folder
    #[error("No file named '{name}' in folder {folder}")]
    FileNotFound {
        /// The requested file name
        name: String,
        /// The folder that was searched
        folder: String,
    },

    /// The temporary download could not be created or read
    #[error("Temporary file error: {0}")]
    TempFile(#[from] std::io::Error),
}
