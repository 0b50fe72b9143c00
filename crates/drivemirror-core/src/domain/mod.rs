//! Domain entities
//!
//! This module contains the core domain types for drivemirror:
//! - Newtypes for remote identifiers and folder paths
//! - Remote entry records
//! - Transfer records used for per-run reporting
//! - Domain-specific error types

pub mod entry;
pub mod errors;
pub mod newtypes;
pub mod transfer;

// Re-export commonly used types
pub use entry::{extension_of, is_safe_local_name, EntryKind, RemoteEntry, FOLDER_CONTENT_TYPE};
pub use errors::{DomainError, SyncError};
pub use newtypes::*;
pub use transfer::{MirrorReport, TransferOutcome, TransferRecord, TransferSource};
