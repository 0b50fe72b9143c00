//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IRemoteStore`] - Remote folder/file store operations (Google Drive)
//! - [`ILocalFileSystem`] - Local filesystem operations

pub mod local_filesystem;
pub mod remote_store;

pub use local_filesystem::{FileSystemState, ILocalFileSystem};
pub use remote_store::{EntryQuery, IRemoteStore};
