//! drivemirror Core - Domain logic and synchronization rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `RemoteEntry`, `TransferRecord`, `MirrorReport`
//! - **Use cases** - `DirectoryIndex`, `FolderResolver`, `FileUpsert`, `TreeMirror`, `TreePublisher`
//! - **Port definitions** - Traits for adapters: `IRemoteStore`, `ILocalFileSystem`
//!
//! # Architecture
//!
//! The domain module contains pure data types with no I/O.
//! Ports define trait interfaces that adapter crates implement.
//! Use cases orchestrate domain entities through port interfaces.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
