//! Per-key async locks
//!
//! Folder resolution and file upsert are check-then-act sequences against
//! the remote store. [`KeyedLocks`] serializes them per `(parent, name)` so
//! that two tasks in this process cannot both observe "absent" and both
//! create. Other processes writing to the same store are not covered.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::ParentRef;

type LockKey = (ParentRef, String);

/// Lazily-created async mutexes keyed by `(parent, name)`
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: DashMap<LockKey, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `(parent, name)`
    ///
    /// The returned guard releases the key when dropped.
    pub async fn acquire(&self, parent: &ParentRef, name: &str) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the shard lock is released before awaiting.
        let lock = self
            .locks
            .entry((parent.clone(), name.to_string()))
            .or_default()
            .value()
            .clone();
        lock.lock_owned().await
    }

    /// Number of distinct keys seen so far
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
