//! Per-file locks for memory read-modify-write cycles
//!
//! A request that updates memory holds the lock for its resolved memory path
//! from load until the updated file is written. Requests that only read
//! memory never take it; atomic writes keep their reads consistent.
//!
//! Keys are normalized lexically, so `data/../data/m.json` and `data/m.json`
//! share a lock. Symlinks are not followed.

use dashmap::DashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of async locks keyed by resolved memory path
#[derive(Debug, Default)]
pub struct MemoryLocks {
    slots: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl MemoryLocks {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `path`
    ///
    /// The lock is released when the returned guard drops.
    pub async fn acquire(&self, path: &Path) -> OwnedMutexGuard<()> {
        let slot = self.slots.entry(lock_key(path)).or_default().clone();
        slot.lock_owned().await
    }

    /// Number of distinct paths seen so far
    #[inline]
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.slots.len()
    }
}

/// Collapse `.` and `..` components without touching the filesystem
fn lock_key(path: &Path) -> PathBuf {
    let mut key = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match key.components().next_back() {
                Some(Component::Normal(_)) => {
                    key.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => key.push(component),
            },
            other => key.push(other),
        }
    }
    key
}
