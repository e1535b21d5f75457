//! Per-path async locks for the final rename step.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

/// Serializes work on the same final path across concurrently running jobs.
/// Cloning shares the underlying table.
#[derive(Debug, Clone, Default)]
pub struct PathLocks {
    table: Arc<Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other holder has `path`, then returns the guard.
    pub async fn lock(&self, path: &Path) -> OwnedMutexGuard<()> {
        let entry = {
            let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            // Drop entries nobody holds or waits on.
            table.retain(|_, m| Arc::strong_count(m) > 1);
            Arc::clone(table.entry(path.to_path_buf()).or_default())
        };
        entry.lock_owned().await
    }

    /// Number of paths currently tracked.
    pub fn tracked(&self) -> usize {
        self.table.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
