//! Batch progress notifications.
//!
//! Sent once per finished job during a batch; `completed` increases by one
//! with every notification, whatever order jobs finish in.

use crate::job::{DownloadResult, JobStatus};

/// Snapshot after one job of a batch finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProgress {
    /// Jobs finished so far in this batch (1-based).
    pub completed: usize,
    /// Jobs in the batch.
    pub total: usize,
    /// URL of the job that just finished.
    pub url: String,
    pub status: JobStatus,
}

impl BatchProgress {
    pub(crate) fn new(completed: usize, total: usize, result: &DownloadResult) -> Self {
        Self {
            completed,
            total,
            url: result.url().to_string(),
            status: result.status(),
        }
    }

    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.completed as f64 / self.total as f64).min(1.0)
    }

    pub fn is_last(&self) -> bool {
        self.completed >= self.total
    }
}

pub(crate) async fn send_progress(
    progress_tx: Option<&tokio::sync::mpsc::Sender<BatchProgress>>,
    progress: BatchProgress,
) {
    if let Some(tx) = progress_tx {
        if tx.send(progress).await.is_err() {
            tracing::debug!("progress receiver dropped");
        }
    }
}
