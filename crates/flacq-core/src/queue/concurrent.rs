//! Bounded worker pool over the queue.
//!
//! Up to `max_concurrent` jobs run at once on the tokio runtime. Finished
//! jobs report back over a channel so progress follows completion order,
//! while the batch result keeps queue order.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use super::progress::{send_progress, BatchProgress};
use crate::extractor::Extractor;
use crate::job::{DownloadResult, Job};
use crate::runner::JobRunner;

/// Runs `jobs` with at most `max_concurrent` in flight. Returns one result
/// per job, in the order of `jobs`. A job whose task dies without reporting
/// gets an error result.
pub(super) async fn run_pool<E>(
    jobs: &[Job],
    runner: &JobRunner<E>,
    output_dir: &Path,
    max_concurrent: usize,
    progress_tx: Option<&mpsc::Sender<BatchProgress>>,
) -> Vec<DownloadResult>
where
    E: Extractor + 'static,
{
    let total = jobs.len();
    let permits = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<(usize, DownloadResult)>();
    let mut tasks = JoinSet::new();

    for (index, job) in jobs.iter().cloned().enumerate() {
        let runner = runner.clone();
        let output_dir = output_dir.to_path_buf();
        let permits = Arc::clone(&permits);
        let done_tx = done_tx.clone();
        tasks.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            let result = runner.run(&job, &output_dir).await;
            let _ = done_tx.send((index, result));
        });
    }
    drop(done_tx);

    let mut slots: Vec<Option<DownloadResult>> = vec![None; total];
    let mut completed = 0usize;

    while let Some((index, result)) = done_rx.recv().await {
        completed += 1;
        send_progress(progress_tx, BatchProgress::new(completed, total, &result)).await;
        slots[index] = Some(result);
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::warn!("job task ended abnormally: {}", e);
        }
    }

    let mut batch = Vec::with_capacity(total);
    for (slot, job) in slots.into_iter().zip(jobs) {
        let result = match slot {
            Some(r) => r,
            None => {
                let r = DownloadResult::error(job, "job task ended without a result");
                completed += 1;
                send_progress(progress_tx, BatchProgress::new(completed, total, &r)).await;
                r
            }
        };
        batch.push(result);
    }
    batch
}
