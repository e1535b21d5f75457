//! Ordered download queue and result log.
//!
//! [`QueueManager`] owns the pending jobs (deduplicated by URL, processed in
//! insertion order) and the append-only log of finished results. A batch run
//! borrows the manager mutably for its whole duration, so the queue cannot
//! be edited while jobs are in flight.

mod concurrent;
mod error;
mod progress;

use std::path::Path;

use tokio::sync::mpsc;

use crate::extractor::Extractor;
use crate::job::{DownloadResult, Job};
use crate::runner::JobRunner;

pub use error::QueueError;
pub use progress::BatchProgress;

use progress::send_progress;

/// Pending jobs plus the log of every result produced so far.
#[derive(Debug, Default)]
pub struct QueueManager {
    jobs: Vec<Job>,
    results: Vec<DownloadResult>,
}

impl QueueManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `url` unless it is blank or already queued. Returns whether it was added.
    pub fn enqueue(&mut self, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() || self.contains(url) {
            return false;
        }
        self.jobs.push(Job::new(url));
        tracing::debug!(url, position = self.jobs.len() - 1, "queued");
        true
    }

    /// Enqueues each URL in order. Returns how many were actually added.
    pub fn enqueue_many<I, S>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for url in urls {
            if self.enqueue(url.as_ref()) {
                added += 1;
            }
        }
        added
    }

    /// Removes the job at `position` (0-based); later jobs shift down by one.
    pub fn remove(&mut self, position: usize) -> Result<Job, QueueError> {
        if position >= self.jobs.len() {
            return Err(QueueError::IndexOutOfRange {
                position,
                len: self.jobs.len(),
            });
        }
        let job = self.jobs.remove(position);
        tracing::debug!(url = %job.url(), position, "removed from queue");
        Ok(job)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.jobs.iter().any(|j| j.url() == url)
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Pending jobs with their current position.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &Job)> + '_ {
        self.jobs.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Every result produced since the last [`clear_results`](Self::clear_results), oldest first.
    pub fn results(&self) -> &[DownloadResult] {
        &self.results
    }

    /// Empties the result log. The queue is untouched.
    pub fn clear_results(&mut self) {
        self.results.clear();
    }

    /// Runs every queued job in order, one at a time.
    ///
    /// Each result is appended to the log as soon as its job finishes and a
    /// [`BatchProgress`] is sent after every job. The queue is cleared only
    /// after the whole pass. Returns this batch's results in queue order.
    ///
    /// The manager stays mutably borrowed until the batch completes:
    ///
    /// ```compile_fail
    /// # use flacq_core::extractor::YtDlp;
    /// # use flacq_core::queue::QueueManager;
    /// # use flacq_core::runner::JobRunner;
    /// # async fn batch(runner: JobRunner<YtDlp>) {
    /// let mut queue = QueueManager::new();
    /// queue.enqueue("https://youtu.be/a");
    /// let pass = queue.run_all(&runner, std::path::Path::new("downloads"), None);
    /// queue.remove(0).unwrap();
    /// pass.await;
    /// # }
    /// ```
    pub async fn run_all<E: Extractor>(
        &mut self,
        runner: &JobRunner<E>,
        output_dir: &Path,
        progress_tx: Option<&mpsc::Sender<BatchProgress>>,
    ) -> Vec<DownloadResult> {
        let total = self.jobs.len();
        let mut batch = Vec::with_capacity(total);

        for (i, job) in self.jobs.iter().enumerate() {
            tracing::info!(
                "downloading {}/{}: [{}] {}",
                i + 1,
                total,
                job.platform(),
                job.url()
            );
            let result = runner.run(job, output_dir).await;
            self.results.push(result.clone());
            send_progress(progress_tx, BatchProgress::new(i + 1, total, &result)).await;
            batch.push(result);
        }

        self.finish_batch(&batch);
        batch
    }

    /// Like [`run_all`](Self::run_all) but with up to `max_concurrent` jobs in flight.
    ///
    /// Progress follows completion order; results are appended to the log
    /// and returned in queue order once the pass is over.
    pub async fn run_all_concurrent<E: Extractor + 'static>(
        &mut self,
        runner: &JobRunner<E>,
        output_dir: &Path,
        max_concurrent: usize,
        progress_tx: Option<&mpsc::Sender<BatchProgress>>,
    ) -> Vec<DownloadResult> {
        if max_concurrent <= 1 {
            return self.run_all(runner, output_dir, progress_tx).await;
        }

        tracing::info!(jobs = self.jobs.len(), max_concurrent, "starting concurrent batch");
        let batch =
            concurrent::run_pool(&self.jobs, runner, output_dir, max_concurrent, progress_tx).await;

        self.results.extend(batch.iter().cloned());
        self.finish_batch(&batch);
        batch
    }

    fn finish_batch(&mut self, batch: &[DownloadResult]) {
        let ok = batch.iter().filter(|r| r.is_success()).count();
        tracing::info!(total = batch.len(), ok, "batch finished");
        self.jobs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;

    fn urls(q: &QueueManager) -> Vec<&str> {
        q.jobs().iter().map(Job::url).collect()
    }

    #[test]
    fn enqueue_dedups_by_url() {
        let mut q = QueueManager::new();
        assert!(q.enqueue("https://youtu.be/a"));
        assert!(!q.enqueue("https://youtu.be/a"));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn enqueue_trims_and_ignores_blank() {
        let mut q = QueueManager::new();
        assert!(!q.enqueue("   "));
        assert!(q.enqueue("  https://soundcloud.com/a/b \n"));
        assert!(!q.enqueue("https://soundcloud.com/a/b"));
        assert_eq!(urls(&q), vec!["https://soundcloud.com/a/b"]);
    }

    #[test]
    fn enqueue_many_counts_added() {
        let mut q = QueueManager::new();
        q.enqueue("https://youtu.be/a");
        let added = q.enqueue_many([
            "https://youtu.be/a",
            "",
            "https://soundcloud.com/x/y",
            "https://soundcloud.com/x/y",
            "https://youtu.be/b",
        ]);
        assert_eq!(added, 2);
        assert_eq!(
            urls(&q),
            vec!["https://youtu.be/a", "https://soundcloud.com/x/y", "https://youtu.be/b"]
        );
    }

    #[test]
    fn enqueue_many_from_text_lines() {
        let mut q = QueueManager::new();
        let text = "https://youtu.be/a\n\n  https://soundcloud.com/b/c  \n";
        assert_eq!(q.enqueue_many(text.lines()), 2);
    }

    #[test]
    fn remove_shifts_following_entries() {
        let mut q = QueueManager::new();
        q.enqueue_many(["a", "b", "c"]);

        assert_eq!(q.remove(1).unwrap().url(), "b");
        assert_eq!(urls(&q), vec!["a", "c"]);

        assert_eq!(q.remove(1).unwrap().url(), "c");
        assert_eq!(urls(&q), vec!["a"]);

        let positions: Vec<usize> = q.entries().map(|(i, _)| i).collect();
        assert_eq!(positions, vec![0]);
    }

    #[test]
    fn remove_out_of_range_leaves_queue() {
        let mut q = QueueManager::new();
        q.enqueue_many(["a", "b"]);
        assert_eq!(
            q.remove(2).unwrap_err(),
            QueueError::IndexOutOfRange { position: 2, len: 2 }
        );
        assert_eq!(urls(&q), vec!["a", "b"]);
        assert_eq!(
            QueueManager::new().remove(0).unwrap_err().to_string(),
            "no queued job at position 0 (queue has 0)"
        );
    }

    #[test]
    fn removed_url_can_be_queued_again() {
        let mut q = QueueManager::new();
        q.enqueue("a");
        q.remove(0).unwrap();
        assert!(q.enqueue("a"));
    }

    #[test]
    fn entries_carry_platform() {
        let mut q = QueueManager::new();
        q.enqueue_many(["https://www.youtube.com/watch?v=1", "https://soundcloud.com/a/b"]);
        let platforms: Vec<Platform> = q.entries().map(|(_, j)| j.platform()).collect();
        assert_eq!(platforms, vec![Platform::YouTube, Platform::SoundCloud]);
    }

    #[test]
    fn clear_results_on_empty_log_keeps_queue() {
        let mut q = QueueManager::new();
        q.enqueue("a");
        q.clear_results();
        assert!(q.results().is_empty());
        assert_eq!(q.len(), 1);
    }
}
