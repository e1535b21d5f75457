//! Execute one queued job end to end.
//!
//! probe → resolve final path → fetch into a random temp name → rename into
//! place → temp cleanup. Every fault is folded into the returned
//! [`DownloadResult`]; nothing is retried here.

mod error;
mod locks;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ExistingFilePolicy;
use crate::extractor::{new_temp_base, remove_temp_files, Extractor};
use crate::job::{DownloadResult, Job};

pub use error::JobError;
pub use locks::PathLocks;

/// Runs jobs against an [`Extractor`]. Cheap to clone; clones share the
/// extractor and the per-path lock table.
pub struct JobRunner<E> {
    extractor: Arc<E>,
    existing_file: ExistingFilePolicy,
    locks: PathLocks,
}

impl<E> Clone for JobRunner<E> {
    fn clone(&self) -> Self {
        Self {
            extractor: Arc::clone(&self.extractor),
            existing_file: self.existing_file,
            locks: self.locks.clone(),
        }
    }
}

/// Where a job's file ended up.
struct Placed {
    path: PathBuf,
    reused: bool,
}

impl<E: Extractor> JobRunner<E> {
    pub fn new(extractor: E) -> Self {
        Self::from_arc(Arc::new(extractor))
    }

    pub fn from_arc(extractor: Arc<E>) -> Self {
        Self {
            extractor,
            existing_file: ExistingFilePolicy::default(),
            locks: PathLocks::new(),
        }
    }

    pub fn with_existing_file_policy(mut self, policy: ExistingFilePolicy) -> Self {
        self.existing_file = policy;
        self
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    pub fn existing_file_policy(&self) -> ExistingFilePolicy {
        self.existing_file
    }

    /// Runs `job`, writing its final file under `output_dir`.
    pub async fn run(&self, job: &Job, output_dir: &Path) -> DownloadResult {
        tracing::info!(url = %job.url(), platform = %job.platform(), "job started");

        match self.execute(job, output_dir).await {
            Ok(placed) => {
                tracing::info!(
                    url = %job.url(),
                    path = %placed.path.display(),
                    reused = placed.reused,
                    "job succeeded"
                );
                DownloadResult::success(job, placed.path, placed.reused)
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!(url = %job.url(), "job produced no output: {}", e);
                DownloadResult::failed(job)
            }
            Err(e) => {
                tracing::warn!(url = %job.url(), "job failed: {}", e);
                DownloadResult::error(job, e.to_string())
            }
        }
    }

    async fn execute(&self, job: &Job, output_dir: &Path) -> Result<Placed, JobError> {
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| JobError::io("create output directory", output_dir, e))?;

        let meta = self.extractor.probe(job.url()).await?;
        let final_path = output_dir.join(meta.file_name());
        tracing::debug!(url = %job.url(), title = %meta.title, artist = %meta.artist, "probed");

        if self.existing_file == ExistingFilePolicy::Skip && exists(&final_path).await {
            tracing::info!(path = %final_path.display(), "final file exists, skipping download");
            return Ok(Placed {
                path: final_path,
                reused: true,
            });
        }

        let temp_base = new_temp_base();
        let temp_path = output_dir.join(&temp_base);

        let placed = match self.extractor.fetch(job.url(), &temp_path).await {
            Ok(fetched) => self.place(&fetched, &final_path).await,
            Err(e) => Err(e.into()),
        };

        // Transient leftovers on success; anything the adapter missed on failure.
        let removed = remove_temp_files(output_dir, &temp_base).await;
        if removed > 0 {
            tracing::debug!(temp_base = %temp_base, removed, "removed leftover temp files");
        }

        placed
    }

    /// Moves the fetched file to `final_path`, honoring the existing-file policy.
    async fn place(&self, fetched: &Path, final_path: &Path) -> Result<Placed, JobError> {
        let _guard = self.locks.lock(final_path).await;

        if exists(final_path).await {
            match self.existing_file {
                ExistingFilePolicy::Skip => {
                    tracing::info!(path = %final_path.display(), "final file appeared meanwhile, keeping it");
                    return Ok(Placed {
                        path: final_path.to_path_buf(),
                        reused: true,
                    });
                }
                ExistingFilePolicy::Overwrite => {
                    tokio::fs::remove_file(final_path)
                        .await
                        .map_err(|e| JobError::io("remove existing file", final_path, e))?;
                    tracing::debug!(path = %final_path.display(), "removed existing file for overwrite");
                }
            }
        }

        tokio::fs::rename(fetched, final_path)
            .await
            .map_err(|e| JobError::io("rename into place", final_path, e))?;

        Ok(Placed {
            path: final_path.to_path_buf(),
            reused: false,
        })
    }
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}
