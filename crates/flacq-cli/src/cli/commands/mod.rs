//! CLI command handlers, one per file, plus the settings they share.

mod completions;
mod get;
mod probe;
mod session;

use anyhow::{Context, Result};
use flacq_core::config::{ExistingFilePolicy, FlacqConfig};
use flacq_core::extractor::YtDlp;
use flacq_core::job::DownloadResult;
use flacq_core::queue::{BatchProgress, QueueManager};
use flacq_core::runner::JobRunner;
use std::path::PathBuf;

use super::render;
use super::RunOptions;

pub use completions::{run_completions, run_man};
pub use get::run_get;
pub use probe::run_probe;
pub use session::run_session;

/// Config values with per-invocation flags applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub jobs: usize,
    pub existing_file: ExistingFilePolicy,
    pub yt_dlp_path: Option<PathBuf>,
    pub timeout: Option<std::time::Duration>,
}

impl Settings {
    pub fn resolve(cfg: &FlacqConfig, run: &RunOptions) -> Self {
        let existing_file = if run.skip_existing {
            ExistingFilePolicy::Skip
        } else {
            cfg.existing_file
        };
        Self {
            output_dir: run
                .output_dir
                .clone()
                .unwrap_or_else(|| cfg.output_dir.clone()),
            jobs: run.jobs.unwrap_or(cfg.concurrency).max(1),
            existing_file,
            yt_dlp_path: cfg.yt_dlp_path.clone(),
            timeout: cfg.timeout(),
        }
    }

    pub fn build_runner(&self) -> Result<JobRunner<YtDlp>> {
        let tool = YtDlp::locate(self.yt_dlp_path.as_deref())
            .context("cannot download without yt-dlp")?
            .with_timeout(self.timeout);
        tracing::debug!(binary = %tool.binary().display(), "using yt-dlp");
        Ok(JobRunner::new(tool).with_existing_file_policy(self.existing_file))
    }
}

/// Runs one batch over `queue`, printing a progress line per finished job.
async fn run_batch(
    queue: &mut QueueManager,
    runner: &JobRunner<YtDlp>,
    settings: &Settings,
) -> Vec<DownloadResult> {
    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<BatchProgress>(16);
    let printer = tokio::spawn(async move {
        while let Some(progress) = progress_rx.recv().await {
            println!("{}", render::progress_line(&progress));
        }
    });

    let batch = queue
        .run_all_concurrent(runner, &settings.output_dir, settings.jobs, Some(&progress_tx))
        .await;

    drop(progress_tx);
    let _ = printer.await;
    batch
}
