//! Queue entries and their terminal outcomes.

use std::path::{Path, PathBuf};

use crate::platform::Platform;

/// One queued URL. Identity is the URL string; the platform is inferred once
/// at creation so display and execution always agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    url: String,
    platform: Platform,
}

impl Job {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let platform = Platform::from_url(&url);
        Self { url, platform }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }
}

/// Coarse status of a finished job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Success,
    /// The tool ran but left no usable output file.
    Failed,
    /// A fault occurred (probe, tool crash, timeout, disk).
    Error,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Success => "success",
            JobStatus::Failed => "failed",
            JobStatus::Error => "error",
        }
    }
}

/// What happened to a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Final file is at `path`. `reused` is set when an existing file was kept
    /// instead of downloading again.
    Success { path: PathBuf, reused: bool },
    Failed,
    Error { message: String },
}

/// Outcome record for one executed job. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    url: String,
    platform: Platform,
    outcome: JobOutcome,
}

impl DownloadResult {
    pub fn new(job: &Job, outcome: JobOutcome) -> Self {
        Self {
            url: job.url.clone(),
            platform: job.platform,
            outcome,
        }
    }

    pub fn success(job: &Job, path: PathBuf, reused: bool) -> Self {
        Self::new(job, JobOutcome::Success { path, reused })
    }

    pub fn failed(job: &Job) -> Self {
        Self::new(job, JobOutcome::Failed)
    }

    pub fn error(job: &Job, message: impl Into<String>) -> Self {
        Self::new(
            job,
            JobOutcome::Error {
                message: message.into(),
            },
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn outcome(&self) -> &JobOutcome {
        &self.outcome
    }

    pub fn status(&self) -> JobStatus {
        match self.outcome {
            JobOutcome::Success { .. } => JobStatus::Success,
            JobOutcome::Failed => JobStatus::Failed,
            JobOutcome::Error { .. } => JobStatus::Error,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.outcome {
            JobOutcome::Success { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            JobOutcome::Error { message } => Some(message),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == JobStatus::Success
    }
}
