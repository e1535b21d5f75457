//! Job runner error type.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::extractor::ExtractError;

/// Fault while executing one job. Never escapes [`super::JobRunner::run`];
/// it is folded into the job's [`crate::job::DownloadResult`].
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Directory creation, delete or rename failed.
    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl JobError {
    pub(crate) fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        JobError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// True when the tool ran but produced no usable file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, JobError::Extract(ExtractError::NotFound { .. }))
    }
}
