//! Extraction adapter errors.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure of a probe or fetch call.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No yt-dlp binary could be located.
    #[error("yt-dlp not found (set yt_dlp_path in config.toml, or FLACQ_YT_DLP)")]
    ToolMissing,

    /// Metadata probe failed: network, invalid URL, removed content, or unusable JSON.
    #[error("metadata probe failed for {url}: {reason}")]
    Metadata { url: String, reason: String },

    /// The tool finished but left no file starting with the temp base name.
    #[error("no output file starting with {base_name} in {}", .dir.display())]
    NotFound { dir: PathBuf, base_name: String },

    /// The tool exited unsuccessfully during fetch.
    #[error("yt-dlp exited with {}: {stderr}", exit_label(.code))]
    Tool { code: Option<i32>, stderr: String },

    /// The tool did not finish in time and was killed.
    #[error("yt-dlp timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("{action}: {source}")]
    Io {
        action: String,
        #[source]
        source: io::Error,
    },
}

impl ExtractError {
    pub(crate) fn io(action: impl Into<String>, source: io::Error) -> Self {
        ExtractError::Io {
            action: action.into(),
            source,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "signal".to_string(),
    }
}
