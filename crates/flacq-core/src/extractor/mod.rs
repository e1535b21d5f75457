//! External media tool adapter.
//!
//! The [`Extractor`] trait is the seam between the job runner and whatever
//! actually fetches and transcodes audio. [`YtDlp`] drives the yt-dlp binary
//! (with ffmpeg for the FLAC transcode); tests substitute scripted fakes.

mod discover;
mod error;
mod locate;
mod metadata;
#[cfg(unix)]
mod process_group;
mod ytdlp;

use std::future::Future;
use std::path::{Path, PathBuf};

pub use discover::find_yt_dlp;
pub use error::ExtractError;
pub use locate::{find_output_file, matching_files, new_temp_base, remove_temp_files, TEMP_PREFIX};
pub use metadata::TrackMetadata;
pub use ytdlp::YtDlp;

/// Metadata probe and download+transcode against a remote URL.
pub trait Extractor: Send + Sync {
    /// Resolves title and artist without downloading media.
    fn probe(&self, url: &str) -> impl Future<Output = Result<TrackMetadata, ExtractError>> + Send;

    /// Downloads the best audio stream and transcodes it to FLAC.
    ///
    /// `temp_path` is `<output_dir>/<temp_base>` without extension; the tool
    /// picks the extension. Returns the file actually written, or
    /// [`ExtractError::NotFound`] if nothing starting with `temp_base` appeared.
    /// On any error, files starting with `temp_base` are removed first.
    fn fetch(
        &self,
        url: &str,
        temp_path: &Path,
    ) -> impl Future<Output = Result<PathBuf, ExtractError>> + Send;
}
