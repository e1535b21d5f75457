//! Temp base names, output lookup and temp cleanup in the output directory.

use std::io;
use std::path::{Path, PathBuf};

use super::ExtractError;
use crate::filename::AUDIO_EXTENSION;

/// Prefix of every temporary base name.
pub const TEMP_PREFIX: &str = "temp_";

/// Fresh temp base name: `temp_` plus 16 hex chars of randomness.
pub fn new_temp_base() -> String {
    format!("{TEMP_PREFIX}{}", hex::encode(rand::random::<[u8; 8]>()))
}

/// Regular files in `dir` whose name starts with `base_name`, sorted by path.
pub async fn matching_files(dir: &Path, base_name: &str) -> io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut found = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with(base_name) && entry.file_type().await?.is_file() {
            found.push(entry.path());
        }
    }

    found.sort();
    Ok(found)
}

/// Finds the file the tool produced for `base_name`.
///
/// The tool chooses the extension, so any file starting with `base_name`
/// counts; a `.flac` match is preferred over intermediates.
pub async fn find_output_file(dir: &Path, base_name: &str) -> Result<PathBuf, ExtractError> {
    let found = matching_files(dir, base_name)
        .await
        .map_err(|e| ExtractError::io(format!("scan {}", dir.display()), e))?;

    let flac = found
        .iter()
        .find(|p| p.extension().and_then(|e| e.to_str()) == Some(AUDIO_EXTENSION));

    flac.or_else(|| found.first())
        .cloned()
        .ok_or_else(|| ExtractError::NotFound {
            dir: dir.to_path_buf(),
            base_name: base_name.to_string(),
        })
}

/// Best-effort removal of every file starting with `base_name`. Returns how many were removed.
pub async fn remove_temp_files(dir: &Path, base_name: &str) -> usize {
    let found = match matching_files(dir, base_name).await {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return 0,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), "could not scan for temp files: {}", e);
            return 0;
        }
    };

    let mut removed = 0;
    for path in found {
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed temp file");
                removed += 1;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), "could not remove temp file: {}", e),
        }
    }
    removed
}
