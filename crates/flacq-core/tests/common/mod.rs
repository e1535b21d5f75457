#![allow(dead_code)]

pub mod fake_extractor;
#[cfg(unix)]
pub mod fake_yt_dlp;

use std::path::{Path, PathBuf};

/// Files in `dir` whose name starts with `temp_`.
pub fn temp_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(flacq_core::extractor::TEMP_PREFIX))
        })
        .collect()
}
