//! Locating the yt-dlp binary.

use std::path::{Path, PathBuf};

/// Environment variables checked, in order, for an explicit binary path.
const ENV_VARS: &[&str] = &["FLACQ_YT_DLP", "YT_DLP_PATH"];

/// Find yt-dlp.
///
/// Searches in order:
/// 1. `explicit` (config `yt_dlp_path`)
/// 2. `FLACQ_YT_DLP`, then `YT_DLP_PATH`
/// 3. Beside the current executable
/// 4. PATH
pub fn find_yt_dlp(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        if p.is_file() {
            return Some(p.to_path_buf());
        }
        tracing::warn!(path = %p.display(), "configured yt-dlp path does not exist");
    }

    for var in ENV_VARS {
        if let Some(value) = std::env::var_os(var) {
            let p = PathBuf::from(value);
            if p.is_file() {
                return Some(p);
            }
        }
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(found) = exe.parent().and_then(search_dir) {
            return Some(found);
        }
    }

    std::env::var_os("PATH").and_then(|path| std::env::split_paths(&path).find_map(|d| search_dir(&d)))
}

fn search_dir(dir: &Path) -> Option<PathBuf> {
    binary_names()
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

fn binary_names() -> &'static [&'static str] {
    #[cfg(windows)]
    return &["yt-dlp.exe", "yt-dlp"];

    #[cfg(not(windows))]
    return &["yt-dlp", "yt-dlp_linux", "yt-dlp_macos"];
}
