//! yt-dlp driver: metadata probe and FLAC download via child processes.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use super::locate::{find_output_file, remove_temp_files};
use super::{find_yt_dlp, ExtractError, Extractor, TrackMetadata};
use crate::filename::AUDIO_EXTENSION;

/// stderr lines kept for error messages.
const STDERR_TAIL_LINES: usize = 8;

/// How long to let output readers drain after a kill.
const READER_GRACE: Duration = Duration::from_millis(500);

/// `--audio-quality` value: 0 is best.
const AUDIO_QUALITY: &str = "0";

/// Extractor backed by the yt-dlp binary.
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
    timeout: Option<Duration>,
}

struct ToolOutput {
    status: ExitStatus,
    stdout: String,
    stderr_tail: String,
}

impl YtDlp {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Locates the binary (see [`find_yt_dlp`]).
    pub fn locate(explicit: Option<&Path>) -> Result<Self, ExtractError> {
        find_yt_dlp(explicit)
            .map(Self::new)
            .ok_or(ExtractError::ToolMissing)
    }

    /// Kill each tool call that runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub(crate) fn probe_args(url: &str) -> Vec<OsString> {
        [
            "--skip-download",
            "--dump-single-json",
            "--no-playlist",
            "--no-warnings",
        ]
        .iter()
        .map(OsString::from)
        .chain(std::iter::once(OsString::from(url)))
        .collect()
    }

    pub(crate) fn fetch_args(url: &str, output_template: OsString) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "--no-playlist",
            "--no-progress",
            "--newline",
            "-f",
            "bestaudio/best",
            "--extract-audio",
            "--audio-format",
            AUDIO_EXTENSION,
            "--audio-quality",
            AUDIO_QUALITY,
            "-o",
        ]
        .iter()
        .map(OsString::from)
        .collect();
        args.push(output_template);
        args.push(OsString::from(url));
        args
    }

    /// Runs the tool to completion (or timeout), streaming its output into the log.
    async fn run_tool(&self, args: &[OsString], capture_stdout: bool) -> Result<ToolOutput, ExtractError> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own group, so a timeout can take down ffmpeg along with yt-dlp.
        #[cfg(unix)]
        cmd.process_group(0);
        let mut child = cmd
            .spawn()
            .map_err(|e| ExtractError::io(format!("spawn {}", self.binary.display()), e))?;
        let pgid = child.id();

        let stdout_task = child
            .stdout
            .take()
            .map(|out| tokio::spawn(read_lines(out, "stdout", capture_stdout, usize::MAX)));
        let stderr_task = child
            .stderr
            .take()
            .map(|err| tokio::spawn(read_lines(err, "stderr", true, STDERR_TAIL_LINES)));

        let waited = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(res) => res,
                Err(_) => {
                    tracing::warn!(timeout_ms = limit.as_millis() as u64, "yt-dlp timed out, killing");
                    terminate(&mut child, pgid).await;
                    // Something outside the group may still hold the pipes.
                    for mut task in [stdout_task, stderr_task].into_iter().flatten() {
                        if tokio::time::timeout(READER_GRACE, &mut task).await.is_err() {
                            tracing::debug!("output reader still open after kill");
                            task.abort();
                        }
                    }
                    return Err(ExtractError::Timeout(limit));
                }
            },
            None => child.wait().await,
        };
        let status = waited.map_err(|e| ExtractError::io("wait for yt-dlp", e))?;

        Ok(ToolOutput {
            status,
            stdout: join_lines(stdout_task).await.join("\n"),
            stderr_tail: join_lines(stderr_task).await.join("\n"),
        })
    }

    async fn fetch_into(
        &self,
        url: &str,
        temp_path: &Path,
        dir: &Path,
        base_name: &str,
    ) -> Result<PathBuf, ExtractError> {
        let mut template = temp_path.as_os_str().to_owned();
        template.push(".%(ext)s");

        tracing::info!(url, template = %template.to_string_lossy(), "fetching audio");
        let out = self.run_tool(&Self::fetch_args(url, template), false).await?;
        if !out.status.success() {
            return Err(ExtractError::Tool {
                code: out.status.code(),
                stderr: out.stderr_tail,
            });
        }

        find_output_file(dir, base_name).await
    }
}

impl Extractor for YtDlp {
    async fn probe(&self, url: &str) -> Result<TrackMetadata, ExtractError> {
        tracing::debug!(url, "probing metadata");
        let out = self.run_tool(&Self::probe_args(url), true).await?;

        if !out.status.success() {
            let reason = if out.stderr_tail.is_empty() {
                format!("yt-dlp exited with {:?}", out.status.code())
            } else {
                out.stderr_tail
            };
            return Err(ExtractError::Metadata {
                url: url.to_string(),
                reason,
            });
        }

        let info: serde_json::Value =
            serde_json::from_str(out.stdout.trim()).map_err(|e| ExtractError::Metadata {
                url: url.to_string(),
                reason: format!("invalid info JSON: {e}"),
            })?;

        TrackMetadata::from_info_json(&info).ok_or_else(|| ExtractError::Metadata {
            url: url.to_string(),
            reason: "info JSON is not an object".to_string(),
        })
    }

    async fn fetch(&self, url: &str, temp_path: &Path) -> Result<PathBuf, ExtractError> {
        let (dir, base_name) = split_temp_path(temp_path)?;

        let result = self.fetch_into(url, temp_path, dir, base_name).await;
        if let Err(ref e) = result {
            let removed = remove_temp_files(dir, base_name).await;
            tracing::debug!(url, removed, "fetch failed, cleaned temp files: {}", e);
        }
        result
    }
}

/// Splits `<dir>/<base>` into its parts; a bare base name means the current directory.
fn split_temp_path(temp_path: &Path) -> Result<(&Path, &str), ExtractError> {
    let base_name = temp_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            ExtractError::io(
                format!("invalid temp path {}", temp_path.display()),
                std::io::Error::from(std::io::ErrorKind::InvalidInput),
            )
        })?;
    let dir = match temp_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    Ok((dir, base_name))
}

/// Kills the tool and, on Unix, its whole process group; returns once the
/// group is gone so no member can write after the caller cleans up.
async fn terminate(child: &mut Child, pgid: Option<u32>) {
    if let Some(pgid) = pgid {
        kill_group(pgid);
    }
    if let Err(e) = child.kill().await {
        tracing::warn!("could not kill yt-dlp: {}", e);
    }
    if let Some(pgid) = pgid {
        wait_group_gone(pgid).await;
    }
}

#[cfg(unix)]
fn kill_group(pgid: u32) {
    super::process_group::kill(pgid);
}

#[cfg(not(unix))]
fn kill_group(_pgid: u32) {}

#[cfg(unix)]
async fn wait_group_gone(pgid: u32) {
    super::process_group::wait_gone(pgid).await;
}

#[cfg(not(unix))]
async fn wait_group_gone(_pgid: u32) {}

/// Logs each line at debug; keeps the last `keep` lines when `capture` is set.
///
/// Lines are decoded lossily and the stream is always read to EOF, so a
/// stray non-UTF-8 byte never closes the pipe under the tool.
async fn read_lines<R>(reader: R, stream: &'static str, capture: bool, keep: usize) -> Vec<String>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut kept = VecDeque::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(stream, "yt-dlp output read failed: {}", e);
                break;
            }
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        tracing::debug!(stream, "yt-dlp: {}", line);
        if capture && keep > 0 {
            if kept.len() == keep {
                kept.pop_front();
            }
            kept.push_back(line.to_string());
        }
    }
    kept.into()
}

async fn join_lines(task: Option<JoinHandle<Vec<String>>>) -> Vec<String> {
    match task {
        Some(handle) => handle.await.unwrap_or_default(),
        None => Vec::new(),
    }
}
