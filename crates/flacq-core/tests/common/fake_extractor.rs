//! Scripted in-process extractor: behaviour per URL, writes real files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use flacq_core::extractor::{remove_temp_files, ExtractError, Extractor, TrackMetadata};

#[derive(Debug, Clone)]
pub enum Behavior {
    /// Probe succeeds; fetch writes `<temp>.flac` with `content` plus a stray `<temp>.webm`.
    Download {
        title: String,
        artist: String,
        content: String,
    },
    /// Probe fails.
    ProbeFails,
    /// Fetch writes a partial file, cleans it up and reports an IO fault.
    FetchFaults,
    /// Like `FetchFaults` but skips its own cleanup, so only the runner's
    /// sweep removes the partial file.
    FaultsLeavingDebris,
    /// Fetch runs but produces nothing.
    NoOutput,
    /// Fetch panics.
    Panics,
}

impl Behavior {
    pub fn download(title: &str, artist: &str, content: &str) -> Self {
        Behavior::Download {
            title: title.into(),
            artist: artist.into(),
            content: content.into(),
        }
    }
}

#[derive(Default)]
pub struct FakeExtractor {
    behaviors: Mutex<HashMap<String, Behavior>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    fetches: AtomicUsize,
}

impl FakeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set(&self, url: &str, behavior: Behavior) {
        self.behaviors.lock().unwrap().insert(url.to_string(), behavior);
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn behavior(&self, url: &str) -> Behavior {
        self.behaviors
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or(Behavior::NoOutput)
    }
}

impl Extractor for FakeExtractor {
    async fn probe(&self, url: &str) -> Result<TrackMetadata, ExtractError> {
        match self.behavior(url) {
            Behavior::ProbeFails => Err(ExtractError::Metadata {
                url: url.to_string(),
                reason: "Video unavailable".to_string(),
            }),
            Behavior::Download { title, artist, .. } => Ok(TrackMetadata { title, artist }),
            _ => Ok(TrackMetadata {
                title: format!("Track {}", url.len()),
                artist: "Someone".to_string(),
            }),
        }
    }

    async fn fetch(&self, url: &str, temp_path: &Path) -> Result<PathBuf, ExtractError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        let result = self.do_fetch(url, temp_path).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

impl FakeExtractor {
    async fn do_fetch(&self, url: &str, temp_path: &Path) -> Result<PathBuf, ExtractError> {
        let with_ext = |ext: &str| {
            let mut p = temp_path.as_os_str().to_owned();
            p.push(ext);
            PathBuf::from(p)
        };
        let dir = temp_path.parent().unwrap();
        let base = temp_path.file_name().unwrap().to_str().unwrap();

        match self.behavior(url) {
            Behavior::Download { content, .. } => {
                let out = with_ext(".flac");
                std::fs::write(&out, content).unwrap();
                std::fs::write(with_ext(".webm"), b"intermediate").unwrap();
                Ok(out)
            }
            Behavior::FetchFaults => {
                std::fs::write(with_ext(".flac.part"), b"partial").unwrap();
                remove_temp_files(dir, base).await;
                Err(disk_full())
            }
            Behavior::FaultsLeavingDebris => {
                std::fs::write(with_ext(".flac.part"), b"partial").unwrap();
                Err(disk_full())
            }
            Behavior::NoOutput => {
                remove_temp_files(dir, base).await;
                Err(ExtractError::NotFound {
                    dir: dir.to_path_buf(),
                    base_name: base.to_string(),
                })
            }
            Behavior::Panics => panic!("extractor crashed"),
            Behavior::ProbeFails => unreachable!("probe already failed"),
        }
    }
}

fn disk_full() -> ExtractError {
    ExtractError::Io {
        action: "write audio".to_string(),
        source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
    }
}
