//! Source platform inference from a URL.

use std::fmt;

/// Hosts recognized as YouTube. Anything else is treated as SoundCloud.
const YOUTUBE_MARKERS: &[&str] = &["youtube.com", "youtu.be"];

/// Source platform of a queued URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    YouTube,
    SoundCloud,
}

impl Platform {
    /// Infers the platform by substring match on the raw URL.
    ///
    /// No parsing is done: `youtube.com` or `youtu.be` anywhere in the string
    /// means YouTube, every other input (including unrecognized hosts) falls
    /// back to SoundCloud.
    pub fn from_url(url: &str) -> Self {
        if YOUTUBE_MARKERS.iter().any(|m| url.contains(m)) {
            Platform::YouTube
        } else {
            Platform::SoundCloud
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::YouTube => "YouTube",
            Platform::SoundCloud => "SoundCloud",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
