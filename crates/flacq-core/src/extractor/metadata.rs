//! Typed track metadata built from yt-dlp's info JSON.

use serde_json::{Map, Value};

use crate::filename::{self, UNKNOWN_ARTIST, UNKNOWN_TITLE};

/// Artist-like fields, most specific first.
const ARTIST_FIELDS: &[&str] = &["artist", "uploader", "channel", "creator"];

/// Title and artist of a remote track, as reported by the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
}

impl TrackMetadata {
    /// Builds metadata from an info JSON object.
    ///
    /// Title comes from `title`; artist from the first non-empty string among
    /// `artist`, `uploader`, `channel`, `creator`. Missing values get the
    /// placeholders. Returns `None` if `info` is not a JSON object.
    pub fn from_info_json(info: &Value) -> Option<Self> {
        let obj = info.as_object()?;

        let title = str_field(obj, "title").unwrap_or(UNKNOWN_TITLE).to_string();
        let artist = ARTIST_FIELDS
            .iter()
            .find_map(|key| str_field(obj, key))
            .unwrap_or(UNKNOWN_ARTIST)
            .to_string();

        Some(Self { title, artist })
    }

    /// Final filename for this track (see [`filename::resolve`]).
    pub fn file_name(&self) -> String {
        filename::resolve(&self.title, &self.artist)
    }
}

fn str_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
