//! Output filename derivation.
//!
//! Builds `"{title} - {artist}.flac"` from track metadata, sanitized so the
//! result is safe on common filesystems and identical for identical input.

mod sanitize;

pub use sanitize::sanitize_component;

/// Extension of every final file.
pub const AUDIO_EXTENSION: &str = "flac";

/// Placeholder when no artist-like field could be resolved.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Placeholder when the source has no usable title.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Linux NAME_MAX, in bytes.
const NAME_MAX: usize = 255;

/// Resolves the final filename for a track.
///
/// Title and artist are sanitized separately, composed with a literal ` - `,
/// then the whole name is sanitized again. Empty parts fall back to
/// [`UNKNOWN_TITLE`] / [`UNKNOWN_ARTIST`].
///
/// # Examples
///
/// - `resolve("Song: Live", "A/B")` → `"Song Live - A B.flac"`
/// - `resolve("Song", "")` → `"Song - Unknown Artist.flac"`
pub fn resolve(title: &str, artist: &str) -> String {
    let title = or_placeholder(sanitize_component(title), UNKNOWN_TITLE);
    let artist = or_placeholder(sanitize_component(artist), UNKNOWN_ARTIST);

    let stem = sanitize_component(&format!("{title} - {artist}"));
    let stem = truncate_on_char_boundary(&stem, NAME_MAX - AUDIO_EXTENSION.len() - 1);

    sanitize_component(&format!("{}.{}", stem.trim_end(), AUDIO_EXTENSION))
}

fn or_placeholder(value: String, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}

fn truncate_on_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut take = max_bytes;
    while take > 0 && !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}
