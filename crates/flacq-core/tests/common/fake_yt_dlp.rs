//! A shell script standing in for yt-dlp, written once per test binary.
//!
//! Behaviour is picked by substrings of the URL:
//! `missing` fails the probe, `noartist` omits artist fields, `nothing`
//! exits cleanly without output, `crash` leaves a partial file and exits 2,
//! `slow` leaves a partial file, starts a background writer (as ffmpeg runs
//! under yt-dlp) and hangs, `latin1` prints non-UTF-8 bytes and a burst of
//! progress lines on stderr before finishing normally.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const SCRIPT: &str = r#"#!/bin/sh
probe=0
out=""
url=""
while [ $# -gt 0 ]; do
  case "$1" in
    --dump-single-json) probe=1 ;;
    -o|-f|--audio-format|--audio-quality)
      if [ "$1" = "-o" ]; then out="$2"; fi
      shift ;;
    -*) ;;
    *) url="$1" ;;
  esac
  shift
done

case "$url" in
  *missing*) echo "ERROR: [generic] Video unavailable" >&2; exit 1 ;;
esac

if [ "$probe" = 1 ]; then
  case "$url" in
    *noartist*) echo '{"id": "x", "title": "Lonely: Track"}' ;;
    *) echo '{"id": "x", "title": "Song: Live", "uploader": "Up/Loader", "channel": "Chan"}' ;;
  esac
  exit 0
fi

target() { printf '%s' "$out" | sed "s/%(ext)s/$1/"; }

case "$url" in
  *nothing*) exit 0 ;;
  *crash*) printf partial > "$(target webm.part)"; echo "ERROR: Postprocessing: ffmpeg crashed" >&2; exit 2 ;;
  *slow*)
    printf partial > "$(target webm.part)"
    ( sleep 0.8; printf partial > "$(target flac)" ) &
    exec sleep 5 ;;
  *latin1*)
    printf 'title \377\376 latin1\n' >&2
    i=0
    while [ $i -lt 200 ]; do echo "[download] $i of 200" >&2; i=$((i + 1)); done ;;
esac

echo "[ExtractAudio] Destination: $(target flac)"
printf 'fLaC' > "$(target webm)"
printf 'fLaC' > "$(target flac)"
"#;

/// Path to the executable fake yt-dlp.
pub fn path() -> &'static Path {
    static SCRIPT_PATH: OnceLock<PathBuf> = OnceLock::new();
    SCRIPT_PATH.get_or_init(|| {
        let dir = std::env::temp_dir().join(format!("flacq-fake-yt-dlp-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("yt-dlp");
        std::fs::write(&path, SCRIPT).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    })
}
