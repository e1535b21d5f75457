use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// What to do when a job's final file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistingFilePolicy {
    /// Replace the existing file with the new download (most recent wins).
    #[default]
    Overwrite,
    /// Keep the existing file and skip the download.
    Skip,
}

/// Global configuration loaded from `~/.config/flacq/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlacqConfig {
    /// Directory that receives the final `.flac` files.
    pub output_dir: PathBuf,
    /// Number of jobs run at once during a batch (1 = strictly sequential).
    pub concurrency: usize,
    /// Behaviour when the resolved final file already exists.
    #[serde(default)]
    pub existing_file: ExistingFilePolicy,
    /// Explicit yt-dlp binary; if missing, env vars, the executable's directory and PATH are searched.
    #[serde(default)]
    pub yt_dlp_path: Option<PathBuf>,
    /// Per tool call timeout in seconds (None = wait indefinitely).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for FlacqConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("downloads"),
            concurrency: 1,
            existing_file: ExistingFilePolicy::Overwrite,
            yt_dlp_path: None,
            timeout_secs: None,
        }
    }
}

impl FlacqConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("flacq")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FlacqConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FlacqConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FlacqConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = FlacqConfig::default();
        assert_eq!(cfg.output_dir, PathBuf::from("downloads"));
        assert_eq!(cfg.concurrency, 1);
        assert_eq!(cfg.existing_file, ExistingFilePolicy::Overwrite);
        assert!(cfg.yt_dlp_path.is_none());
        assert!(cfg.timeout().is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = FlacqConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: FlacqConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.output_dir, cfg.output_dir);
        assert_eq!(parsed.concurrency, cfg.concurrency);
        assert_eq!(parsed.existing_file, cfg.existing_file);
    }

    #[test]
    fn config_toml_minimal() {
        let toml = r#"
            output_dir = "/srv/music"
            concurrency = 3
        "#;
        let cfg: FlacqConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("/srv/music"));
        assert_eq!(cfg.concurrency, 3);
        assert_eq!(cfg.existing_file, ExistingFilePolicy::Overwrite);
        assert!(cfg.yt_dlp_path.is_none());
        assert!(cfg.timeout_secs.is_none());
    }

    #[test]
    fn config_toml_full() {
        let toml = r#"
            output_dir = "music"
            concurrency = 2
            existing_file = "skip"
            yt_dlp_path = "/opt/yt-dlp/yt-dlp"
            timeout_secs = 600
        "#;
        let cfg: FlacqConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.existing_file, ExistingFilePolicy::Skip);
        assert_eq!(
            cfg.yt_dlp_path.as_deref(),
            Some(std::path::Path::new("/opt/yt-dlp/yt-dlp"))
        );
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(600)));
    }
}
