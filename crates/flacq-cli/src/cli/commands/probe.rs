//! `flacq probe <url>` – show what a download would produce, without downloading.

use anyhow::{Context, Result};
use flacq_core::extractor::Extractor;
use flacq_core::job::Job;

use super::Settings;

pub async fn run_probe(url: &str, settings: &Settings) -> Result<()> {
    let job = Job::new(url.trim());
    let runner = settings.build_runner()?;
    let meta = runner
        .extractor()
        .probe(job.url())
        .await
        .with_context(|| format!("probe {}", job.url()))?;

    println!("Platform: {}", job.platform());
    println!("Title:    {}", meta.title);
    println!("Artist:   {}", meta.artist);
    println!(
        "File:     {}",
        settings.output_dir.join(meta.file_name()).display()
    );
    Ok(())
}
