//! `flacq get <url>...` – queue URLs, download them as one batch, report.

use anyhow::{Context, Result};
use flacq_core::queue::QueueManager;
use std::path::Path;

use super::{render, run_batch, Settings};

/// Lines of a URL list file, without blanks and `#` comments.
pub(crate) fn urls_from_text(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

pub async fn run_get(urls: &[String], input: Option<&Path>, settings: &Settings) -> Result<()> {
    let mut queue = QueueManager::new();
    queue.enqueue_many(urls);

    if let Some(path) = input {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("read URL list {}", path.display()))?;
        queue.enqueue_many(urls_from_text(&text));
    }

    if queue.is_empty() {
        println!("No URLs to download.");
        return Ok(());
    }

    let runner = settings.build_runner()?;
    println!("{}", render::queue_listing(&queue));

    let batch = run_batch(&mut queue, &runner, settings).await;
    println!("{}", render::results_listing(&batch));

    let unsuccessful = batch.iter().filter(|r| !r.is_success()).count();
    if unsuccessful > 0 {
        anyhow::bail!("{} of {} downloads did not succeed", unsuccessful, batch.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_file_skips_blanks_and_comments() {
        let text = "# mixtape\nhttps://youtu.be/a\n\n   https://soundcloud.com/x/y  \n  # later\n";
        let urls: Vec<&str> = urls_from_text(text).collect();
        assert_eq!(urls, vec!["https://youtu.be/a", "https://soundcloud.com/x/y"]);
    }
}
