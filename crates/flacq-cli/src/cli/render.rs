//! Plain-text rendering of the queue, batch progress and results.

use flacq_core::job::{DownloadResult, JobOutcome};
use flacq_core::queue::{BatchProgress, QueueManager};

const BAR_WIDTH: usize = 20;

/// Queue entries numbered from 1, as `remove` expects them.
pub(crate) fn queue_listing(queue: &QueueManager) -> String {
    if queue.is_empty() {
        return "Queue is empty.".to_string();
    }
    queue
        .entries()
        .map(|(position, job)| format!("{}. [{}] {}", position + 1, job.platform(), job.url()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn results_listing(results: &[DownloadResult]) -> String {
    if results.is_empty() {
        return "No completed downloads.".to_string();
    }
    let mut out = format!("{:<8} {:<11} {}", "STATUS", "PLATFORM", "DETAIL");
    for r in results {
        let detail = match r.outcome() {
            JobOutcome::Success { path, reused: false } => format!("{}", path.display()),
            JobOutcome::Success { path, reused: true } => format!("{} (kept)", path.display()),
            JobOutcome::Failed => format!("{} (no audio file produced)", r.url()),
            JobOutcome::Error { message } => format!("{}: {}", r.url(), message),
        };
        out.push('\n');
        out.push_str(&format!(
            "{:<8} {:<11} {}",
            r.status().as_str(),
            r.platform().as_str(),
            detail
        ));
    }
    out
}

pub(crate) fn progress_line(p: &BatchProgress) -> String {
    let filled = (p.fraction() * BAR_WIDTH as f64).round() as usize;
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)));
    format!(
        "[{}/{}] {} {:>3}% {:<7} {}",
        p.completed,
        p.total,
        bar,
        (p.fraction() * 100.0).round() as u32,
        p.status.as_str(),
        p.url
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use flacq_core::job::{Job, JobStatus};
    use std::path::PathBuf;

    #[test]
    fn queue_listing_numbers_from_one() {
        let mut q = QueueManager::new();
        assert_eq!(queue_listing(&q), "Queue is empty.");
        q.enqueue("https://youtu.be/a");
        q.enqueue("https://soundcloud.com/x/y");
        assert_eq!(
            queue_listing(&q),
            "1. [YouTube] https://youtu.be/a\n2. [SoundCloud] https://soundcloud.com/x/y"
        );
    }

    #[test]
    fn results_listing_shows_detail_per_outcome() {
        assert_eq!(results_listing(&[]), "No completed downloads.");

        let a = Job::new("https://youtu.be/a");
        let b = Job::new("https://soundcloud.com/x/y");
        let results = vec![
            DownloadResult::success(&a, PathBuf::from("out/Song - Artist.flac"), false),
            DownloadResult::success(&a, PathBuf::from("out/Song - Artist.flac"), true),
            DownloadResult::failed(&b),
            DownloadResult::error(&b, "yt-dlp exited with code 2"),
        ];
        let text = results_listing(&results);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("STATUS"));
        assert!(lines[1].starts_with("success  YouTube"));
        assert!(lines[1].ends_with("out/Song - Artist.flac"));
        assert!(lines[2].ends_with("(kept)"));
        assert!(lines[3].starts_with("failed   SoundCloud"));
        assert!(lines[4].ends_with("https://soundcloud.com/x/y: yt-dlp exited with code 2"));
    }

    #[test]
    fn progress_line_fills_bar() {
        let p = BatchProgress {
            completed: 1,
            total: 4,
            url: "https://youtu.be/a".to_string(),
            status: JobStatus::Success,
        };
        assert_eq!(
            progress_line(&p),
            "[1/4] #####---------------  25% success https://youtu.be/a"
        );

        let done = BatchProgress { completed: 4, ..p };
        assert!(progress_line(&done).contains(&"#".repeat(BAR_WIDTH)));
        assert!(progress_line(&done).contains("100%"));
    }
}
