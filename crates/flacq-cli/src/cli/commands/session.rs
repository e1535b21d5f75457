//! `flacq session` – interactive queue over stdin.
//!
//! One command per line; the queue and result log live for the whole
//! session. `run` blocks until the batch is done, so the queue cannot be
//! edited while downloads are in flight.

use anyhow::Result;
use flacq_core::extractor::YtDlp;
use flacq_core::queue::{QueueError, QueueManager};
use flacq_core::runner::JobRunner;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{render, run_batch, Settings};

const HELP: &str = "\
commands:
  add <url>...     queue one or more URLs (a bare URL works too)
  remove <n>       drop entry n as shown by `list`
  list             show the queue
  run              download everything queued
  results          show completed downloads
  clear            clear the completed downloads list
  help             this text
  quit             leave the session";

/// One parsed session line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionCommand {
    Add(Vec<String>),
    /// 1-based position as displayed.
    Remove(usize),
    List,
    Run,
    Results,
    Clear,
    Help,
    Quit,
}

impl SessionCommand {
    /// Parses a line; `Ok(None)` for a blank line.
    pub(crate) fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<String> = words.map(str::to_string).collect();

        let cmd = match head {
            "add" | "a" => {
                if rest.is_empty() {
                    return Err("usage: add <url>...".to_string());
                }
                SessionCommand::Add(rest)
            }
            url if url.starts_with("http://") || url.starts_with("https://") => {
                let mut urls = vec![url.to_string()];
                urls.extend(rest);
                SessionCommand::Add(urls)
            }
            "remove" | "rm" => match rest.as_slice() {
                [n] => {
                    let n: usize = n
                        .parse()
                        .map_err(|_| format!("not a queue number: {n}"))?;
                    SessionCommand::Remove(n)
                }
                _ => return Err("usage: remove <n>".to_string()),
            },
            "list" | "ls" | "queue" => SessionCommand::List,
            "run" | "download" => SessionCommand::Run,
            "results" | "history" => SessionCommand::Results,
            "clear" => SessionCommand::Clear,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" | "q" => SessionCommand::Quit,
            other => return Err(format!("unknown command: {other} (try `help`)")),
        };
        Ok(Some(cmd))
    }
}

/// Queue state held for the lifetime of a session.
pub(crate) struct Session {
    queue: QueueManager,
    runner: JobRunner<YtDlp>,
    settings: Settings,
}

impl Session {
    pub(crate) fn new(runner: JobRunner<YtDlp>, settings: Settings) -> Self {
        Self {
            queue: QueueManager::new(),
            runner,
            settings,
        }
    }

    pub(crate) fn queue(&self) -> &QueueManager {
        &self.queue
    }

    /// Applies a command that does not download; returns the text to show.
    /// `Run` and `Quit` are handled by the caller.
    pub(crate) fn apply(&mut self, cmd: &SessionCommand) -> String {
        match cmd {
            SessionCommand::Add(urls) => {
                let added = self.queue.enqueue_many(urls);
                let skipped = urls.len() - added;
                if skipped > 0 {
                    format!("Added {added} to queue ({skipped} already queued)")
                } else {
                    format!("Added {added} to queue")
                }
            }
            SessionCommand::Remove(n) => match n.checked_sub(1) {
                None => "Queue numbers start at 1".to_string(),
                Some(position) => match self.queue.remove(position) {
                    Ok(job) => format!("Removed {}", job.url()),
                    Err(QueueError::IndexOutOfRange { len, .. }) => {
                        format!("No entry {n} (queue has {len})")
                    }
                },
            },
            SessionCommand::List => render::queue_listing(&self.queue),
            SessionCommand::Results => render::results_listing(self.queue.results()),
            SessionCommand::Clear => {
                self.queue.clear_results();
                "Cleared completed downloads".to_string()
            }
            SessionCommand::Help => HELP.to_string(),
            SessionCommand::Run | SessionCommand::Quit => String::new(),
        }
    }

    async fn run(&mut self) {
        if self.queue.is_empty() {
            println!("Queue is empty.");
            return;
        }
        let batch = run_batch(&mut self.queue, &self.runner, &self.settings).await;
        println!("{}", render::results_listing(&batch));
    }
}

pub async fn run_session(settings: &Settings) -> Result<()> {
    let runner = settings.build_runner()?;
    let mut session = Session::new(runner, settings.clone());
    println!(
        "flacq session – saving to {} (type `help`)",
        settings.output_dir.display()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("flacq> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match SessionCommand::parse(&line) {
            Ok(None) => {}
            Ok(Some(SessionCommand::Quit)) => break,
            Ok(Some(SessionCommand::Run)) => session.run().await,
            Ok(Some(cmd)) => println!("{}", session.apply(&cmd)),
            Err(msg) => println!("{msg}"),
        }
    }

    tracing::info!(
        pending = session.queue().len(),
        results = session.queue().results().len(),
        "session ended"
    );
    Ok(())
}
