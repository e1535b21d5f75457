//! CLI for the flacq batch downloader.

mod commands;
mod render;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use flacq_core::config;
use std::path::PathBuf;

use commands::{run_completions, run_get, run_man, run_probe, run_session, Settings};

/// Top-level CLI for flacq.
#[derive(Debug, Parser)]
#[command(name = "flacq")]
#[command(about = "flacq: queue YouTube/SoundCloud URLs and download them as FLAC", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Options shared by commands that run a batch.
#[derive(Debug, Clone, Default, Args)]
pub struct RunOptions {
    /// Directory for finished .flac files (config default: "downloads").
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Run up to N downloads at once (config default: 1, strictly sequential).
    #[arg(long, short = 'j', value_name = "N")]
    pub jobs: Option<usize>,

    /// Keep a final file that already exists instead of overwriting it.
    #[arg(long)]
    pub skip_existing: bool,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Queue the given URLs and download them all as FLAC.
    Get {
        /// YouTube or SoundCloud URLs.
        #[arg(required_unless_present = "input")]
        urls: Vec<String>,

        /// Read more URLs from a file, one per line ('#' starts a comment).
        #[arg(long, short = 'i', value_name = "FILE")]
        input: Option<PathBuf>,

        #[command(flatten)]
        run: RunOptions,
    },

    /// Interactive session: build a queue, run it, inspect results.
    Session {
        #[command(flatten)]
        run: RunOptions,
    },

    /// Show the metadata and target filename for a URL without downloading.
    Probe {
        /// YouTube or SoundCloud URL.
        url: String,

        /// Directory the file would be saved to.
        #[arg(long, short = 'o', value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Print shell completions.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Print the man page (roff).
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
            CliCommand::Get { urls, input, run } => {
                let settings = load_settings(&run)?;
                run_get(&urls, input.as_deref(), &settings).await?;
            }
            CliCommand::Session { run } => {
                let settings = load_settings(&run)?;
                run_session(&settings).await?;
            }
            CliCommand::Probe { url, output_dir } => {
                let run = RunOptions {
                    output_dir,
                    ..RunOptions::default()
                };
                let settings = load_settings(&run)?;
                run_probe(&url, &settings).await?;
            }
        }

        Ok(())
    }
}

fn load_settings(run: &RunOptions) -> Result<Settings> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(Settings::resolve(&cfg, run))
}

#[cfg(test)]
mod tests;
