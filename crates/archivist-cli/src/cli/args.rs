use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Args;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Recorded API exchanges to answer requests from.
    #[arg(long)]
    pub replay: PathBuf,
    #[arg(long)]
    pub page: Option<String>,
    #[arg(long)]
    pub archiver: Option<String>,
    #[arg(long)]
    pub bot_name: Option<String>,
    #[arg(long)]
    pub archival_window_hours: Option<u64>,
    #[arg(long)]
    pub creation_window_hours: Option<u64>,
    #[arg(long)]
    pub max_continuations: Option<usize>,
    #[arg(long)]
    pub fetch_parallelism: Option<usize>,
    /// Reference time for the search windows (RFC 3339). Defaults to now.
    #[arg(long)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Args)]
pub struct NotifyArgs {
    #[command(flatten)]
    pub run: RunArgs,
    /// Write notices here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DiffArgs {
    #[command(flatten)]
    pub run: RunArgs,
    #[arg(long)]
    pub before: u64,
    #[arg(long)]
    pub after: u64,
}

#[derive(Debug, Args)]
pub struct EligibilityArgs {
    #[command(flatten)]
    pub run: RunArgs,
    #[arg(required = true)]
    pub users: Vec<String>,
}
