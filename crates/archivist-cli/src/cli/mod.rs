use clap::{Parser, Subcommand, ValueEnum};

mod args;


pub use args::{DiffArgs, EligibilityArgs, NotifyArgs, RunArgs};

#[derive(Debug, Parser)]
#[command(name = "archivist")]
#[command(about = "Tell thread authors where their archived discussions went", version)]
pub struct Cli {
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute the notification plan for the last archival edit.
    Plan(RunArgs),
    /// Plan, then write one JSON notice per sendable record.
    Notify(NotifyArgs),
    /// Show which threads two revisions of the page differ by.
    Diff(DiffArgs),
    /// Report whether each user may receive a notice.
    Eligibility(EligibilityArgs),
}

impl Commands {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Plan(_) => "plan",
            Self::Notify(_) => "notify",
            Self::Diff(_) => "diff",
            Self::Eligibility(_) => "eligibility",
        }
    }
}
