use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use archivist_core::config::{
    ENV_ARCHIVAL_WINDOW_HOURS, ENV_ARCHIVER, ENV_BOT_NAME, ENV_CREATION_WINDOW_HOURS,
    ENV_FETCH_PARALLELISM, ENV_MAX_CONTINUATIONS, ENV_PAGE,
};
use archivist_core::models::{NotificationRecord, TitleCollision};
use archivist_core::publish::{JsonLinesPublisher, PublishReport, publish_all};
use archivist_core::{AppConfig, Archivist, ArchivistError, MediaWikiSource, ReplayTransport};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::cli::{Commands, DiffArgs, EligibilityArgs, NotifyArgs, RunArgs};

mod support;

pub(crate) use self::support::report_failure;
use self::support::{eprint_json, print_json};

type ReplaySource<'a> = MediaWikiSource<&'a ReplayTransport>;

pub(crate) fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Plan(args) => run_plan(&args),
        Commands::Notify(args) => run_notify(&args),
        Commands::Diff(args) => run_diff(&args),
        Commands::Eligibility(args) => run_eligibility(&args),
    }
}

fn run_plan(args: &RunArgs) -> Result<()> {
    let transport = load_replay(args)?;
    let archivist = build_archivist(args, &transport)?;
    let plan = archivist.plan(args.now.unwrap_or_else(Utc::now))?;
    print_json(&plan)
}

fn run_notify(args: &NotifyArgs) -> Result<()> {
    let transport = load_replay(&args.run)?;
    let archivist = build_archivist(&args.run, &transport)?;
    let plan = archivist.plan(args.run.now.unwrap_or_else(Utc::now))?;
    let config = archivist.config();

    let report = match &args.out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            publish_to(BufWriter::new(file), &plan.records, config)
        }
        None => publish_to(io::stdout().lock(), &plan.records, config),
    };
    info!(
        published = report.published,
        skipped = report.skipped,
        failed = report.failed.len(),
        "notification run finished"
    );
    eprint_json(&report)?;
    ensure_delivered(&report)
}

fn ensure_delivered(report: &PublishReport) -> Result<()> {
    if report.failed.is_empty() {
        return Ok(());
    }
    let attempted = report.published + report.failed.len();
    Err(ArchivistError::Collaborator(format!(
        "{} of {attempted} notifications failed to publish",
        report.failed.len()
    ))
    .into())
}

fn publish_to<W: Write>(
    writer: W,
    records: &[NotificationRecord],
    config: &AppConfig,
) -> PublishReport {
    let mut publisher = JsonLinesPublisher::new(writer, &config.page, &config.bot_name);
    publish_all(records, &mut publisher)
}

#[derive(Debug, Serialize)]
struct DiffOutput {
    before: u64,
    after: u64,
    removed: Vec<String>,
    collisions: Vec<TitleCollision>,
}

fn run_diff(args: &DiffArgs) -> Result<()> {
    let transport = load_replay(&args.run)?;
    let archivist = build_archivist(&args.run, &transport)?;
    let diff = archivist.diff_revisions(args.before, args.after)?;
    print_json(&DiffOutput {
        before: args.before,
        after: args.after,
        removed: diff.removed,
        collisions: diff.collisions,
    })
}

fn run_eligibility(args: &EligibilityArgs) -> Result<()> {
    let transport = load_replay(&args.run)?;
    let archivist = build_archivist(&args.run, &transport)?;
    let result = archivist.evaluate_users(args.users.iter().map(String::as_str))?;
    print_json(&result)
}

fn load_replay(args: &RunArgs) -> Result<ReplayTransport> {
    let transport = ReplayTransport::load(&args.replay)
        .with_context(|| format!("failed to load replay file {}", args.replay.display()))?;
    info!(exchanges = transport.len(), path = %args.replay.display(), "loaded replay");
    Ok(transport)
}

fn build_archivist<'a>(
    args: &RunArgs,
    transport: &'a ReplayTransport,
) -> Result<Archivist<ReplaySource<'a>, ReplaySource<'a>>> {
    let config = resolve_config(args)?;
    let source = MediaWikiSource::new(transport).with_max_continuations(config.max_continuations);
    let directory = MediaWikiSource::new(transport);
    Ok(Archivist::new(source, directory, config)?)
}

fn resolve_config(args: &RunArgs) -> Result<AppConfig> {
    resolve_config_from(args, |name| std::env::var(name).ok())
}

// Flags shadow the matching variables before anything is parsed or validated.
fn resolve_config_from<L>(args: &RunArgs, env: L) -> Result<AppConfig>
where
    L: Fn(&str) -> Option<String>,
{
    let config = AppConfig::from_lookup(|name| {
        flag_value(args, name)
            .filter(|value| !value.trim().is_empty())
            .or_else(|| env(name))
    })?;
    Ok(config)
}

fn flag_value(args: &RunArgs, name: &str) -> Option<String> {
    match name {
        ENV_PAGE => args.page.clone(),
        ENV_ARCHIVER => args.archiver.clone(),
        ENV_BOT_NAME => args.bot_name.clone(),
        ENV_ARCHIVAL_WINDOW_HOURS => args.archival_window_hours.map(|hours| hours.to_string()),
        ENV_CREATION_WINDOW_HOURS => args.creation_window_hours.map(|hours| hours.to_string()),
        ENV_MAX_CONTINUATIONS => args.max_continuations.map(|max| max.to_string()),
        ENV_FETCH_PARALLELISM => args.fetch_parallelism.map(|value| value.to_string()),
        _ => None,
    }
}
