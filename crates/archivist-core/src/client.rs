use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::{info, info_span};
use uuid::Uuid;

use crate::builder::NotificationListBuilder;
use crate::config::AppConfig;
use crate::diff::{SectionDiff, diff};
use crate::eligibility::EligibilityPolicy;
use crate::error::Result;
use crate::history::{creation_records_from_history, last_archival_from_history};
use crate::locate::ArchiveLocator;
use crate::models::{EligibilityResult, NotificationPlan, TimeWindow};
use crate::source::{RevisionSource, UserDirectory};

pub struct Archivist<S, D> {
    source: S,
    directory: D,
    config: AppConfig,
}

impl<S, D> std::fmt::Debug for Archivist<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archivist")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S, D> Archivist<S, D>
where
    S: RevisionSource + Sync,
    D: UserDirectory,
{
    pub fn new(source: S, directory: D, config: AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            directory,
            config,
        })
    }

    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn plan(&self, now: DateTime<Utc>) -> Result<NotificationPlan> {
        let run_id = Uuid::new_v4();
        let span = info_span!("plan", %run_id, page = %self.config.page);
        let _entered = span.enter();

        let archival_window = TimeWindow::ending_at(now, self.config.archival_window_hours)?;
        let creation_window = TimeWindow::ending_at(now, self.config.creation_window_hours)?;

        let revisions = self
            .source
            .history(&self.config.page, &archival_window.span(&creation_window))?;
        let event = last_archival_from_history(
            &self.config.page,
            &self.config.archiver,
            &archival_window,
            &revisions,
        )?;
        info!(
            before = event.before_revision_id,
            after = event.after_revision_id,
            destinations = event.destination_candidates.len(),
            "found archival edit"
        );
        let created = revisions
            .into_iter()
            .filter(|revision| revision.timestamp.is_none_or(|at| creation_window.contains(at)))
            .collect::<Vec<_>>();
        let creation_records = creation_records_from_history(&created);

        let list = NotificationListBuilder::new(&self.source, &self.directory)
            .with_locator(ArchiveLocator::new(self.config.fetch_parallelism))
            .build(&event, &creation_records)?;
        info!(
            records = list.records.len(),
            sendable = list.records.iter().filter(|record| record.valid).count(),
            clean = list.diagnostics.is_clean(),
            "planned notifications"
        );

        Ok(NotificationPlan {
            run_id,
            page: self.config.page.clone(),
            event,
            records: list.records,
            diagnostics: list.diagnostics,
        })
    }

    pub fn diff_revisions(&self, before: u64, after: u64) -> Result<SectionDiff> {
        let before = self.source.snapshot(&self.config.page, before)?;
        let after = self.source.snapshot(&self.config.page, after)?;
        diff(&before, &after)
    }

    pub fn evaluate_users<I, T>(&self, users: I) -> Result<EligibilityResult>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let users = users
            .into_iter()
            .map(Into::into)
            .collect::<BTreeSet<String>>();
        EligibilityPolicy::new(&self.directory).evaluate(&users)
    }
}
