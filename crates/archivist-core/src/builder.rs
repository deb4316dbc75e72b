use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::correlate::correlate;
use crate::diff::diff;
use crate::eligibility::EligibilityPolicy;
use crate::error::Result;
use crate::locate::ArchiveLocator;
use crate::models::{
    ArchivalEvent, Diagnostics, IneligibleUser, InvalidReason, NotificationRecord,
    ThreadCreationRecord,
};
use crate::source::{RevisionSource, UserDirectory};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationList {
    pub records: Vec<NotificationRecord>,
    pub diagnostics: Diagnostics,
}

pub struct NotificationListBuilder<'a, S: ?Sized, D: ?Sized> {
    source: &'a S,
    directory: &'a D,
    locator: ArchiveLocator,
}

impl<'a, S, D> NotificationListBuilder<'a, S, D>
where
    S: RevisionSource + Sync + ?Sized,
    D: UserDirectory + ?Sized,
{
    pub fn new(source: &'a S, directory: &'a D) -> Self {
        Self {
            source,
            directory,
            locator: ArchiveLocator::default(),
        }
    }

    #[must_use]
    pub fn with_locator(mut self, locator: ArchiveLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn build(
        &self,
        event: &ArchivalEvent,
        creation_records: &[ThreadCreationRecord],
    ) -> Result<NotificationList> {
        let before = self.source.snapshot(&event.page, event.before_revision_id)?;
        let after = self.source.snapshot(&event.page, event.after_revision_id)?;
        let section_diff = diff(&before, &after)?;
        info!(
            before = event.before_revision_id,
            after = event.after_revision_id,
            removed = section_diff.removed.len(),
            "computed archived threads"
        );

        let correlation = correlate(&section_diff.removed, creation_records);
        let mut diagnostics = Diagnostics {
            collisions: section_diff.collisions,
            correlation_drops: correlation.drops,
            ..Diagnostics::default()
        };
        let threads = correlation.threads;
        if threads.is_empty() {
            info!("no archived thread could be matched to its creation");
            return Ok(NotificationList {
                records: Vec::new(),
                diagnostics,
            });
        }

        let titles = threads
            .iter()
            .map(|thread| thread.title.clone())
            .collect::<Vec<_>>();
        let located = self
            .locator
            .locate(&event.destination_candidates, &titles, |page| {
                self.source.sections_with_anchors(page)
            })?;
        diagnostics.unresolved_links = located.unresolved;

        let authors = threads
            .iter()
            .map(|thread| thread.author.clone())
            .collect::<BTreeSet<_>>();
        let eligibility = EligibilityPolicy::new(self.directory).evaluate(&authors)?;
        diagnostics.ineligible_users = eligibility
            .iter()
            .filter(|(_, verdict)| !verdict.is_eligible())
            .map(|(user, verdict)| IneligibleUser {
                user: user.to_string(),
                verdict,
            })
            .collect();

        let mut records = Vec::with_capacity(threads.len());
        for (thread, link) in threads.into_iter().zip(located.links) {
            let record = match link {
                None => NotificationRecord::invalid(
                    thread.author,
                    thread.title,
                    InvalidReason::ArchiveLinkNotFound,
                ),
                Some(_) if !eligibility.is_eligible(&thread.author) => NotificationRecord::invalid(
                    thread.author,
                    thread.title,
                    InvalidReason::UserNotNotifiable,
                ),
                Some(link) => NotificationRecord::sendable(thread.author, thread.title, link),
            };
            records.push(record);
        }
        debug!(
            records = records.len(),
            sendable = records.iter().filter(|record| record.valid).count(),
            "built notification list"
        );

        Ok(NotificationList {
            records,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests;
