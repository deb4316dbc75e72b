use std::collections::BTreeMap;

use crate::error::Result;
use crate::history::{creation_records_from_history, last_archival_from_history};
use crate::models::{
    AnchoredSection, ArchivalEvent, Revision, RevisionSnapshot, ThreadCreationRecord, TimeWindow,
    UserFacts,
};

/// Read access to a page's revisions, history and current sections.
pub trait RevisionSource {
    fn snapshot(&self, page: &str, revision_id: u64) -> Result<RevisionSnapshot>;

    /// Revisions of `page` inside `window`, newest first.
    fn history(&self, page: &str, window: &TimeWindow) -> Result<Vec<Revision>>;

    fn creation_records(
        &self,
        page: &str,
        window: &TimeWindow,
    ) -> Result<Vec<ThreadCreationRecord>> {
        let revisions = self.history(page, window)?;
        Ok(creation_records_from_history(&revisions))
    }

    /// Fails with `NoArchivalFound` when `archiver` made no edit inside `window`.
    fn last_archival_event(
        &self,
        page: &str,
        archiver: &str,
        window: &TimeWindow,
    ) -> Result<ArchivalEvent> {
        let revisions = self.history(page, window)?;
        last_archival_from_history(page, archiver, window, &revisions)
    }

    fn sections_with_anchors(&self, page: &str) -> Result<Vec<AnchoredSection>>;
}

pub trait UserDirectory {
    fn eligibility_facts(&self, usernames: &[String]) -> Result<BTreeMap<String, UserFacts>>;
}

impl<T: RevisionSource + ?Sized> RevisionSource for &T {
    fn snapshot(&self, page: &str, revision_id: u64) -> Result<RevisionSnapshot> {
        (**self).snapshot(page, revision_id)
    }

    fn history(&self, page: &str, window: &TimeWindow) -> Result<Vec<Revision>> {
        (**self).history(page, window)
    }

    fn creation_records(
        &self,
        page: &str,
        window: &TimeWindow,
    ) -> Result<Vec<ThreadCreationRecord>> {
        (**self).creation_records(page, window)
    }

    fn last_archival_event(
        &self,
        page: &str,
        archiver: &str,
        window: &TimeWindow,
    ) -> Result<ArchivalEvent> {
        (**self).last_archival_event(page, archiver, window)
    }

    fn sections_with_anchors(&self, page: &str) -> Result<Vec<AnchoredSection>> {
        (**self).sections_with_anchors(page)
    }
}

impl<T: UserDirectory + ?Sized> UserDirectory for &T {
    fn eligibility_facts(&self, usernames: &[String]) -> Result<BTreeMap<String, UserFacts>> {
        (**self).eligibility_facts(usernames)
    }
}
