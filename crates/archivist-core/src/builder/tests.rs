use std::collections::{BTreeMap, HashMap};

use crate::error::ArchivistError;
use crate::models::{
    AnchoredSection, ArchiveLink, EligibilityVerdict, LocateFailureKind, Revision,
    RevisionSnapshot, TimeWindow, UserFacts,
};

use super::*;

#[derive(Default)]
struct FakeWiki {
    snapshots: HashMap<u64, Vec<&'static str>>,
    archives: HashMap<&'static str, Vec<(&'static str, &'static str)>>,
    users: BTreeMap<String, UserFacts>,
}

impl FakeWiki {
    fn with_snapshot(mut self, revision_id: u64, titles: &[&'static str]) -> Self {
        self.snapshots.insert(revision_id, titles.to_vec());
        self
    }

    fn with_archive(mut self, page: &'static str, sections: &[(&'static str, &'static str)]) -> Self {
        self.archives.insert(page, sections.to_vec());
        self
    }

    fn with_user(mut self, name: &str, missing: bool, blocked: bool) -> Self {
        self.users
            .insert(name.to_string(), UserFacts { missing, blocked });
        self
    }
}

impl RevisionSource for FakeWiki {
    fn snapshot(&self, _page: &str, revision_id: u64) -> Result<RevisionSnapshot> {
        self.snapshots
            .get(&revision_id)
            .map(|titles| RevisionSnapshot::at_revision(revision_id, titles.iter().copied()))
            .ok_or_else(|| ArchivistError::Collaborator(format!("unknown revision {revision_id}")))
    }

    fn history(&self, _page: &str, _window: &TimeWindow) -> Result<Vec<Revision>> {
        Ok(Vec::new())
    }

    fn sections_with_anchors(&self, page: &str) -> Result<Vec<AnchoredSection>> {
        self.archives
            .get(page)
            .map(|sections| {
                sections
                    .iter()
                    .map(|(title, anchor)| AnchoredSection::new(*title, *anchor))
                    .collect()
            })
            .ok_or_else(|| ArchivistError::Collaborator(format!("unknown page {page}")))
    }
}

impl UserDirectory for FakeWiki {
    fn eligibility_facts(&self, usernames: &[String]) -> Result<BTreeMap<String, UserFacts>> {
        Ok(usernames
            .iter()
            .filter_map(|name| self.users.get(name).map(|facts| (name.clone(), *facts)))
            .collect())
    }
}

fn event(candidates: &[&str]) -> ArchivalEvent {
    ArchivalEvent {
        page: "Wikipedia:Teahouse".to_string(),
        before_revision_id: 100,
        after_revision_id: 101,
        destination_candidates: candidates.iter().map(ToString::to_string).collect(),
        raw_summary: "Archiving 2 discussion(s) to [[Archive 1]]".to_string(),
        timestamp: None,
    }
}

fn creations() -> Vec<ThreadCreationRecord> {
    vec![
        ThreadCreationRecord::new("Thread A", "Alice", 90),
        ThreadCreationRecord::new("Thread B", "Bob", 91),
    ]
}

#[test]
fn build_flags_unlocatable_thread_and_keeps_order() {
    let wiki = FakeWiki::default()
        .with_snapshot(100, &["Thread A", "Thread B", "Kept"])
        .with_snapshot(101, &["Kept"])
        .with_archive("Archive 1", &[("Thread A", "Thread_A")])
        .with_user("Alice", false, false)
        .with_user("Bob", false, false);

    let list = NotificationListBuilder::new(&wiki, &wiki)
        .build(&event(&["Archive 1"]), &creations())
        .expect("build");

    assert_eq!(
        list.records,
        vec![
            NotificationRecord::sendable("Alice", "Thread A", ArchiveLink::new("Archive 1", "Thread_A")),
            NotificationRecord::invalid("Bob", "Thread B", InvalidReason::ArchiveLinkNotFound),
        ]
    );
    assert_eq!(
        list.records[1].invalid_reason.map(|reason| reason.to_string()).as_deref(),
        Some("archive link not found")
    );
    assert_eq!(list.diagnostics.unresolved_links[0].kind, LocateFailureKind::NotFound);
}

#[test]
fn build_marks_ineligible_author_with_resolved_link() {
    let wiki = FakeWiki::default()
        .with_snapshot(100, &["Thread A", "Thread B"])
        .with_snapshot(101, &[])
        .with_archive("Archive 1", &[("Thread A", "Thread_A"), ("Thread B", "Thread_B")])
        .with_user("Alice", false, true)
        .with_user("Bob", false, false);

    let list = NotificationListBuilder::new(&wiki, &wiki)
        .build(&event(&["Archive 1"]), &creations())
        .expect("build");

    assert!(!list.records[0].valid);
    assert_eq!(list.records[0].invalid_reason, Some(InvalidReason::UserNotNotifiable));
    assert!(list.records[0].archive_link.is_none());
    assert!(list.records[1].valid);
    assert_eq!(
        list.diagnostics.ineligible_users,
        vec![IneligibleUser {
            user: "Alice".to_string(),
            verdict: EligibilityVerdict::Blocked,
        }]
    );
}

#[test]
fn build_reports_missing_link_before_ineligibility() {
    let wiki = FakeWiki::default()
        .with_snapshot(100, &["Thread A"])
        .with_snapshot(101, &[])
        .with_archive("Archive 1", &[])
        .with_user("Alice", true, false);

    let list = NotificationListBuilder::new(&wiki, &wiki)
        .build(&event(&["Archive 1"]), &creations())
        .expect("build");

    assert_eq!(list.records.len(), 1);
    assert_eq!(list.records[0].invalid_reason, Some(InvalidReason::ArchiveLinkNotFound));
}

#[test]
fn build_emits_one_record_per_correlated_thread() {
    let wiki = FakeWiki::default()
        .with_snapshot(100, &["Thread A", "Thread B", "Dup", "Dup", "Orphan"])
        .with_snapshot(101, &[])
        .with_archive("Archive 1", &[("Thread A", "a")])
        .with_archive("Archive 2", &[("Thread B", "b")])
        .with_user("Alice", false, false)
        .with_user("Alice2", false, false);

    let records = vec![
        ThreadCreationRecord::new("Thread A", "Alice", 1),
        ThreadCreationRecord::new("Thread B", "Alice", 2),
        ThreadCreationRecord::new("Dup", "Alice2", 3),
    ];
    let list = NotificationListBuilder::new(&wiki, &wiki)
        .with_locator(ArchiveLocator::new(2))
        .build(&event(&["Archive 1", "Archive 2"]), &records)
        .expect("build");

    let titles = list
        .records
        .iter()
        .map(|record| (record.thread_title.as_str(), record.valid))
        .collect::<Vec<_>>();
    assert_eq!(titles, vec![("Thread A", true), ("Thread B", true)]);
    assert_eq!(list.diagnostics.collisions[0].title, "Dup");
    assert_eq!(list.diagnostics.correlation_drops[0].title, "Orphan");
    assert_eq!(list.diagnostics.correlation_drops[0].match_count, 0);
}

#[test]
fn build_without_correlated_threads_skips_lookups() {
    let wiki = FakeWiki::default()
        .with_snapshot(100, &["Orphan"])
        .with_snapshot(101, &[]);

    let list = NotificationListBuilder::new(&wiki, &wiki)
        .build(&event(&["Unreachable"]), &creations())
        .expect("build");

    assert!(list.records.is_empty());
    assert_eq!(list.diagnostics.correlation_drops.len(), 1);
}

#[test]
fn build_aborts_on_invalid_snapshot_pair() {
    let wiki = FakeWiki::default()
        .with_snapshot(100, &["Thread A"])
        .with_snapshot(101, &["Intruder"]);

    let err = NotificationListBuilder::new(&wiki, &wiki)
        .build(&event(&["Archive 1"]), &creations())
        .expect_err("invalid pair");
    assert_eq!(err.code(), "DIFF_INVALID");
}

#[test]
fn build_aborts_when_candidate_page_cannot_be_fetched() {
    let wiki = FakeWiki::default()
        .with_snapshot(100, &["Thread A"])
        .with_snapshot(101, &[])
        .with_user("Alice", false, false);

    let err = NotificationListBuilder::new(&wiki, &wiki)
        .build(&event(&["Deleted archive"]), &creations())
        .expect_err("fetch failure");
    assert_eq!(err.code(), "COLLABORATOR_FAILED");
}
