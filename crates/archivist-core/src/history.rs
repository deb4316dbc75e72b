use tracing::debug;

use crate::error::{ArchivistError, Result};
use crate::models::{ArchivalEvent, Revision, ThreadCreationRecord, TimeWindow};
use crate::summary::{archive_destinations, new_section_title};

pub(crate) fn creation_records_from_history(revisions: &[Revision]) -> Vec<ThreadCreationRecord> {
    let mut records = Vec::new();
    for revision in revisions {
        let (Some(user), Some(comment)) = (&revision.user, &revision.comment) else {
            continue;
        };
        if let Some(title) = new_section_title(comment) {
            records.push(ThreadCreationRecord::new(title, user, revision.revision_id));
        }
    }
    debug!(
        revisions = revisions.len(),
        creations = records.len(),
        "scanned history for new sections"
    );
    records
}

// `revisions` must be ordered newest first, as the history query returns them.
pub(crate) fn last_archival_from_history(
    page: &str,
    archiver: &str,
    window: &TimeWindow,
    revisions: &[Revision],
) -> Result<ArchivalEvent> {
    let archival = revisions.iter().find(|revision| {
        revision.user.as_deref() == Some(archiver)
            && revision.timestamp.is_none_or(|at| window.contains(at))
    });
    let Some(revision) = archival else {
        return Err(ArchivistError::NoArchivalFound {
            archiver: archiver.to_string(),
            page: page.to_string(),
            since: window.start,
        });
    };

    let summary = revision.comment.clone().unwrap_or_default();
    let destination_candidates = archive_destinations(&summary)?;
    Ok(ArchivalEvent {
        page: page.to_string(),
        before_revision_id: revision.parent_id,
        after_revision_id: revision.revision_id,
        destination_candidates,
        raw_summary: summary,
        timestamp: revision.timestamp,
    })
}
