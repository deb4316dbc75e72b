use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{CorrelatedThread, CorrelationDrop, ThreadCreationRecord, normalize_title};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correlation {
    pub threads: Vec<CorrelatedThread>,
    pub drops: Vec<CorrelationDrop>,
}

pub fn correlate(removed_titles: &[String], creation_records: &[ThreadCreationRecord]) -> Correlation {
    let mut by_title = HashMap::<&str, Vec<&ThreadCreationRecord>>::new();
    for record in creation_records {
        by_title
            .entry(normalize_title(&record.title))
            .or_default()
            .push(record);
    }

    let mut correlation = Correlation::default();
    for title in removed_titles {
        let key = normalize_title(title);
        match by_title.get(key).map(Vec::as_slice).unwrap_or_default() {
            [record] => correlation.threads.push(CorrelatedThread {
                title: key.to_string(),
                author: record.author.clone(),
                source_revision_id: record.source_revision_id,
            }),
            matches => {
                if matches.is_empty() {
                    warn!(title = key, "no creation found for archived thread");
                } else {
                    warn!(
                        title = key,
                        match_count = matches.len(),
                        "multiple creations found for archived thread; all are ignored"
                    );
                }
                correlation.drops.push(CorrelationDrop {
                    title: key.to_string(),
                    match_count: matches.len(),
                });
            }
        }
    }
    correlation
}
