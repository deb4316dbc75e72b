use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ArchivistError, Result};
use crate::models::{RevisionSnapshot, TitleCollision, normalize_title};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDiff {
    pub removed: Vec<String>,
    pub collisions: Vec<TitleCollision>,
}

pub fn diff(before: &RevisionSnapshot, after: &RevisionSnapshot) -> Result<SectionDiff> {
    let mut before_counts = HashMap::<&str, usize>::new();
    for title in before.titles() {
        *before_counts.entry(normalize_title(title)).or_default() += 1;
    }

    let mut offending = Vec::<String>::new();
    let mut after_titles = HashSet::<&str>::new();
    for title in after.titles() {
        let key = normalize_title(title);
        if after_titles.insert(key) && !before_counts.contains_key(key) {
            offending.push(key.to_string());
        }
    }
    if !offending.is_empty() {
        return Err(ArchivistError::DiffInvalid { offending });
    }

    let mut collisions = Vec::<TitleCollision>::new();
    let mut removed = Vec::<String>::new();
    let mut reported = HashSet::<&str>::new();
    for title in before.titles() {
        let key = normalize_title(title);
        let occurrences = before_counts.get(key).copied().unwrap_or_default();
        if occurrences > 1 {
            if reported.insert(key) {
                warn!(
                    title = key,
                    occurrences, "multiple threads share this title; all of them are ignored"
                );
                collisions.push(TitleCollision {
                    title: key.to_string(),
                    occurrences,
                });
            }
            continue;
        }
        if !after_titles.contains(key) {
            removed.push(key.to_string());
        }
    }

    Ok(SectionDiff {
        removed,
        collisions,
    })
}
