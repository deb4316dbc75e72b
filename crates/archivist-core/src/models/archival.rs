use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ArchivistError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivalEvent {
    pub page: String,
    pub before_revision_id: u64,
    pub after_revision_id: u64,
    pub destination_candidates: Vec<String>,
    pub raw_summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArchiveLink {
    pub page: String,
    pub anchor: String,
}

impl ArchiveLink {
    pub fn new(page: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            anchor: anchor.into(),
        }
    }
}

impl fmt::Display for ArchiveLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.page, self.anchor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn ending_at(end: DateTime<Utc>, hours: u64) -> Result<Self> {
        let span = i64::try_from(hours)
            .ok()
            .and_then(TimeDelta::try_hours)
            .ok_or_else(|| ArchivistError::Validation(format!("window of {hours}h is too large")))?;
        let start = end
            .checked_sub_signed(span)
            .ok_or_else(|| ArchivistError::Validation(format!("window of {hours}h underflows")))?;
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// Smallest window holding both `self` and `other`.
    #[must_use]
    pub fn span(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}
