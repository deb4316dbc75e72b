use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[must_use]
pub fn normalize_title(raw: &str) -> &str {
    raw.trim()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    revision_id: Option<u64>,
    titles: Vec<String>,
}

impl RevisionSnapshot {
    pub fn new<I, T>(titles: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            revision_id: None,
            titles: titles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn at_revision<I, T>(revision_id: u64, titles: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            revision_id: Some(revision_id),
            ..Self::new(titles)
        }
    }

    #[must_use]
    pub const fn revision_id(&self) -> Option<u64> {
        self.revision_id
    }

    #[must_use]
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchoredSection {
    pub title: String,
    pub anchor: String,
}

impl AnchoredSection {
    pub fn new(title: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            anchor: anchor.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub revision_id: u64,
    pub parent_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}
