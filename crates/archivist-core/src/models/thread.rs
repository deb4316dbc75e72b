use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadCreationRecord {
    pub title: String,
    pub author: String,
    pub source_revision_id: u64,
}

impl ThreadCreationRecord {
    pub fn new(title: impl Into<String>, author: impl Into<String>, source_revision_id: u64) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            source_revision_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelatedThread {
    pub title: String,
    pub author: String,
    pub source_revision_id: u64,
}
