use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ArchivistError, Result};
use crate::models::Revision;

#[derive(Debug, Deserialize)]
pub(super) struct ParseResponse {
    pub(super) parse: ParseBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct ParseBody {
    #[serde(default)]
    pub(super) sections: Vec<SectionEntry>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SectionEntry {
    pub(super) line: String,
    #[serde(default)]
    pub(super) anchor: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct QueryResponse<T> {
    pub(super) query: Option<T>,
    #[serde(default, rename = "continue")]
    pub(super) continuation: Option<Continuation>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct Continuation {
    #[serde(default)]
    pub(super) rvcontinue: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RevisionsQuery {
    #[serde(default)]
    pub(super) pages: Vec<PageRevisions>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PageRevisions {
    #[serde(default)]
    pub(super) revisions: Vec<RevisionEntry>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RevisionEntry {
    revid: u64,
    #[serde(default)]
    parentid: u64,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

impl RevisionEntry {
    pub(super) fn into_revision(self) -> Result<Revision> {
        let timestamp = self
            .timestamp
            .as_deref()
            .map(parse_revision_timestamp)
            .transpose()?;
        Ok(Revision {
            revision_id: self.revid,
            parent_id: self.parentid,
            user: self.user,
            comment: self.comment,
            timestamp,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UsersQuery {
    #[serde(default)]
    pub(super) users: Vec<UserEntry>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserEntry {
    pub(super) name: String,
    #[serde(default)]
    pub(super) missing: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct BlocksQuery {
    #[serde(default)]
    pub(super) blocks: Vec<BlockEntry>,
}

#[derive(Debug, Deserialize)]
pub(super) struct BlockEntry {
    #[serde(default)]
    pub(super) user: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

pub(super) fn decode<T: DeserializeOwned>(value: Value, operation: &str) -> Result<T> {
    if value.get("error").is_some() {
        let envelope = serde_json::from_value::<ApiErrorEnvelope>(value)
            .map_err(|err| ArchivistError::Payload(format!("{operation}: {err}")))?;
        return Err(ArchivistError::Collaborator(format!(
            "{operation}: {} ({})",
            envelope.error.info, envelope.error.code
        )));
    }
    serde_json::from_value(value).map_err(|err| ArchivistError::Payload(format!("{operation}: {err}")))
}

pub(super) fn parse_revision_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|err| ArchivistError::Payload(format!("invalid revision timestamp '{raw}': {err}")))
}

#[must_use]
pub fn mediawiki_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d%H%M%S").to_string()
}
