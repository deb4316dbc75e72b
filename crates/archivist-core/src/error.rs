use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, ArchivistError>;

#[derive(Debug, Error)]
pub enum ArchivistError {
    #[error(
        "snapshot pair is not a valid archival diff; titles present after but not before: {}",
        .offending.join(", ")
    )]
    DiffInvalid { offending: Vec<String> },

    #[error("no edit by {archiver} on {page} since {since}")]
    NoArchivalFound {
        archiver: String,
        page: String,
        since: DateTime<Utc>,
    },

    #[error("archival edit summary does not contain any wikilink: {0}")]
    MissingArchiveLinks(String),

    #[error("collaborator call failed: {0}")]
    Collaborator(String),

    #[error("unexpected API payload: {0}")]
    Payload(String),

    #[error("no recorded exchange matches request: {0}")]
    ReplayMiss(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub operation: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ArchivistError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::DiffInvalid { .. } => "DIFF_INVALID",
            Self::NoArchivalFound { .. } => "NO_ARCHIVAL_FOUND",
            Self::MissingArchiveLinks(_) => "MISSING_ARCHIVE_LINKS",
            Self::Collaborator(_) => "COLLABORATOR_FAILED",
            Self::Payload(_) => "PAYLOAD_INVALID",
            Self::ReplayMiss(_) => "REPLAY_MISS",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_payload(&self, operation: impl Into<String>) -> ErrorPayload {
        let details = match self {
            Self::DiffInvalid { offending } => Some(serde_json::json!({ "offending": offending })),
            Self::NoArchivalFound {
                archiver,
                page,
                since,
            } => Some(serde_json::json!({
                "archiver": archiver,
                "page": page,
                "since": since.to_rfc3339(),
            })),
            _ => None,
        };
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            operation: operation.into(),
            trace_id: Uuid::new_v4().to_string(),
            details,
        }
    }
}
