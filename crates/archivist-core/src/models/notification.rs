use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::archival::{ArchivalEvent, ArchiveLink};
use super::report::Diagnostics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    ArchiveLinkNotFound,
    UserNotNotifiable,
}

impl InvalidReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ArchiveLinkNotFound => "archive link not found",
            Self::UserNotNotifiable => "user is not notifiable",
        }
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub user: String,
    pub thread_title: String,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_link: Option<ArchiveLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_reason: Option<InvalidReason>,
}

impl NotificationRecord {
    pub fn sendable(
        user: impl Into<String>,
        thread_title: impl Into<String>,
        archive_link: ArchiveLink,
    ) -> Self {
        Self {
            user: user.into(),
            thread_title: thread_title.into(),
            valid: true,
            archive_link: Some(archive_link),
            invalid_reason: None,
        }
    }

    pub fn invalid(
        user: impl Into<String>,
        thread_title: impl Into<String>,
        reason: InvalidReason,
    ) -> Self {
        Self {
            user: user.into(),
            thread_title: thread_title.into(),
            valid: false,
            archive_link: None,
            invalid_reason: Some(reason),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPlan {
    pub run_id: Uuid,
    pub page: String,
    pub event: ArchivalEvent,
    pub records: Vec<NotificationRecord>,
    pub diagnostics: Diagnostics,
}

impl NotificationPlan {
    pub fn sendable(&self) -> impl Iterator<Item = &NotificationRecord> {
        self.records.iter().filter(|record| record.valid)
    }
}
