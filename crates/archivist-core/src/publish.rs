use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ArchivistError, Result};
use crate::models::NotificationRecord;

/// Delivers one valid notification. Callers only hand over records whose
/// `valid` flag is set.
pub trait Publisher {
    fn publish(&mut self, record: &NotificationRecord) -> Result<()>;
}

impl<P: Publisher + ?Sized> Publisher for &mut P {
    fn publish(&mut self, record: &NotificationRecord) -> Result<()> {
        (**self).publish(record)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub user: String,
    pub thread: String,
    pub archive_link: String,
    pub origin_page: String,
    pub bot_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishFailure {
    pub user: String,
    pub thread: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReport {
    pub published: usize,
    pub skipped: usize,
    pub failed: Vec<PublishFailure>,
}

pub fn publish_all<P>(records: &[NotificationRecord], publisher: &mut P) -> PublishReport
where
    P: Publisher + ?Sized,
{
    let mut report = PublishReport::default();
    for record in records {
        if !record.valid {
            let reason = record
                .invalid_reason
                .map_or("unspecified", |reason| reason.as_str());
            warn!(
                thread = %record.thread_title,
                user = %record.user,
                reason,
                "skipping notification"
            );
            report.skipped += 1;
            continue;
        }
        match publisher.publish(record) {
            Ok(()) => report.published += 1,
            Err(err) => {
                warn!(
                    thread = %record.thread_title,
                    user = %record.user,
                    error = %err,
                    "failed to publish notification"
                );
                report.failed.push(PublishFailure {
                    user: record.user.clone(),
                    thread: record.thread_title.clone(),
                    error: err.to_string(),
                });
            }
        }
    }
    report
}

/// Writes one JSON `Notice` per line.
pub struct JsonLinesPublisher<W> {
    writer: W,
    origin_page: String,
    bot_name: String,
}

impl<W: Write> JsonLinesPublisher<W> {
    pub fn new(writer: W, origin_page: impl Into<String>, bot_name: impl Into<String>) -> Self {
        Self {
            writer,
            origin_page: origin_page.into(),
            bot_name: bot_name.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn notice(&self, record: &NotificationRecord) -> Result<Notice> {
        let link = record.archive_link.as_ref().ok_or_else(|| {
            ArchivistError::Validation(format!(
                "notification for {} about '{}' has no archive link",
                record.user, record.thread_title
            ))
        })?;
        Ok(Notice {
            user: record.user.clone(),
            thread: record.thread_title.clone(),
            archive_link: link.to_string(),
            origin_page: self.origin_page.clone(),
            bot_name: self.bot_name.clone(),
        })
    }
}

impl<W: Write> Publisher for JsonLinesPublisher<W> {
    fn publish(&mut self, record: &NotificationRecord) -> Result<()> {
        let notice = self.notice(record)?;
        serde_json::to_writer(&mut self.writer, &notice)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
