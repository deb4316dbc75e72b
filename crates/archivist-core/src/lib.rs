// Public fallible APIs in this crate share one concrete error contract (`ArchivistError`).
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod builder;
pub mod client;
pub mod config;
pub mod correlate;
pub mod diff;
pub mod eligibility;
pub mod error;
pub(crate) mod history;
pub mod locate;
pub mod mediawiki;
pub mod models;
pub mod publish;
pub mod source;
pub mod summary;

pub use builder::{NotificationList, NotificationListBuilder};
pub use client::Archivist;
pub use config::AppConfig;
pub use error::{ArchivistError, ErrorPayload, Result};
pub use mediawiki::{ApiTransport, MediaWikiSource, ReplayTransport};
pub use source::{RevisionSource, UserDirectory};
