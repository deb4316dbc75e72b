mod archival;
mod notification;
mod report;
mod revision;
mod thread;
mod users;

pub use archival::{ArchivalEvent, ArchiveLink, TimeWindow};
pub use notification::{InvalidReason, NotificationPlan, NotificationRecord};
pub use report::{
    CorrelationDrop, Diagnostics, IneligibleUser, LocateFailureKind, TitleCollision,
    UnresolvedLink,
};
pub use revision::{AnchoredSection, Revision, RevisionSnapshot, normalize_title};
pub use thread::{CorrelatedThread, ThreadCreationRecord};
pub use users::{EligibilityResult, EligibilityVerdict, UserFacts};
