use serde::{Deserialize, Serialize};

use super::archival::ArchiveLink;
use super::users::EligibilityVerdict;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleCollision {
    pub title: String,
    pub occurrences: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationDrop {
    pub title: String,
    pub match_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocateFailureKind {
    NotFound,
    Ambiguous,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedLink {
    pub title: String,
    pub kind: LocateFailureKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<ArchiveLink>,
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IneligibleUser {
    pub user: String,
    pub verdict: EligibilityVerdict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    #[serde(default)]
    pub collisions: Vec<TitleCollision>,
    #[serde(default)]
    pub correlation_drops: Vec<CorrelationDrop>,
    #[serde(default)]
    pub unresolved_links: Vec<UnresolvedLink>,
    #[serde(default)]
    pub ineligible_users: Vec<IneligibleUser>,
}

impl Diagnostics {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.collisions.is_empty()
            && self.correlation_drops.is_empty()
            && self.unresolved_links.is_empty()
            && self.ineligible_users.is_empty()
    }
}
