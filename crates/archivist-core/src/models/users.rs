use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFacts {
    pub missing: bool,
    pub blocked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityVerdict {
    Eligible,
    Missing,
    Blocked,
}

impl EligibilityVerdict {
    #[must_use]
    pub const fn is_eligible(self) -> bool {
        matches!(self, Self::Eligible)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eligible => "eligible",
            Self::Missing => "user does not exist",
            Self::Blocked => "user is currently blocked",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EligibilityResult {
    verdicts: BTreeMap<String, EligibilityVerdict>,
}

impl EligibilityResult {
    pub(crate) const fn from_verdicts(verdicts: BTreeMap<String, EligibilityVerdict>) -> Self {
        Self { verdicts }
    }

    #[must_use]
    pub fn verdict(&self, user: &str) -> Option<EligibilityVerdict> {
        self.verdicts.get(user).copied()
    }

    #[must_use]
    pub fn is_eligible(&self, user: &str) -> bool {
        self.verdict(user).is_some_and(EligibilityVerdict::is_eligible)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, EligibilityVerdict)> {
        self.verdicts.iter().map(|(user, verdict)| (user.as_str(), *verdict))
    }

    #[must_use]
    pub fn to_flags(&self) -> BTreeMap<String, bool> {
        self.verdicts
            .iter()
            .map(|(user, verdict)| (user.clone(), verdict.is_eligible()))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}
