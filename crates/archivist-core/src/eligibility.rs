use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{EligibilityResult, EligibilityVerdict, UserFacts};
use crate::source::UserDirectory;

pub struct EligibilityPolicy<'a, D: ?Sized> {
    directory: &'a D,
}

impl<'a, D: UserDirectory + ?Sized> EligibilityPolicy<'a, D> {
    pub const fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    pub fn evaluate(&self, users: &BTreeSet<String>) -> Result<EligibilityResult> {
        if users.is_empty() {
            return Ok(EligibilityResult::default());
        }

        let usernames = users.iter().cloned().collect::<Vec<_>>();
        let facts = self.directory.eligibility_facts(&usernames)?;
        debug!(users = usernames.len(), facts = facts.len(), "fetched eligibility facts");

        let mut verdicts = BTreeMap::new();
        for user in users {
            let verdict = match facts.get(user) {
                Some(user_facts) => classify(*user_facts),
                None => {
                    warn!(user = %user, "directory returned no facts for user; treating as missing");
                    EligibilityVerdict::Missing
                }
            };
            if !verdict.is_eligible() {
                warn!(user = %user, reason = verdict.as_str(), "no notification will be sent");
            }
            verdicts.insert(user.clone(), verdict);
        }
        Ok(EligibilityResult::from_verdicts(verdicts))
    }
}

// Rules apply in order; the first that matches decides. Edit count, user
// groups and opt-out templates are not consulted yet.
#[must_use]
pub const fn classify(facts: UserFacts) -> EligibilityVerdict {
    if facts.missing {
        return EligibilityVerdict::Missing;
    }
    if facts.blocked {
        return EligibilityVerdict::Blocked;
    }
    EligibilityVerdict::Eligible
}
