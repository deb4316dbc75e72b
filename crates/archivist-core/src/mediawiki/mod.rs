use std::collections::{BTreeMap, HashSet};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{AnchoredSection, Revision, RevisionSnapshot, TimeWindow, UserFacts};
use crate::source::{RevisionSource, UserDirectory};

mod payload;
mod replay;


pub use payload::mediawiki_timestamp;
pub use replay::{RecordedExchange, ReplayTransport};

use self::payload::{
    BlocksQuery, ParseResponse, QueryResponse, RevisionsQuery, SectionEntry, UsersQuery, decode,
};

pub const DEFAULT_MAX_CONTINUATIONS: usize = 5;
pub const USER_BATCH_LIMIT: usize = 50;

pub type ApiParams = BTreeMap<String, String>;

/// Wire access to a MediaWiki `api.php` endpoint. Implementations receive the
/// complete query string parameters and return the decoded JSON body.
pub trait ApiTransport {
    fn get(&self, params: &ApiParams) -> Result<Value>;
}

impl<T: ApiTransport + ?Sized> ApiTransport for &T {
    fn get(&self, params: &ApiParams) -> Result<Value> {
        (**self).get(params)
    }
}

#[derive(Debug, Clone)]
pub struct MediaWikiSource<T> {
    transport: T,
    max_continuations: usize,
}

impl<T: ApiTransport> MediaWikiSource<T> {
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            max_continuations: DEFAULT_MAX_CONTINUATIONS,
        }
    }

    #[must_use]
    pub fn with_max_continuations(mut self, max_continuations: usize) -> Self {
        self.max_continuations = max_continuations;
        self
    }

    fn call(&self, pairs: &[(&str, &str)]) -> Result<Value> {
        let mut params = ApiParams::new();
        params.insert("format".to_string(), "json".to_string());
        params.insert("formatversion".to_string(), "2".to_string());
        for (key, value) in pairs {
            params.insert((*key).to_string(), (*value).to_string());
        }
        self.transport.get(&params)
    }

    fn sections(&self, selector: (&str, &str)) -> Result<Vec<SectionEntry>> {
        let value = self.call(&[("action", "parse"), ("prop", "sections"), selector])?;
        let response = decode::<ParseResponse>(value, "parse sections")?;
        Ok(response.parse.sections)
    }

    fn missing_users(&self, usernames: &[String]) -> Result<HashSet<String>> {
        let mut present = HashSet::<String>::new();
        for chunk in usernames.chunks(USER_BATCH_LIMIT) {
            let joined = chunk.join("|");
            let value = self.call(&[("action", "query"), ("list", "users"), ("ususers", &joined)])?;
            let response = decode::<QueryResponse<UsersQuery>>(value, "query users")?;
            for entry in response.query.into_iter().flat_map(|query| query.users) {
                if !entry.missing {
                    present.insert(canonical_username(&entry.name));
                }
            }
        }
        Ok(usernames
            .iter()
            .filter(|name| !present.contains(&canonical_username(name)))
            .cloned()
            .collect())
    }

    fn blocked_users(&self, usernames: &[String]) -> Result<HashSet<String>> {
        let mut blocked = HashSet::<String>::new();
        for chunk in usernames.chunks(USER_BATCH_LIMIT) {
            let joined = chunk.join("|");
            let value = self.call(&[
                ("action", "query"),
                ("list", "blocks"),
                ("bkusers", &joined),
                ("bkprop", "user"),
                ("bklimit", "max"),
            ])?;
            let response = decode::<QueryResponse<BlocksQuery>>(value, "query blocks")?;
            blocked.extend(
                response
                    .query
                    .into_iter()
                    .flat_map(|query| query.blocks)
                    .filter_map(|block| block.user)
                    .map(|user| canonical_username(&user)),
            );
        }
        Ok(blocked)
    }
}

impl<T: ApiTransport> RevisionSource for MediaWikiSource<T> {
    fn snapshot(&self, _page: &str, revision_id: u64) -> Result<RevisionSnapshot> {
        let oldid = revision_id.to_string();
        let sections = self.sections(("oldid", &oldid))?;
        Ok(RevisionSnapshot::at_revision(
            revision_id,
            sections.into_iter().map(|section| section.line),
        ))
    }

    fn history(&self, page: &str, window: &TimeWindow) -> Result<Vec<Revision>> {
        let newest = mediawiki_timestamp(window.end);
        let oldest = mediawiki_timestamp(window.start);
        let mut continue_token: Option<String> = None;
        let mut pulled = 0_usize;
        let mut revisions = Vec::<Revision>::new();
        loop {
            let mut pairs = vec![
                ("action", "query"),
                ("prop", "revisions"),
                ("titles", page),
                ("rvprop", "timestamp|user|comment|ids"),
                ("rvdir", "older"),
                ("rvstart", newest.as_str()),
                ("rvend", oldest.as_str()),
                ("rvlimit", "max"),
            ];
            if let Some(token) = continue_token.as_deref() {
                pairs.push(("rvcontinue", token));
            }
            let value = self.call(&pairs)?;
            let response = decode::<QueryResponse<RevisionsQuery>>(value, "query revisions")?;
            for entry in response
                .query
                .into_iter()
                .flat_map(|query| query.pages)
                .flat_map(|page| page.revisions)
            {
                revisions.push(entry.into_revision()?);
            }

            let next = response
                .continuation
                .and_then(|continuation| continuation.rvcontinue);
            let Some(token) = next else {
                break;
            };
            if pulled >= self.max_continuations {
                warn!(
                    page,
                    pulled = pulled + 1,
                    "revision history truncated; raise the continuation limit to read further"
                );
                break;
            }
            pulled += 1;
            continue_token = Some(token);
        }
        debug!(page, revisions = revisions.len(), "loaded revision history");
        Ok(revisions)
    }

    fn sections_with_anchors(&self, page: &str) -> Result<Vec<AnchoredSection>> {
        let sections = self.sections(("page", page))?;
        Ok(sections
            .into_iter()
            .map(|section| AnchoredSection::new(section.line, section.anchor))
            .collect())
    }
}

impl<T: ApiTransport> UserDirectory for MediaWikiSource<T> {
    fn eligibility_facts(&self, usernames: &[String]) -> Result<BTreeMap<String, UserFacts>> {
        if usernames.is_empty() {
            return Ok(BTreeMap::new());
        }
        let missing = self.missing_users(usernames)?;
        let blocked = self.blocked_users(usernames)?;
        let mut facts = BTreeMap::new();
        for name in usernames {
            facts.insert(
                name.clone(),
                UserFacts {
                    missing: missing.contains(name),
                    blocked: blocked.contains(&canonical_username(name)),
                },
            );
        }
        Ok(facts)
    }
}

// The API answers with normalized names: underscores become spaces and the
// first letter is upper-cased.
fn canonical_username(raw: &str) -> String {
    let spaced = raw.trim().replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
