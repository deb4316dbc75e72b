use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ArchivistError, Result};

fn new_section_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Matches only at the start of the summary.
    PATTERN.get_or_init(|| {
        Regex::new(r"^/\* (.*) \*/ new section").expect("new-section pattern must compile")
    })
}

fn wikilink_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[\[(.*?)\]\]").expect("wikilink pattern must compile"))
}

#[must_use]
pub fn new_section_title(summary: &str) -> Option<&str> {
    new_section_pattern()
        .captures(summary)
        .and_then(|captures| captures.get(1))
        .map(|name| name.as_str())
}

#[must_use]
pub fn wikilink_targets(summary: &str) -> Vec<String> {
    wikilink_pattern()
        .captures_iter(summary)
        .filter_map(|captures| captures.get(1))
        .map(|inner| {
            inner
                .as_str()
                .split('|')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .filter(|target| !target.is_empty())
        .collect()
}

pub fn archive_destinations(summary: &str) -> Result<Vec<String>> {
    let targets = wikilink_targets(summary);
    if targets.is_empty() {
        return Err(ArchivistError::MissingArchiveLinks(summary.to_string()));
    }
    Ok(targets)
}
