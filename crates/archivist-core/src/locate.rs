use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ArchivistError, Result};
use crate::models::{
    AnchoredSection, ArchiveLink, LocateFailureKind, UnresolvedLink, normalize_title,
};

pub const MAX_FETCH_PARALLELISM: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocateOutcome {
    pub links: Vec<Option<ArchiveLink>>,
    pub unresolved: Vec<UnresolvedLink>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveLocator {
    parallelism: usize,
}

impl Default for ArchiveLocator {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ArchiveLocator {
    #[must_use]
    pub fn new(parallelism: usize) -> Self {
        Self {
            parallelism: parallelism.clamp(1, MAX_FETCH_PARALLELISM),
        }
    }

    #[must_use]
    pub const fn parallelism(&self) -> usize {
        self.parallelism
    }

    pub fn locate<F>(
        &self,
        destination_candidates: &[String],
        titles: &[String],
        sections_of: F,
    ) -> Result<LocateOutcome>
    where
        F: Fn(&str) -> Result<Vec<AnchoredSection>> + Sync,
    {
        if titles.is_empty() {
            return Ok(LocateOutcome::default());
        }

        let pages = distinct_pages(destination_candidates);
        let contents = fetch_sections(&pages, self.parallelism, &sections_of)?;
        debug!(pages = pages.len(), titles = titles.len(), "searching archive pages");

        let mut outcome = LocateOutcome {
            links: Vec::with_capacity(titles.len()),
            unresolved: Vec::new(),
        };
        for title in titles {
            let key = normalize_title(title);
            let mut matches = Vec::<ArchiveLink>::new();
            for (page, sections) in pages.iter().zip(&contents) {
                matches.extend(
                    sections
                        .iter()
                        .filter(|section| normalize_title(&section.title) == key)
                        .map(|section| ArchiveLink::new(*page, section.anchor.clone())),
                );
            }

            if matches.len() == 1 {
                outcome.links.push(matches.pop());
                continue;
            }

            let kind = if matches.is_empty() {
                warn!(title = key, candidates = ?destination_candidates, "no archived thread found in the links");
                LocateFailureKind::NotFound
            } else {
                warn!(
                    title = key,
                    match_count = matches.len(),
                    candidates = ?destination_candidates,
                    "multiple archived threads found in the links"
                );
                LocateFailureKind::Ambiguous
            };
            outcome.links.push(None);
            outcome.unresolved.push(UnresolvedLink {
                title: key.to_string(),
                kind,
                matches,
                candidates: destination_candidates.to_vec(),
            });
        }
        Ok(outcome)
    }
}

fn distinct_pages(destination_candidates: &[String]) -> Vec<&str> {
    let mut seen = HashSet::<&str>::new();
    destination_candidates
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty() && seen.insert(*page))
        .collect()
}

fn fetch_sections<F>(
    pages: &[&str],
    parallelism: usize,
    sections_of: &F,
) -> Result<Vec<Vec<AnchoredSection>>>
where
    F: Fn(&str) -> Result<Vec<AnchoredSection>> + Sync,
{
    if parallelism <= 1 || pages.len() <= 1 {
        return pages.iter().map(|page| sections_of(page)).collect();
    }

    let indexed = pages.iter().copied().enumerate().collect::<Vec<_>>();
    let mut fetched = Vec::<(usize, Vec<AnchoredSection>)>::with_capacity(pages.len());
    for batch in indexed.chunks(parallelism) {
        let mut batch_results = std::thread::scope(|scope| {
            let handles = batch
                .iter()
                .map(|&(index, page)| scope.spawn(move || (index, sections_of(page))))
                .collect::<Vec<_>>();

            let mut out = Vec::with_capacity(handles.len());
            for handle in handles {
                let (index, sections) = handle.join().map_err(|_| {
                    ArchivistError::Internal("archive section fetch worker panicked".to_string())
                })?;
                out.push((index, sections?));
            }
            Ok::<Vec<(usize, Vec<AnchoredSection>)>, ArchivistError>(out)
        })?;
        fetched.append(&mut batch_results);
    }

    fetched.sort_by_key(|(index, _)| *index);
    Ok(fetched.into_iter().map(|(_, sections)| sections).collect())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    struct FakeArchives {
        pages: HashMap<String, Vec<AnchoredSection>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeArchives {
        fn new(pages: &[(&str, &[(&str, &str)])]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(page, sections)| {
                        (
                            (*page).to_string(),
                            sections
                                .iter()
                                .map(|(title, anchor)| AnchoredSection::new(*title, *anchor))
                                .collect(),
                        )
                    })
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn sections(&self, page: &str) -> Result<Vec<AnchoredSection>> {
            self.calls.lock().expect("calls lock").push(page.to_string());
            self.pages
                .get(page)
                .cloned()
                .ok_or_else(|| ArchivistError::Collaborator(format!("page not found: {page}")))
        }

        fn calls(&self) -> Vec<String> {
            let mut calls = self.calls.lock().expect("calls lock").clone();
            calls.sort();
            calls
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn locate_resolves_title_found_in_one_candidate() {
        let archives = FakeArchives::new(&[
            ("ArchiveA", &[("Y", "Y_anchor")]),
            ("ArchiveB", &[("X", "X_anchor")]),
        ]);
        let outcome = ArchiveLocator::default()
            .locate(&strings(&["ArchiveA", "ArchiveB"]), &strings(&["X"]), |page| {
                archives.sections(page)
            })
            .expect("locate");
        assert_eq!(
            outcome.links,
            vec![Some(ArchiveLink::new("ArchiveB", "X_anchor"))]
        );
        assert_eq!(outcome.links[0].as_ref().map(ToString::to_string).as_deref(), Some("ArchiveB#X_anchor"));
        assert!(outcome.unresolved.is_empty());
    }

    #[test]
    fn locate_refuses_title_found_in_several_candidates() {
        let archives = FakeArchives::new(&[
            ("ArchiveA", &[("X", "X_a")]),
            ("ArchiveB", &[("X", "X_b")]),
        ]);
        let outcome = ArchiveLocator::default()
            .locate(&strings(&["ArchiveA", "ArchiveB"]), &strings(&["X"]), |page| {
                archives.sections(page)
            })
            .expect("locate");
        assert_eq!(outcome.links, vec![None]);
        let unresolved = &outcome.unresolved[0];
        assert_eq!(unresolved.kind, LocateFailureKind::Ambiguous);
        assert_eq!(
            unresolved.matches,
            vec![ArchiveLink::new("ArchiveA", "X_a"), ArchiveLink::new("ArchiveB", "X_b")]
        );
        assert_eq!(unresolved.candidates, strings(&["ArchiveA", "ArchiveB"]));
    }

    #[test]
    fn locate_refuses_duplicate_section_within_one_page() {
        let archives = FakeArchives::new(&[("ArchiveA", &[("X", "X"), ("X", "X_2")])]);
        let outcome = ArchiveLocator::default()
            .locate(&strings(&["ArchiveA"]), &strings(&["X"]), |page| archives.sections(page))
            .expect("locate");
        assert_eq!(outcome.unresolved[0].kind, LocateFailureKind::Ambiguous);
    }

    #[test]
    fn locate_reports_missing_title() {
        let archives = FakeArchives::new(&[("ArchiveA", &[("Y", "Y")])]);
        let outcome = ArchiveLocator::default()
            .locate(&strings(&["ArchiveA"]), &strings(&["Y", "Z"]), |page| {
                archives.sections(page)
            })
            .expect("locate");
        assert_eq!(
            outcome.links,
            vec![Some(ArchiveLink::new("ArchiveA", "Y")), None]
        );
        assert_eq!(outcome.unresolved[0].title, "Z");
        assert_eq!(outcome.unresolved[0].kind, LocateFailureKind::NotFound);
        assert!(outcome.unresolved[0].matches.is_empty());
    }

    #[test]
    fn locate_fetches_each_candidate_once() {
        let archives = FakeArchives::new(&[
            ("ArchiveA", &[("X", "X")]),
            ("ArchiveB", &[("Y", "Y")]),
        ]);
        let outcome = ArchiveLocator::new(4)
            .locate(
                &strings(&["ArchiveA", "ArchiveB", "ArchiveA"]),
                &strings(&["X", "Y"]),
                |page| archives.sections(page),
            )
            .expect("locate");
        assert_eq!(
            outcome.links,
            vec![
                Some(ArchiveLink::new("ArchiveA", "X")),
                Some(ArchiveLink::new("ArchiveB", "Y")),
            ]
        );
        assert_eq!(archives.calls(), strings(&["ArchiveA", "ArchiveB"]));
    }

    #[test]
    fn locate_parallel_fetch_keeps_candidate_order() {
        let pages = (0..12)
            .map(|index| format!("Archive {index}"))
            .collect::<Vec<_>>();
        let locate = |parallelism: usize| {
            ArchiveLocator::new(parallelism)
                .locate(&pages, &strings(&["Shared"]), |page| {
                    Ok(vec![AnchoredSection::new("Shared", format!("{page}-anchor"))])
                })
                .expect("locate")
        };
        let sequential = locate(1);
        let parallel = locate(5);
        assert_eq!(sequential, parallel);
        assert_eq!(parallel.unresolved[0].matches.len(), 12);
        assert_eq!(parallel.unresolved[0].matches[0].page, "Archive 0");
        assert_eq!(parallel.unresolved[0].matches[11].page, "Archive 11");
    }

    #[test]
    fn locate_propagates_fetch_failure() {
        let archives = FakeArchives::new(&[("ArchiveA", &[("X", "X")])]);
        let err = ArchiveLocator::new(2)
            .locate(&strings(&["ArchiveA", "Gone"]), &strings(&["X"]), |page| {
                archives.sections(page)
            })
            .expect_err("missing page must fail");
        assert_eq!(err.code(), "COLLABORATOR_FAILED");
    }

    #[test]
    fn locate_without_titles_fetches_nothing() {
        let archives = FakeArchives::new(&[("ArchiveA", &[])]);
        let outcome = ArchiveLocator::default()
            .locate(&strings(&["ArchiveA"]), &[], |page| archives.sections(page))
            .expect("locate");
        assert!(outcome.links.is_empty());
        assert!(archives.calls().is_empty());
    }
}
