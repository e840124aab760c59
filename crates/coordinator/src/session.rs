//! Per-query search session state.
//!
//! A session owns everything accumulated for one query: the deduplicated
//! candidate list, the page counter and the has-more flag. The coordinator
//! replaces the whole session when a new query starts.

use crate::config::HasMoreBasis;
use data_loader::{Candidate, CandidateId};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Idle,
    FetchingFirstPage,
    Ready,
    FetchingNextPage,
    Error,
}

impl SearchStatus {
    pub fn is_fetching(&self) -> bool {
        matches!(self, SearchStatus::FetchingFirstPage | SearchStatus::FetchingNextPage)
    }
}

/// Counts from the most recently applied page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStats {
    /// 1-based page number
    pub page: usize,
    pub offset: usize,
    /// Records the backend returned
    pub raw_count: usize,
    /// Records that passed validation
    pub accepted_count: usize,
    /// Accepted records that were new to the session
    pub appended_count: usize,
    pub total_results: usize,
}

/// A validated page, ready to merge into a session.
#[derive(Debug, Clone)]
pub(crate) struct ValidatedPage {
    pub accepted: Vec<Candidate>,
    pub raw_count: usize,
    pub total_results: usize,
    pub offset: usize,
    pub limit: usize,
}

/// Whether another page should be offered after one that returned
/// `raw_count` records (`accepted_count` after validation) at `offset`.
///
/// A page shorter than the limit means the backend ran out. The total is
/// checked as well so an exactly-full last page doesn't offer an empty one.
pub fn compute_has_more(
    basis: HasMoreBasis,
    limit: usize,
    offset: usize,
    raw_count: usize,
    accepted_count: usize,
    total_results: usize,
) -> bool {
    let counted = match basis {
        HasMoreBasis::FilteredCount => accepted_count,
        HasMoreBasis::RawCount => raw_count,
    };
    counted == limit && total_results > offset + counted
}

/// State for one query.
#[derive(Debug, Clone)]
pub struct SearchSession {
    pub(crate) generation: u64,
    pub(crate) query: String,
    pub(crate) accumulated: Vec<Candidate>,
    seen_ids: HashSet<CandidateId>,
    pub(crate) current_page: usize,
    pub(crate) has_more: bool,
    pub(crate) status: SearchStatus,
    pub(crate) last_page: Option<PageStats>,
    pub(crate) last_error: Option<String>,
}

impl SearchSession {
    /// A fresh session waiting on its first page.
    pub(crate) fn start(generation: u64, query: String) -> Self {
        Self {
            generation,
            query,
            accumulated: Vec::new(),
            seen_ids: HashSet::new(),
            current_page: 1,
            has_more: false,
            status: SearchStatus::FetchingFirstPage,
            last_page: None,
            last_error: None,
        }
    }

    /// Append candidates whose id hasn't been seen in this session.
    ///
    /// Returns how many were appended. Candidates without an id can't be
    /// matched against anything, so they are always kept.
    pub(crate) fn merge(&mut self, candidates: Vec<Candidate>) -> usize {
        let before = self.accumulated.len();
        for candidate in candidates {
            match &candidate.id {
                Some(id) => {
                    if !self.seen_ids.insert(id.clone()) {
                        debug!("Dropping duplicate candidate {}", id);
                        continue;
                    }
                }
                None => debug!("Keeping candidate without id: {:?}", candidate.name),
            }
            self.accumulated.push(candidate);
        }
        self.accumulated.len() - before
    }

    /// Merge the first page and become Ready.
    pub(crate) fn apply_first_page(&mut self, page: ValidatedPage, basis: HasMoreBasis) {
        self.current_page = 1;
        self.apply(page, basis);
    }

    /// Merge a follow-up page, advance the page counter and become Ready.
    pub(crate) fn apply_next_page(&mut self, page: ValidatedPage, basis: HasMoreBasis) {
        self.current_page += 1;
        self.apply(page, basis);
    }

    fn apply(&mut self, page: ValidatedPage, basis: HasMoreBasis) {
        let accepted_count = page.accepted.len();
        self.has_more = compute_has_more(
            basis,
            page.limit,
            page.offset,
            page.raw_count,
            accepted_count,
            page.total_results,
        );
        let appended_count = self.merge(page.accepted);
        self.last_page = Some(PageStats {
            page: self.current_page,
            offset: page.offset,
            raw_count: page.raw_count,
            accepted_count,
            appended_count,
            total_results: page.total_results,
        });
        self.status = SearchStatus::Ready;
        self.last_error = None;
    }

    /// First page failed: nothing to show, no more pages.
    pub(crate) fn fail_first_page(&mut self, message: String) {
        self.status = SearchStatus::Error;
        self.has_more = false;
        self.last_error = Some(message);
    }

    /// A follow-up page failed: keep what we have and allow a retry.
    pub(crate) fn fail_next_page(&mut self, message: String) {
        self.status = SearchStatus::Ready;
        self.last_error = Some(message);
    }
}
