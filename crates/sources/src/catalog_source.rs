//! Catalog Source - in-process search over a candidate catalog
//!
//! Answers queries from a [`CandidateCatalog`] held in memory. Used by the
//! CLI and as a realistic backend in tests.
//!
//! ## Algorithm
//! 1. Split the query into lower-cased terms
//! 2. A candidate matches if every term appears in at least one of its
//!    searchable fields (name, title, bio, skills, organization, company)
//! 3. Rank exact name matches first, then by number of fields that matched
//!    any term; ties keep catalog order
//! 4. Slice out the requested page; `total_results` is the match count

use crate::provider::{ProviderError, SearchProvider};
use async_trait::async_trait;
use data_loader::{Candidate, CandidateCatalog, SearchPage};
use rayon::prelude::*;
use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Relevance of one matching candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Relevance {
    exact_name: bool,
    fields_matched: usize,
}

/// Search source backed by an in-memory catalog.
#[derive(Clone)]
pub struct CatalogSource {
    /// Shared reference to the catalog (read-only, so no Mutex needed)
    catalog: Arc<CandidateCatalog>,

    /// Simulated backend latency per page
    latency: Option<Duration>,
}

impl CatalogSource {
    pub fn new(catalog: Arc<CandidateCatalog>) -> Self {
        Self {
            catalog,
            latency: None,
        }
    }

    /// Delay every page by `latency` (default: none)
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// All matching candidates, best first.
    pub fn search(&self, query: &str) -> Vec<&Candidate> {
        let query_lower = query.trim().to_lowercase();
        let terms: Vec<&str> = query_lower.split_whitespace().collect();

        let mut matches: Vec<(usize, Relevance)> = self
            .catalog
            .as_slice()
            .par_iter()
            .enumerate()
            .filter_map(|(idx, candidate)| {
                relevance(candidate, &query_lower, &terms).map(|r| (idx, r))
            })
            .collect();

        matches.sort_by_key(|&(idx, relevance)| (Reverse(relevance), idx));

        let slice = self.catalog.as_slice();
        matches.into_iter().map(|(idx, _)| &slice[idx]).collect()
    }
}

/// Score a candidate against the query; `None` if it doesn't match.
fn relevance(candidate: &Candidate, query_lower: &str, terms: &[&str]) -> Option<Relevance> {
    let fields: Vec<String> = searchable_fields(candidate)
        .map(|f| f.to_lowercase())
        .collect();

    let all_terms_found = terms
        .iter()
        .all(|term| fields.iter().any(|field| field.contains(term)));
    if !all_terms_found {
        return None;
    }

    let exact_name = candidate
        .display_name()
        .is_some_and(|name| name.to_lowercase() == query_lower);
    let fields_matched = fields
        .iter()
        .filter(|field| terms.iter().any(|term| field.contains(term)))
        .count();

    Some(Relevance {
        exact_name,
        fields_matched,
    })
}

fn searchable_fields(candidate: &Candidate) -> impl Iterator<Item = &str> {
    [
        &candidate.name,
        &candidate.title,
        &candidate.bio,
        &candidate.organization,
        &candidate.company,
    ]
    .into_iter()
    .filter_map(|f| f.as_deref())
    .chain(candidate.skills.iter().flatten().map(String::as_str))
}

#[async_trait]
impl SearchProvider for CatalogSource {
    fn name(&self) -> &str {
        "CatalogSource"
    }

    #[instrument(skip(self), fields(catalog_size = self.catalog.len()))]
    async fn fetch_page(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<SearchPage, ProviderError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let matches = self.search(query);
        let total_results = matches.len();
        let candidates: Vec<Candidate> = matches
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        debug!(
            "Catalog search matched {} candidates, returning {} from offset {}",
            total_results,
            candidates.len(),
            offset
        );

        Ok(SearchPage::new(candidates, total_results, offset, limit))
    }
}
