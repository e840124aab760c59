//! In-memory candidate catalog.
//!
//! The catalog backs the in-process search source and the CLI. It keeps
//! candidates in load order and indexes them by id.

use crate::error::Result;
use crate::parser;
use crate::types::{Candidate, CandidateId};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Ordered collection of candidates with an id index.
#[derive(Debug, Clone, Default)]
pub struct CandidateCatalog {
    candidates: Vec<Candidate>,
    by_id: HashMap<CandidateId, usize>,
}

impl CandidateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from candidates, keeping their order.
    pub fn from_candidates(candidates: impl IntoIterator<Item = Candidate>) -> Self {
        let mut catalog = Self::new();
        for candidate in candidates {
            catalog.insert(candidate);
        }
        catalog
    }

    /// Load a catalog from a JSON or JSON-lines file.
    ///
    /// Records that aren't well-formed candidates are skipped with a warning;
    /// a file that can't be read or parsed at all is an error.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading candidate catalog from {}", path.display());

        let records = parser::read_records(path)?;
        let record_count = records.len();
        let candidates: Vec<Candidate> = records
            .into_iter()
            .filter_map(Candidate::from_value)
            .collect();

        let skipped = record_count - candidates.len();
        let catalog = Self::from_candidates(candidates);
        if skipped > 0 {
            warn!("Skipped {} malformed records in {}", skipped, path.display());
        }
        info!("Loaded {} candidates", catalog.len());

        Ok(catalog)
    }

    /// Insert a candidate.
    ///
    /// A candidate whose id is already present replaces the earlier entry in
    /// place, so load order is stable.
    pub fn insert(&mut self, candidate: Candidate) {
        if let Some(id) = candidate.id.clone() {
            if let Some(&idx) = self.by_id.get(&id) {
                self.candidates[idx] = candidate;
                return;
            }
            self.by_id.insert(id, self.candidates.len());
        }
        self.candidates.push(candidate);
    }

    pub fn get(&self, id: &CandidateId) -> Option<&Candidate> {
        self.by_id.get(id).map(|&idx| &self.candidates[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
