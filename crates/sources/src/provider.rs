//! The search backend seam.
//!
//! Everything that actually runs a query (a REST backend, an index, a test
//! double) sits behind [`SearchProvider`]. The coordinator only ever sees
//! pages of raw candidates and [`ProviderError`]s.

use async_trait::async_trait;
use data_loader::{DataLoadError, SearchPage};
use std::time::Duration;
use thiserror::Error;

/// Errors a search backend can report for one page request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed search payload: {0}")]
    MalformedPayload(String),

    #[error("Search request timed out after {0:?}")]
    Timeout(Duration),
}

impl From<DataLoadError> for ProviderError {
    fn from(err: DataLoadError) -> Self {
        ProviderError::MalformedPayload(err.to_string())
    }
}

/// A backend that answers paged search queries.
///
/// Implementations own authentication, retries and rate limiting; callers
/// only ask for `limit` records starting at `offset`.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns the name of this provider (for logging)
    fn name(&self) -> &str;

    /// Fetch one page of raw results for `query`.
    async fn fetch_page(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
    ) -> Result<SearchPage, ProviderError>;
}
