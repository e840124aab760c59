//! # Paginated Search Coordinator
//!
//! Drives one search session at a time:
//! 1. `start_search` resets the session and fetches page 1
//! 2. Each page is validated, deduplicated by id and appended
//! 3. `has_more` is recomputed after every page
//! 4. `load_more` fetches the next page while `has_more` holds
//!
//! ## Concurrency
//!
//! The session status doubles as a single-flight latch: while a page is in
//! flight, further `load_more` calls (and repeated `start_search` calls for
//! the same query) are ignored rather than queued. A new query supersedes
//! whatever is in flight; every session carries a generation number and a
//! response is applied only if its generation is still current.
//!
//! The state lock is never held across an await. Provider calls run
//! outside it and re-acquire it to apply their result.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use data_loader::{Candidate, SearchPage};
use pipeline::ResultValidator;
use sources::{ProviderError, SearchProvider};

use crate::config::CoordinatorConfig;
use crate::session::{PageStats, SearchSession, SearchStatus, ValidatedPage};

/// What a `start_search` or `load_more` call ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A page was fetched and merged into the session
    Applied,
    /// The call was a no-op (empty query, nothing more to load, or a fetch
    /// already in flight)
    Ignored,
    /// The page arrived after a newer search or a reset and was dropped
    Superseded,
    /// The provider call failed or timed out; see `last_error`
    Failed,
}

/// Point-in-time view of the coordinator, published on every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnapshot {
    pub status: SearchStatus,
    pub query: Option<String>,
    pub accumulated: Vec<Candidate>,
    pub has_more: bool,
    pub current_page: usize,
    pub last_page: Option<PageStats>,
    pub last_error: Option<String>,
}

impl SearchSnapshot {
    pub fn idle() -> Self {
        Self {
            status: SearchStatus::Idle,
            query: None,
            accumulated: Vec::new(),
            has_more: false,
            current_page: 1,
            last_page: None,
            last_error: None,
        }
    }

    fn of(session: &SearchSession) -> Self {
        Self {
            status: session.status,
            query: Some(session.query.clone()),
            accumulated: session.accumulated.clone(),
            has_more: session.has_more,
            current_page: session.current_page,
            last_page: session.last_page,
            last_error: session.last_error.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    next_generation: u64,
    session: Option<SearchSession>,
}

impl Inner {
    /// The session, if it still belongs to `generation`.
    fn session_for(&mut self, generation: u64) -> Option<&mut SearchSession> {
        self.session
            .as_mut()
            .filter(|session| session.generation == generation)
    }
}

#[derive(Debug, Clone, Copy)]
enum FetchKind {
    FirstPage,
    NextPage,
}

/// Coordinates paged searches against a [`SearchProvider`], validating
/// every page with a [`ResultValidator`].
pub struct PaginatedSearchCoordinator {
    provider: Arc<dyn SearchProvider>,
    validator: Arc<ResultValidator>,
    config: CoordinatorConfig,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<SearchSnapshot>,
}

impl PaginatedSearchCoordinator {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        validator: Arc<ResultValidator>,
        config: CoordinatorConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(SearchSnapshot::idle());
        Self {
            provider,
            validator,
            config,
            inner: Mutex::new(Inner::default()),
            state_tx,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Current state.
    pub fn state(&self) -> SearchSnapshot {
        self.state_tx.borrow().clone()
    }

    /// Receive a snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.state_tx.subscribe()
    }

    /// Start a new search for `query` and fetch its first page.
    ///
    /// Blank queries are ignored. Re-submitting the query whose first page
    /// is already in flight is ignored; any other query replaces the current
    /// session.
    pub async fn start_search(&self, query: &str) -> FetchOutcome {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring blank search query");
            return FetchOutcome::Ignored;
        }

        let generation = {
            let mut inner = self.lock_inner();
            if let Some(session) = &inner.session {
                if session.status == SearchStatus::FetchingFirstPage && session.query == query {
                    debug!("First page for '{}' already in flight", query);
                    return FetchOutcome::Ignored;
                }
                if session.status.is_fetching() {
                    info!("Superseding in-flight search for '{}'", session.query);
                }
            }

            inner.next_generation += 1;
            let generation = inner.next_generation;
            inner.session = Some(SearchSession::start(generation, query.to_string()));
            self.publish(&inner);
            generation
        };
        info!("Starting search for '{}' (generation {})", query, generation);

        let mut in_flight = InFlight::new(self, generation, FetchKind::FirstPage);
        let result = self.fetch_validated(query, 0).await;
        in_flight.disarm();

        let mut inner = self.lock_inner();
        let Some(session) = inner.session_for(generation) else {
            debug!("Discarding first page for superseded search '{}'", query);
            return FetchOutcome::Superseded;
        };

        let outcome = match result {
            Ok(page) => {
                session.apply_first_page(page, self.config.has_more_basis);
                info!(
                    "Search '{}' ready with {} experts (has_more: {})",
                    query,
                    session.accumulated.len(),
                    session.has_more
                );
                FetchOutcome::Applied
            }
            Err(err) => {
                warn!("First page for '{}' failed: {}", query, err);
                session.fail_first_page(err.to_string());
                FetchOutcome::Failed
            }
        };
        self.publish(&inner);
        outcome
    }

    /// Fetch and append the next page.
    ///
    /// Only acts when the session is `Ready` with `has_more` set; otherwise
    /// (including while another page is in flight) it is a no-op.
    pub async fn load_more(&self) -> FetchOutcome {
        let (generation, query, offset) = {
            let mut inner = self.lock_inner();
            let Some(session) = inner.session.as_mut() else {
                debug!("load_more with no active search");
                return FetchOutcome::Ignored;
            };
            if session.status != SearchStatus::Ready || !session.has_more {
                debug!(
                    "Ignoring load_more (status: {:?}, has_more: {})",
                    session.status, session.has_more
                );
                return FetchOutcome::Ignored;
            }

            session.status = SearchStatus::FetchingNextPage;
            let request = (
                session.generation,
                session.query.clone(),
                session.current_page * self.config.page_size,
            );
            self.publish(&inner);
            request
        };
        debug!("Loading more for '{}' from offset {}", query, offset);

        let mut in_flight = InFlight::new(self, generation, FetchKind::NextPage);
        let result = self.fetch_validated(&query, offset).await;
        in_flight.disarm();

        let mut inner = self.lock_inner();
        let Some(session) = inner.session_for(generation) else {
            debug!("Discarding page at offset {} for superseded search '{}'", offset, query);
            return FetchOutcome::Superseded;
        };

        let outcome = match result {
            Ok(page) => {
                let before = session.accumulated.len();
                session.apply_next_page(page, self.config.has_more_basis);
                info!(
                    "Loaded page {} for '{}': {} new experts, {} total (has_more: {})",
                    session.current_page,
                    query,
                    session.accumulated.len() - before,
                    session.accumulated.len(),
                    session.has_more
                );
                FetchOutcome::Applied
            }
            Err(err) => {
                warn!("Page at offset {} for '{}' failed: {}", offset, query, err);
                session.fail_next_page(err.to_string());
                FetchOutcome::Failed
            }
        };
        self.publish(&inner);
        outcome
    }

    /// Drop the current session and return to `Idle`. Any page still in
    /// flight will be discarded when it arrives.
    pub fn reset(&self) {
        let mut inner = self.lock_inner();
        inner.next_generation += 1;
        if let Some(session) = inner.session.take() {
            info!("Reset search '{}'", session.query);
        }
        self.publish(&inner);
    }

    /// Run [`start_search`](Self::start_search) on the tokio runtime.
    pub fn spawn_start_search(self: &Arc<Self>, query: impl Into<String>) -> JoinHandle<FetchOutcome> {
        let this = Arc::clone(self);
        let query = query.into();
        tokio::spawn(async move { this.start_search(&query).await })
    }

    /// Run [`load_more`](Self::load_more) on the tokio runtime.
    pub fn spawn_load_more(self: &Arc<Self>) -> JoinHandle<FetchOutcome> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.load_more().await })
    }

    /// Fetch one page with the configured timeout and validate it.
    async fn fetch_validated(&self, query: &str, offset: usize) -> Result<ValidatedPage, ProviderError> {
        let limit = self.config.page_size;
        let timeout = self.config.fetch_timeout();

        let page: SearchPage =
            match tokio::time::timeout(timeout, self.provider.fetch_page(query, offset, limit)).await {
                Ok(result) => result?,
                Err(_) => return Err(ProviderError::Timeout(timeout)),
            };

        let raw_count = page.len();
        let total_results = page.total_results;
        let accepted = self.validator.filter_candidates(page.candidates);
        debug!(
            "{} returned {} of {} results at offset {}, {} passed validation",
            self.provider.name(),
            raw_count,
            total_results,
            offset,
            accepted.len()
        );

        Ok(ValidatedPage {
            accepted,
            raw_count,
            total_results,
            offset,
            limit,
        })
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner) {
        let snapshot = match &inner.session {
            Some(session) => SearchSnapshot::of(session),
            None => SearchSnapshot::idle(),
        };
        self.state_tx.send_replace(snapshot);
    }
}

/// Releases the single-flight latch if a fetch future is dropped before it
/// completes.
struct InFlight<'a> {
    coordinator: &'a PaginatedSearchCoordinator,
    generation: u64,
    kind: FetchKind,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(coordinator: &'a PaginatedSearchCoordinator, generation: u64, kind: FetchKind) -> Self {
        Self {
            coordinator,
            generation,
            kind,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let mut inner = self.coordinator.lock_inner();
        let Some(session) = inner.session_for(self.generation) else {
            return;
        };
        match self.kind {
            FetchKind::FirstPage if session.status == SearchStatus::FetchingFirstPage => {
                warn!("First page fetch for '{}' was cancelled", session.query);
                session.fail_first_page("search cancelled".to_string());
            }
            FetchKind::NextPage if session.status == SearchStatus::FetchingNextPage => {
                warn!("Next page fetch for '{}' was cancelled", session.query);
                session.fail_next_page("load more cancelled".to_string());
            }
            _ => return,
        }
        self.coordinator.publish(&inner);
    }
}

impl std::fmt::Debug for PaginatedSearchCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedSearchCoordinator")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HasMoreBasis;
    use async_trait::async_trait;
    use data_loader::CandidateId;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    // ============================================================================
    // Test fixtures
    // ============================================================================

    fn expert(id: u64) -> Candidate {
        Candidate::new(id, format!("Expert Number{}", id))
            .with_title("Negotiation Advisor")
            .with_email(format!("expert{}@example.com", id))
    }

    /// Fails validation: course-style title, no signals.
    fn course(id: u64) -> Candidate {
        Candidate::new(id, "Negotiation Masterclass").with_title("Online Course")
    }

    /// Serves pages out of a fixed list of raw records, like a real backend.
    struct ScriptedProvider {
        records: Vec<Candidate>,
        /// Reported total; defaults to the record count
        total: Option<usize>,
        calls: Mutex<Vec<(String, usize, usize)>>,
        /// Offsets that fail once with a network error
        fail_once_at: Mutex<HashSet<usize>>,
        /// Offset whose first request waits for `release`
        gate_offset: Option<usize>,
        gate_used: AtomicBool,
        gate: Notify,
        delay: Option<Duration>,
    }

    impl ScriptedProvider {
        fn new(records: Vec<Candidate>) -> Self {
            Self {
                records,
                total: None,
                calls: Mutex::new(Vec::new()),
                fail_once_at: Mutex::new(HashSet::new()),
                gate_offset: None,
                gate_used: AtomicBool::new(false),
                gate: Notify::new(),
                delay: None,
            }
        }

        fn with_total(mut self, total: usize) -> Self {
            self.total = Some(total);
            self
        }

        fn failing_once_at(self, offset: usize) -> Self {
            self.fail_once_at.lock().unwrap().insert(offset);
            self
        }

        fn gated_at(mut self, offset: usize) -> Self {
            self.gate_offset = Some(offset);
            self
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn release(&self) {
            self.gate.notify_one();
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn offsets(&self) -> Vec<usize> {
            self.calls.lock().unwrap().iter().map(|c| c.1).collect()
        }
    }

    #[async_trait]
    impl SearchProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "ScriptedProvider"
        }

        async fn fetch_page(
            &self,
            query: &str,
            offset: usize,
            limit: usize,
        ) -> Result<SearchPage, ProviderError> {
            self.calls.lock().unwrap().push((query.to_string(), offset, limit));

            if self.gate_offset == Some(offset) && !self.gate_used.swap(true, Ordering::SeqCst) {
                self.gate.notified().await;
            }
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_once_at.lock().unwrap().remove(&offset) {
                return Err(ProviderError::Network("connection reset".to_string()));
            }

            let page: Vec<Candidate> = self.records.iter().skip(offset).take(limit).cloned().collect();
            let total = self.total.unwrap_or(self.records.len());
            Ok(SearchPage::new(page, total, offset, limit))
        }
    }

    /// Answers per query; the "slow" query waits on a gate.
    struct PerQueryProvider {
        gate: Notify,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SearchProvider for PerQueryProvider {
        fn name(&self) -> &str {
            "PerQueryProvider"
        }

        async fn fetch_page(
            &self,
            query: &str,
            offset: usize,
            limit: usize,
        ) -> Result<SearchPage, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let base = if query == "slow" {
                self.gate.notified().await;
                100
            } else {
                200
            };
            let page: Vec<Candidate> = (0..limit as u64).map(|i| expert(base + i)).collect();
            Ok(SearchPage::new(page, 50, offset, limit))
        }
    }

    fn coordinator_with(provider: Arc<dyn SearchProvider>, config: CoordinatorConfig) -> Arc<PaginatedSearchCoordinator> {
        Arc::new(PaginatedSearchCoordinator::new(
            provider,
            Arc::new(ResultValidator::standard()),
            config,
        ))
    }

    fn ids(snapshot: &SearchSnapshot) -> Vec<CandidateId> {
        snapshot
            .accumulated
            .iter()
            .map(|c| c.id.clone().unwrap())
            .collect()
    }

    fn experts(range: std::ops::Range<u64>) -> Vec<Candidate> {
        range.map(expert).collect()
    }

    // ============================================================================
    // start_search
    // ============================================================================

    #[tokio::test]
    async fn test_blank_query_is_ignored() {
        let provider = Arc::new(ScriptedProvider::new(experts(0..5)));
        let coordinator = coordinator_with(provider.clone(), CoordinatorConfig::default());

        assert_eq!(coordinator.start_search("   ").await, FetchOutcome::Ignored);
        assert_eq!(coordinator.state(), SearchSnapshot::idle());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_first_page_is_validated_and_ready() {
        let mut records = experts(0..10);
        records[3] = course(3);
        let provider = Arc::new(ScriptedProvider::new(records).with_total(25));
        let coordinator = coordinator_with(provider.clone(), CoordinatorConfig::default());

        assert_eq!(coordinator.start_search("  negotiation ").await, FetchOutcome::Applied);

        let state = coordinator.state();
        assert_eq!(state.status, SearchStatus::Ready);
        assert_eq!(state.query.as_deref(), Some("negotiation"));
        assert_eq!(state.current_page, 1);
        assert_eq!(state.accumulated.len(), 9);
        assert!(!ids(&state).contains(&CandidateId::from(3u64)));

        let stats = state.last_page.unwrap();
        assert_eq!(stats.raw_count, 10);
        assert_eq!(stats.accepted_count, 9);
        assert_eq!(stats.total_results, 25);
        assert_eq!(provider.calls.lock().unwrap()[0], ("negotiation".to_string(), 0, 10));
    }

    #[tokio::test]
    async fn test_short_filtered_page_stops_pagination() {
        // 10 raw, 6 pass validation, backend reports 25
        let records: Vec<Candidate> = (0..10u64)
            .map(|i| if i < 6 { expert(i) } else { course(i) })
            .collect();
        let provider = Arc::new(ScriptedProvider::new(records).with_total(25));
        let coordinator = coordinator_with(provider.clone(), CoordinatorConfig::default());

        coordinator.start_search("ai expert").await;
        let state = coordinator.state();
        assert_eq!(state.accumulated.len(), 6);
        assert!(!state.has_more);

        assert_eq!(coordinator.load_more().await, FetchOutcome::Ignored);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_raw_count_basis_keeps_paginating() {
        let records: Vec<Candidate> = (0..20u64)
            .map(|i| if i % 2 == 0 { expert(i) } else { course(i) })
            .collect();
        let provider = Arc::new(ScriptedProvider::new(records).with_total(25));
        let config = CoordinatorConfig::default().with_has_more_basis(HasMoreBasis::RawCount);
        let coordinator = coordinator_with(provider.clone(), config);

        coordinator.start_search("ai expert").await;
        assert!(coordinator.state().has_more);

        assert_eq!(coordinator.load_more().await, FetchOutcome::Applied);
        let state = coordinator.state();
        assert_eq!(state.accumulated.len(), 10);
        assert_eq!(state.current_page, 2);
        assert_eq!(provider.offsets(), vec![0, 10]);
    }

    #[tokio::test]
    async fn test_first_page_failure_sets_error() {
        let provider = Arc::new(ScriptedProvider::new(experts(0..10)).failing_once_at(0));
        let coordinator = coordinator_with(provider.clone(), CoordinatorConfig::default());

        assert_eq!(coordinator.start_search("mediation").await, FetchOutcome::Failed);
        let state = coordinator.state();
        assert_eq!(state.status, SearchStatus::Error);
        assert!(state.accumulated.is_empty());
        assert!(!state.has_more);
        assert!(state.last_error.unwrap().contains("connection reset"));

        // Error is sticky for load_more; resubmitting the query retries.
        assert_eq!(coordinator.load_more().await, FetchOutcome::Ignored);
        assert_eq!(coordinator.start_search("mediation").await, FetchOutcome::Applied);
        assert_eq!(coordinator.state().status, SearchStatus::Ready);
        assert_eq!(coordinator.state().last_error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        let provider = Arc::new(ScriptedProvider::new(experts(0..10)).with_delay(Duration::from_secs(60)));
        let config = CoordinatorConfig::default().with_fetch_timeout(Duration::from_millis(500));
        let coordinator = coordinator_with(provider, config);

        assert_eq!(coordinator.start_search("mediation").await, FetchOutcome::Failed);
        let state = coordinator.state();
        assert_eq!(state.status, SearchStatus::Error);
        assert!(state.last_error.unwrap().contains("timed out"));
    }

    // ============================================================================
    // load_more
    // ============================================================================

    #[tokio::test]
    async fn test_load_more_appends_without_duplicates() {
        // Page 2 repeats ids 8 and 9 from page 1 plus an in-page duplicate.
        let mut records = experts(0..10);
        records.extend([expert(8), expert(9), expert(10), expert(10)]);
        records.extend(experts(11..17));
        let provider = Arc::new(ScriptedProvider::new(records).with_total(40));
        let coordinator = coordinator_with(provider, CoordinatorConfig::default());

        coordinator.start_search("mediation").await;
        let before = coordinator.state().accumulated.len();
        assert_eq!(coordinator.load_more().await, FetchOutcome::Applied);

        let state = coordinator.state();
        let all = ids(&state);
        let unique: HashSet<_> = all.iter().cloned().collect();
        assert_eq!(all.len(), unique.len());
        assert!(state.accumulated.len() >= before);
        assert_eq!(all, (0..17u64).map(CandidateId::from).collect::<Vec<_>>());
        assert_eq!(state.last_page.unwrap().appended_count, 7);
    }

    #[tokio::test]
    async fn test_accumulation_is_monotonic_until_exhausted() {
        let provider = Arc::new(ScriptedProvider::new(experts(0..35)));
        let coordinator = coordinator_with(provider.clone(), CoordinatorConfig::default());

        coordinator.start_search("mediation").await;
        let mut lengths = vec![coordinator.state().accumulated.len()];
        while coordinator.state().has_more {
            assert_eq!(coordinator.load_more().await, FetchOutcome::Applied);
            lengths.push(coordinator.state().accumulated.len());
        }

        assert_eq!(lengths, vec![10, 20, 30, 35]);
        assert_eq!(provider.offsets(), vec![0, 10, 20, 30]);
        assert_eq!(coordinator.state().current_page, 4);
        assert_eq!(coordinator.load_more().await, FetchOutcome::Ignored);
    }

    #[tokio::test]
    async fn test_load_more_failure_keeps_results_and_allows_retry() {
        let provider = Arc::new(ScriptedProvider::new(experts(0..30)).failing_once_at(10));
        let coordinator = coordinator_with(provider.clone(), CoordinatorConfig::default());

        coordinator.start_search("mediation").await;
        assert_eq!(coordinator.load_more().await, FetchOutcome::Failed);

        let state = coordinator.state();
        assert_eq!(state.status, SearchStatus::Ready);
        assert!(state.has_more);
        assert_eq!(state.accumulated.len(), 10);
        assert_eq!(state.current_page, 1);
        assert!(state.last_error.is_some());

        assert_eq!(coordinator.load_more().await, FetchOutcome::Applied);
        assert_eq!(coordinator.state().accumulated.len(), 20);
        assert_eq!(provider.offsets(), vec![0, 10, 10]);
    }

    #[tokio::test]
    async fn test_concurrent_load_more_is_single_flight() {
        let provider = Arc::new(ScriptedProvider::new(experts(0..30)).gated_at(10));
        let coordinator = coordinator_with(provider.clone(), CoordinatorConfig::default());
        coordinator.start_search("mediation").await;

        let mut rx = coordinator.subscribe();
        let first = coordinator.spawn_load_more();
        rx.wait_for(|s| s.status == SearchStatus::FetchingNextPage)
            .await
            .unwrap();

        assert_eq!(coordinator.load_more().await, FetchOutcome::Ignored);
        assert_eq!(coordinator.load_more().await, FetchOutcome::Ignored);

        provider.release();
        assert_eq!(first.await.unwrap(), FetchOutcome::Applied);
        assert_eq!(provider.offsets(), vec![0, 10]);
        assert_eq!(coordinator.state().accumulated.len(), 20);
    }

    #[tokio::test]
    async fn test_cancelled_load_more_releases_latch() {
        let provider = Arc::new(ScriptedProvider::new(experts(0..30)).gated_at(10));
        let coordinator = coordinator_with(provider.clone(), CoordinatorConfig::default());
        coordinator.start_search("mediation").await;

        let cancelled = tokio::time::timeout(Duration::from_millis(20), coordinator.load_more()).await;
        assert!(cancelled.is_err());

        let state = coordinator.state();
        assert_eq!(state.status, SearchStatus::Ready);
        assert!(state.has_more);
        assert_eq!(state.accumulated.len(), 10);

        // Gate is spent; the retry goes straight through.
        assert_eq!(coordinator.load_more().await, FetchOutcome::Applied);
        assert_eq!(coordinator.state().accumulated.len(), 20);
    }

    // ============================================================================
    // Superseding and reset
    // ============================================================================

    #[tokio::test]
    async fn test_new_query_supersedes_in_flight_search() {
        let provider = Arc::new(PerQueryProvider {
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        });
        let coordinator = coordinator_with(provider.clone(), CoordinatorConfig::default());

        let mut rx = coordinator.subscribe();
        let stale = coordinator.spawn_start_search("slow");
        rx.wait_for(|s| s.query.as_deref() == Some("slow") && s.status == SearchStatus::FetchingFirstPage)
            .await
            .unwrap();

        assert_eq!(coordinator.start_search("fast").await, FetchOutcome::Applied);
        provider.gate.notify_one();
        assert_eq!(stale.await.unwrap(), FetchOutcome::Superseded);

        let state = coordinator.state();
        assert_eq!(state.query.as_deref(), Some("fast"));
        assert_eq!(ids(&state), (200..210u64).map(CandidateId::from).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_repeated_query_while_first_page_in_flight_is_ignored() {
        let provider = Arc::new(PerQueryProvider {
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        });
        let coordinator = coordinator_with(provider.clone(), CoordinatorConfig::default());

        let mut rx = coordinator.subscribe();
        let first = coordinator.spawn_start_search("slow");
        rx.wait_for(|s| s.status == SearchStatus::FetchingFirstPage)
            .await
            .unwrap();

        assert_eq!(coordinator.start_search(" slow ").await, FetchOutcome::Ignored);
        provider.gate.notify_one();
        assert_eq!(first.await.unwrap(), FetchOutcome::Applied);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reset_discards_in_flight_page() {
        let provider = Arc::new(ScriptedProvider::new(experts(0..30)).gated_at(10));
        let coordinator = coordinator_with(provider.clone(), CoordinatorConfig::default());
        coordinator.start_search("mediation").await;

        let mut rx = coordinator.subscribe();
        let pending = coordinator.spawn_load_more();
        rx.wait_for(|s| s.status == SearchStatus::FetchingNextPage)
            .await
            .unwrap();

        coordinator.reset();
        assert_eq!(coordinator.state(), SearchSnapshot::idle());

        provider.release();
        assert_eq!(pending.await.unwrap(), FetchOutcome::Superseded);
        assert_eq!(coordinator.state(), SearchSnapshot::idle());
    }

    #[tokio::test]
    async fn test_new_query_discards_in_flight_next_page() {
        let provider = Arc::new(ScriptedProvider::new(experts(0..30)).gated_at(10));
        let coordinator = coordinator_with(provider.clone(), CoordinatorConfig::default());
        coordinator.start_search("mediation").await;

        let mut rx = coordinator.subscribe();
        let pending = coordinator.spawn_load_more();
        rx.wait_for(|s| s.status == SearchStatus::FetchingNextPage)
            .await
            .unwrap();

        assert_eq!(coordinator.start_search("other").await, FetchOutcome::Applied);
        let fresh = coordinator.state();

        provider.release();
        assert_eq!(pending.await.unwrap(), FetchOutcome::Superseded);

        let state = coordinator.state();
        assert_eq!(state, fresh);
        assert_eq!(state.query.as_deref(), Some("other"));
        assert_eq!(state.status, SearchStatus::Ready);
        assert_eq!(state.current_page, 1);
        assert_eq!(ids(&state), (0..10u64).map(CandidateId::from).collect::<Vec<_>>());
        assert_eq!(provider.offsets(), vec![0, 10, 0]);
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let provider = Arc::new(ScriptedProvider::new(experts(0..30)));
        let coordinator = coordinator_with(provider, CoordinatorConfig::default());
        let rx = coordinator.subscribe();

        coordinator.start_search("mediation").await;
        assert_eq!(rx.borrow().status, SearchStatus::Ready);
        assert_eq!(rx.borrow().accumulated.len(), 10);

        coordinator.load_more().await;
        assert_eq!(rx.borrow().current_page, 2);
    }
}
