//! Coordinator crate for the expert search engine.
//!
//! This crate contains the paginated search coordinator: it drives a
//! [`SearchProvider`](sources::SearchProvider) page by page, validates each
//! page and accumulates the surviving experts for display.

pub mod config;
pub mod coordinator;
pub mod session;

pub use config::{ConfigError, CoordinatorConfig, HasMoreBasis};
pub use coordinator::{FetchOutcome, PaginatedSearchCoordinator, SearchSnapshot};
pub use session::{compute_has_more, PageStats, SearchStatus};
