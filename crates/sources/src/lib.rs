//! # Sources Crate
//!
//! Search backends for expert discovery.
//!
//! ## Components
//!
//! ### SearchProvider
//! The seam between the coordinator and whatever actually runs a query.
//! One call returns one page of raw, unvalidated candidates.
//!
//! ### CatalogSource
//! In-process provider over a `CandidateCatalog`: term matching across
//! name, title, bio, skills and affiliation, exact name matches first.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{CatalogSource, SearchProvider};
//! use data_loader::CandidateCatalog;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(CandidateCatalog::load_from_file(path)?);
//! let source = CatalogSource::new(catalog);
//! let page = source.fetch_page("negotiation", 0, 10).await?;
//! ```

pub mod provider;
pub mod catalog_source;

// Re-export commonly used types
pub use provider::{ProviderError, SearchProvider};
pub use catalog_source::CatalogSource;
