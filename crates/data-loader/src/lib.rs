//! # Data Loader Crate
//!
//! Candidate data model and loading for expert search.
//!
//! ## Main Components
//!
//! - **types**: `Candidate`, `CandidateId`, `SearchPage`
//! - **parser**: JSON / JSON-lines record parsing and search-page envelopes
//! - **catalog**: `CandidateCatalog`, an ordered in-memory collection
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::CandidateCatalog;
//! use std::path::Path;
//!
//! let catalog = CandidateCatalog::load_from_file(Path::new("data/experts.json"))?;
//! for candidate in catalog.iter() {
//!     println!("{:?}", candidate.display_name());
//! }
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod catalog;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{non_blank, Candidate, CandidateId, SearchPage};
pub use catalog::CandidateCatalog;
