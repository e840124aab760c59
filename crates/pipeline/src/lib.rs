//! Validation pipeline for expert search results.
//!
//! This crate provides:
//! - CandidateCheck trait and the four standard checks
//! - ResultValidator for composing checks and filtering batches
//! - ProfessionalSignals, the indicators behind the signal threshold
//! - Profile URL validation and normalization
//!
//! ## Architecture
//! Every candidate is judged on its own, with no state carried between
//! candidates:
//! 1. Name sanity (present, long enough, not a headline or business tagline)
//! 2. Profile links (personal profiles only)
//! 3. Title denylist (no course or program listings)
//! 4. Professional signal (at least two of eight indicators)
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{ResultValidator, clean_profile_url};
//!
//! let validator = ResultValidator::standard();
//! let shown = validator.filter_candidates(page.candidates);
//! for expert in &shown {
//!     if let Some(url) = &expert.profile_url {
//!         println!("{}", clean_profile_url(url));
//!     }
//! }
//! ```

pub mod traits;
pub mod checks;
pub mod profile_url;
pub mod signals;
pub mod validator;

// Re-export main types
pub use traits::{CandidateCheck, Rejection};
pub use profile_url::{
    classify_profile_url, clean_profile_url, is_valid_profile_url, profile_handle, ProfileUrlKind,
};
pub use signals::ProfessionalSignals;
pub use validator::{FilterReport, RejectedCandidate, ResultValidator, Verdict};
