//! Core traits for the validation pipeline.
//!
//! This module defines the `CandidateCheck` trait: one independent rule a
//! candidate must pass to be shown, plus the `Rejection` reasons checks
//! report.

use data_loader::Candidate;
use thiserror::Error;

/// Why a candidate was turned away.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("name is missing or shorter than {min} characters")]
    NameTooShort { min: usize },

    #[error("name contains \"{phrase}\"")]
    NameDenylisted { phrase: &'static str },

    #[error("profile URL points at a non-profile resource ({segment}): {url}")]
    UrlDenylisted { url: String, segment: &'static str },

    #[error("professional-network URL is not a personal profile: {url}")]
    NotPersonalProfile { url: String },

    #[error("title contains \"{term}\"")]
    TitleDenylisted { term: &'static str },

    #[error("only {found} of {required} professional signals present")]
    InsufficientSignals { found: usize, required: usize },

    #[error("record is not a well-formed candidate")]
    Malformed,

    /// A check failed unexpectedly while evaluating this candidate
    #[error("internal validation error: {0}")]
    Internal(String),
}

/// A single rule in the validation pipeline.
///
/// Checks are pure: no I/O, no state shared between candidates. `Send + Sync`
/// lets the validator evaluate a batch in parallel.
pub trait CandidateCheck: Send + Sync {
    /// Returns the name of this check (for logging/reporting)
    fn name(&self) -> &'static str;

    /// Evaluate one candidate.
    ///
    /// # Returns
    /// * `Ok(())` - The candidate passes this check
    /// * `Err(Rejection)` - Why it doesn't
    fn evaluate(&self, candidate: &Candidate) -> Result<(), Rejection>;
}
