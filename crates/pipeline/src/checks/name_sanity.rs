//! Check that the name belongs to a person or organization profile.
//!
//! Search backends regularly return articles and service pages whose
//! "name" is a headline ("5 Ways to Negotiate") or a business tagline.

use crate::traits::{CandidateCheck, Rejection};
use data_loader::Candidate;

/// Phrases that mark a name as a marketing asset rather than a profile.
pub const NAME_DENYLIST: [&str; 15] = [
    "how to",
    "guide",
    "tips",
    "ways to",
    "best practices",
    "framework",
    "platform",
    "solutions",
    "services",
    "consulting",
    "agency",
    "studio",
    "labs",
    "partners",
    "associates",
];

/// Rejects missing, too-short, or denylisted names.
///
/// ## Algorithm
/// 1. Trim the name; reject if absent or under `min_chars` characters
/// 2. Lower-case it and reject on any denylisted phrase
pub struct NameSanityCheck {
    min_chars: usize,
}

impl NameSanityCheck {
    pub fn new() -> Self {
        Self { min_chars: 2 }
    }

    /// Configure the minimum trimmed name length (default: 2)
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }
}

impl Default for NameSanityCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateCheck for NameSanityCheck {
    fn name(&self) -> &'static str {
        "NameSanityCheck"
    }

    fn evaluate(&self, candidate: &Candidate) -> Result<(), Rejection> {
        let name = candidate
            .display_name()
            .filter(|n| n.chars().count() >= self.min_chars)
            .ok_or(Rejection::NameTooShort { min: self.min_chars })?;

        let lower = name.to_lowercase();
        match NAME_DENYLIST.iter().copied().find(|phrase| lower.contains(phrase)) {
            Some(phrase) => Err(Rejection::NameDenylisted { phrase }),
            None => Ok(()),
        }
    }
}
