//! Check that the title describes a person, not an educational product.

use crate::traits::{CandidateCheck, Rejection};
use data_loader::Candidate;

/// Terms that mark a title as a course or program listing.
pub const TITLE_DENYLIST: [&str; 9] = [
    "course",
    "tutorial",
    "workshop",
    "masterclass",
    "bootcamp",
    "certification",
    "training",
    "program",
    "curriculum",
];

/// Rejects candidates whose title contains a denylisted term.
pub struct TitleDenylistCheck;

impl CandidateCheck for TitleDenylistCheck {
    fn name(&self) -> &'static str {
        "TitleDenylistCheck"
    }

    fn evaluate(&self, candidate: &Candidate) -> Result<(), Rejection> {
        let Some(title) = candidate.title.as_deref() else {
            return Ok(());
        };

        let lower = title.to_lowercase();
        match TITLE_DENYLIST.iter().copied().find(|term| lower.contains(term)) {
            Some(term) => Err(Rejection::TitleDenylisted { term }),
            None => Ok(()),
        }
    }
}
