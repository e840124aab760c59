//! Check that any profile links lead to a personal profile.

use crate::profile_url::check_profile_url;
use crate::traits::{CandidateCheck, Rejection};
use data_loader::Candidate;

/// Rejects candidates whose `profileUrl` or `linkedinUrl` is present but
/// points somewhere other than a personal profile.
///
/// Candidates without links pass; the signal check decides whether the rest
/// of the record is substantial enough.
pub struct ProfileLinkCheck;

impl CandidateCheck for ProfileLinkCheck {
    fn name(&self) -> &'static str {
        "ProfileLinkCheck"
    }

    fn evaluate(&self, candidate: &Candidate) -> Result<(), Rejection> {
        candidate.profile_links().try_for_each(check_profile_url)
    }
}
