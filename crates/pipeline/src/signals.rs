//! Professional-signal indicators.
//!
//! A record that only carries a name is as likely to be a scraped headline as
//! a person. These eight indicators measure how much professional detail a
//! candidate actually has; the validator requires a minimum count.

use data_loader::{non_blank, Candidate};

/// Placeholder title some backends emit when they know nothing about a person.
pub const PLACEHOLDER_TITLE: &str = "View profile";

/// Bios at or under this many characters (after trimming) don't count.
pub const MIN_BIO_CHARS: usize = 20;

/// The eight professional-signal indicators for one candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfessionalSignals {
    pub has_title: bool,
    pub has_skills: bool,
    pub has_bio: bool,
    pub has_affiliation: bool,
    pub has_profile_link: bool,
    pub has_email: bool,
    pub has_publications: bool,
    pub has_citations: bool,
}

impl ProfessionalSignals {
    /// Compute the indicators for a candidate.
    pub fn from_candidate(candidate: &Candidate) -> Self {
        Self {
            has_title: non_blank(&candidate.title).is_some_and(|t| t != PLACEHOLDER_TITLE),
            has_skills: candidate.skills.as_ref().is_some_and(|s| !s.is_empty()),
            has_bio: non_blank(&candidate.bio).is_some_and(|b| b.chars().count() > MIN_BIO_CHARS),
            has_affiliation: candidate.affiliation().is_some(),
            has_profile_link: candidate.profile_links().next().is_some(),
            has_email: non_blank(&candidate.email).is_some(),
            has_publications: candidate.publications_count.is_some_and(|n| n > 0),
            has_citations: candidate.citations_count.is_some_and(|n| n > 0),
        }
    }

    /// Number of indicators that hold.
    pub fn count(&self) -> usize {
        [
            self.has_title,
            self.has_skills,
            self.has_bio,
            self.has_affiliation,
            self.has_profile_link,
            self.has_email,
            self.has_publications,
            self.has_citations,
        ]
        .into_iter()
        .filter(|&signal| signal)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_candidate_has_no_signals() {
        let signals = ProfessionalSignals::from_candidate(&Candidate::new(1u64, "Jane Doe"));
        assert_eq!(signals, ProfessionalSignals::default());
        assert_eq!(signals.count(), 0);
    }

    #[test]
    fn test_every_indicator_counts() {
        let candidate = Candidate::new(1u64, "Jane Doe")
            .with_title("Principal Engineer")
            .with_skills(["Rust"])
            .with_bio("Builds distributed storage engines.")
            .with_organization("Acme")
            .with_profile_url("https://janedoe.dev")
            .with_email("jane@example.com")
            .with_publications(4)
            .with_citations(120);

        assert_eq!(ProfessionalSignals::from_candidate(&candidate).count(), 8);
    }

    #[test]
    fn test_placeholders_and_empties_do_not_count() {
        let candidate = Candidate::new(1u64, "Jane Doe")
            .with_title(PLACEHOLDER_TITLE)
            .with_skills(Vec::<String>::new())
            .with_bio("   short bio   ")
            .with_email(" ")
            .with_publications(0)
            .with_citations(0);

        assert_eq!(ProfessionalSignals::from_candidate(&candidate).count(), 0);
    }

    #[test]
    fn test_bio_length_boundary() {
        let exactly = Candidate::new(1u64, "A B").with_bio("a".repeat(MIN_BIO_CHARS));
        let longer = Candidate::new(1u64, "A B").with_bio("a".repeat(MIN_BIO_CHARS + 1));

        assert!(!ProfessionalSignals::from_candidate(&exactly).has_bio);
        assert!(ProfessionalSignals::from_candidate(&longer).has_bio);
    }

    #[test]
    fn test_company_counts_as_affiliation() {
        let mut candidate = Candidate::new(1u64, "Jane Doe");
        candidate.company = Some("Initech".to_string());
        assert!(ProfessionalSignals::from_candidate(&candidate).has_affiliation);
    }
}
