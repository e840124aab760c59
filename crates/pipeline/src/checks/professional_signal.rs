//! Check that a candidate carries enough professional detail.

use crate::signals::ProfessionalSignals;
use crate::traits::{CandidateCheck, Rejection};
use data_loader::Candidate;

/// Requires at least `min_signals` of the eight professional indicators.
pub struct ProfessionalSignalCheck {
    min_signals: usize,
}

impl ProfessionalSignalCheck {
    /// Create the check.
    ///
    /// # Arguments
    /// * `min_signals` - Minimum indicators that must hold (typically 2)
    pub fn new(min_signals: usize) -> Self {
        Self { min_signals }
    }
}

impl Default for ProfessionalSignalCheck {
    fn default() -> Self {
        Self::new(2)
    }
}

impl CandidateCheck for ProfessionalSignalCheck {
    fn name(&self) -> &'static str {
        "ProfessionalSignalCheck"
    }

    fn evaluate(&self, candidate: &Candidate) -> Result<(), Rejection> {
        let found = ProfessionalSignals::from_candidate(candidate).count();
        if found >= self.min_signals {
            Ok(())
        } else {
            Err(Rejection::InsufficientSignals {
                found,
                required: self.min_signals,
            })
        }
    }
}
