//! The ResultValidator runs candidates through a battery of checks.
//!
//! A candidate is surfaced only if every check passes. Evaluation never
//! fails outward: malformed input and checks that blow up reject the one
//! candidate involved and leave the rest of the batch alone.

use crate::checks::{
    NameSanityCheck, ProfessionalSignalCheck, ProfileLinkCheck, TitleDenylistCheck,
};
use crate::traits::{CandidateCheck, Rejection};
use data_loader::{Candidate, CandidateId};
use rayon::prelude::*;
use serde_json::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Batches at least this large are evaluated on the rayon pool.
const PARALLEL_BATCH_THRESHOLD: usize = 64;

/// Check name reported for records that aren't candidates at all.
const STRUCTURE_CHECK: &str = "StructureCheck";

/// Outcome of validating one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected {
        check: &'static str,
        reason: Rejection,
    },
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// A rejected candidate together with why it was rejected.
#[derive(Debug, Clone)]
pub struct RejectedCandidate {
    pub id: Option<CandidateId>,
    pub name: Option<String>,
    pub check: &'static str,
    pub reason: Rejection,
}

/// Accepted candidates plus a record of every rejection, in input order.
#[derive(Debug, Clone, Default)]
pub struct FilterReport {
    pub accepted: Vec<Candidate>,
    pub rejected: Vec<RejectedCandidate>,
}

/// Chains checks together into a validator.
///
/// ## Usage
/// ```ignore
/// let validator = ResultValidator::standard();
/// let shown = validator.filter_candidates(page.candidates);
/// ```
pub struct ResultValidator {
    checks: Vec<Box<dyn CandidateCheck>>,
}

impl ResultValidator {
    /// Create a validator with no checks (accepts everything).
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// The standard battery: name, profile links, title, professional signal.
    pub fn standard() -> Self {
        Self::new()
            .add_check(NameSanityCheck::new())
            .add_check(ProfileLinkCheck)
            .add_check(TitleDenylistCheck)
            .add_check(ProfessionalSignalCheck::default())
    }

    /// Add a check to the validator (builder pattern).
    pub fn add_check(mut self, check: impl CandidateCheck + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Names of the configured checks, in evaluation order.
    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Evaluate one candidate against every check.
    ///
    /// Stops at the first failing check. A check that panics rejects the
    /// candidate with [`Rejection::Internal`].
    pub fn evaluate(&self, candidate: &Candidate) -> Verdict {
        for check in &self.checks {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| check.evaluate(candidate)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(reason)) => {
                    return Verdict::Rejected {
                        check: check.name(),
                        reason,
                    };
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    warn!(
                        "Check {} panicked on candidate {:?}: {}",
                        check.name(),
                        candidate.id,
                        message
                    );
                    return Verdict::Rejected {
                        check: check.name(),
                        reason: Rejection::Internal(message),
                    };
                }
            }
        }
        Verdict::Accepted
    }

    /// Evaluate an untyped record; anything that isn't a candidate object is
    /// rejected.
    pub fn evaluate_value(&self, value: &Value) -> Verdict {
        match Candidate::from_value(value.clone()) {
            Some(candidate) => self.evaluate(&candidate),
            None => Verdict::Rejected {
                check: STRUCTURE_CHECK,
                reason: Rejection::Malformed,
            },
        }
    }

    /// Whether a candidate should be shown.
    pub fn is_acceptable(&self, candidate: &Candidate) -> bool {
        self.evaluate(candidate).is_accepted()
    }

    /// Whether an untyped record is a candidate that should be shown.
    pub fn is_acceptable_value(&self, value: &Value) -> bool {
        self.evaluate_value(value).is_accepted()
    }

    /// Keep the acceptable candidates, preserving input order.
    ///
    /// Each candidate is judged on its own; large batches are evaluated in
    /// parallel.
    pub fn filter_candidates(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        let input_count = candidates.len();

        let accepted: Vec<Candidate> = if input_count >= PARALLEL_BATCH_THRESHOLD {
            candidates
                .into_par_iter()
                .filter(|candidate| self.is_acceptable(candidate))
                .collect()
        } else {
            candidates
                .into_iter()
                .filter(|candidate| self.is_acceptable(candidate))
                .collect()
        };

        debug!(
            "Validated batch (input count: {}, accepted: {})",
            input_count,
            accepted.len()
        );
        accepted
    }

    /// Like [`filter_candidates`](Self::filter_candidates), but also reports
    /// each rejection.
    pub fn filter_with_report(&self, candidates: Vec<Candidate>) -> FilterReport {
        let mut report = FilterReport::default();
        for candidate in candidates {
            match self.evaluate(&candidate) {
                Verdict::Accepted => report.accepted.push(candidate),
                Verdict::Rejected { check, reason } => report.rejected.push(RejectedCandidate {
                    id: candidate.id,
                    name: candidate.name,
                    check,
                    reason,
                }),
            }
        }
        report
    }
}

impl Default for ResultValidator {
    /// Defaults to the standard battery.
    fn default() -> Self {
        Self::standard()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
