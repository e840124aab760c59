//! Check implementations for the validation pipeline.
//!
//! Each check is one independent rule; `ResultValidator::standard()` runs all
//! four and a candidate must pass every one.

pub mod name_sanity;
pub mod profile_link;
pub mod title_denylist;
pub mod professional_signal;

// Re-export for convenience
pub use name_sanity::{NameSanityCheck, NAME_DENYLIST};
pub use profile_link::ProfileLinkCheck;
pub use title_denylist::{TitleDenylistCheck, TITLE_DENYLIST};
pub use professional_signal::ProfessionalSignalCheck;
