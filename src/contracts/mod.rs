//! # Event Contracts
//!
//! One versioned payload type per subject. Keeping contracts per-subject
//! (rather than one shared types package imported everywhere) means each
//! worker depends only on the subjects it consumes and produces.

pub mod failure;
pub mod job_events;
pub mod match_events;
pub mod resume_events;

pub use failure::{MatchTimeoutFailed, StageFailed};
pub use job_events::{JdExtracted, JdSubmitted};
pub use match_events::{MatchReady, MatchScored};
pub use resume_events::{ResumeParsed, ResumeSubmitted};

/// Current schema version stamped on every contract.
pub(crate) fn schema_version() -> u32 {
    1
}
