//! # Subject Namespace
//!
//! Hierarchical, dot-separated subjects addressing every event in the
//! pipeline, plus the token-wise matcher used by subscriptions. A `*` wildcard
//! matches exactly one token (`analysis.*.failed` matches
//! `analysis.jd.failed` but not `analysis.failed`).

/// Job description submitted by the excluded upload layer.
pub const JOB_JD_SUBMITTED: &str = "job.jd.submitted";
/// Resume submitted by the excluded upload layer.
pub const JOB_RESUME_SUBMITTED: &str = "job.resume.submitted";

/// Structured requirement profile extracted from a job description.
pub const ANALYSIS_JD_EXTRACTED: &str = "analysis.jd.extracted";
/// Structured candidate profile parsed from a resume.
pub const ANALYSIS_RESUME_PARSED: &str = "analysis.resume.parsed";
/// Both profiles present for a (job, resume) pair; internal-only.
pub const ANALYSIS_MATCH_READY: &str = "analysis.match.ready";
/// Final confidence-weighted match score.
pub const ANALYSIS_MATCH_SCORED: &str = "analysis.match.scored";

/// Job extraction exhausted its retry budget.
pub const ANALYSIS_JD_FAILED: &str = "analysis.jd.failed";
/// Resume parsing exhausted its retry budget.
pub const ANALYSIS_RESUME_FAILED: &str = "analysis.resume.failed";
/// Scoring exhausted its retry budget.
pub const ANALYSIS_MATCH_FAILED: &str = "analysis.match.failed";
/// One branch of a join never arrived within the TTL.
pub const ANALYSIS_MATCH_TIMEOUT_FAILED: &str = "analysis.match.timeout_failed";

/// Token-wise subject match with single-token `*` wildcards.
pub fn subject_matches(pattern: &str, subject: &str) -> bool {
    let mut pattern_tokens = pattern.split('.');
    let mut subject_tokens = subject.split('.');

    loop {
        match (pattern_tokens.next(), subject_tokens.next()) {
            (None, None) => return true,
            (Some("*"), Some(_)) => continue,
            (Some(p), Some(s)) if p == s => continue,
            _ => return false,
        }
    }
}
