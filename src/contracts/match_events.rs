//! Contracts for match subjects.

use serde::{Deserialize, Serialize};

use crate::profiles::{CandidateProfile, JobRequirementProfile, MatchScore};

use super::schema_version;

/// Payload of `analysis.match.ready`: both extraction branches completed for
/// a (job, resume) pair. Internal to the pipeline, not a public contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReady {
    #[serde(default = "schema_version")]
    pub schema_version: u32,
    pub job_id: String,
    pub resume_id: String,
    pub jd_profile: JobRequirementProfile,
    pub candidate_profile: CandidateProfile,
}

/// Payload of `analysis.match.scored`: the terminal success event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchScored {
    #[serde(default = "schema_version")]
    pub schema_version: u32,
    pub job_id: String,
    pub resume_id: String,
    pub match_score: MatchScore,
}
