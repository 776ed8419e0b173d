//! Contracts for resume subjects.

use serde::{Deserialize, Serialize};

use crate::profiles::CandidateProfile;

use super::schema_version;

/// Payload of `job.resume.submitted`, produced by the excluded upload layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeSubmitted {
    #[serde(default = "schema_version")]
    pub schema_version: u32,
    pub job_id: String,
    pub resume_id: String,
    /// Opaque reference resolved through the `FileStore` collaborator.
    pub file_ref: String,
    pub original_filename: String,
}

/// Payload of `analysis.resume.parsed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeParsed {
    #[serde(default = "schema_version")]
    pub schema_version: u32,
    pub job_id: String,
    pub resume_id: String,
    pub candidate_profile: CandidateProfile,
    pub processing_time_ms: u64,
    /// How completely the model's response satisfied the schema, in [0, 1].
    pub confidence: f64,
}
