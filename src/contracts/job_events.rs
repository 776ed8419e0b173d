//! Contracts for job-description subjects. Each subject carries its own
//! versioned payload; workers depend only on the contracts they consume or
//! produce, never on a shared domain library.

use serde::{Deserialize, Serialize};

use crate::profiles::JobRequirementProfile;

use super::schema_version;

/// Payload of `job.jd.submitted`, produced by the excluded upload layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JdSubmitted {
    #[serde(default = "schema_version")]
    pub schema_version: u32,
    pub job_id: String,
    pub raw_text: String,
}

/// Payload of `analysis.jd.extracted`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JdExtracted {
    #[serde(default = "schema_version")]
    pub schema_version: u32,
    pub job_id: String,
    pub jd_profile: JobRequirementProfile,
    /// How completely the model's response satisfied the schema, in [0, 1].
    pub extraction_confidence: f64,
}
