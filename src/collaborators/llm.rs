//! Vision-capable language-model collaborator. Only the input/output contract
//! lives here; prompt engineering belongs to the implementation behind the
//! trait. Responses are untyped JSON at this boundary and must be validated
//! into tagged results by the extraction workers before going any further.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What the model is asked to extract from.
#[derive(Debug, Clone)]
pub enum ExtractionInput {
    /// Raw job-description text.
    Text(String),
    /// Resume binary (PDF/image) for the vision path.
    Document { bytes: Vec<u8>, filename: String },
}

/// Output schema the model must satisfy. Field names are checked by the
/// workers' validators; missing optional fields are repaired with defaults.
#[derive(Debug, Clone)]
pub struct ExtractionSchema {
    pub name: &'static str,
    pub required_fields: &'static [&'static str],
}

/// Schema for job-description extraction.
pub const JD_SCHEMA: ExtractionSchema = ExtractionSchema {
    name: "job_requirement_profile",
    required_fields: &["required_skills", "experience"],
};

/// Schema for resume parsing.
pub const RESUME_SCHEMA: ExtractionSchema = ExtractionSchema {
    name: "candidate_profile",
    required_fields: &["skills"],
};

/// One semantic skill comparison resolved by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticVerdict {
    pub required_skill: String,
    /// The candidate skill judged equivalent, when one was found.
    pub matched_skill: Option<String>,
    pub equivalent: bool,
}

/// Vision/LLM collaborator contract.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Extract structured JSON from the input according to `schema`. Callers
    /// wrap this in their configured timeout; a timeout is a retryable
    /// dependency failure, not a validation failure.
    async fn extract_structured(
        &self,
        input: ExtractionInput,
        schema: &ExtractionSchema,
    ) -> Result<serde_json::Value>;

    /// Judge semantic equivalence between required skills and the candidate's
    /// skill list. Unavailability here is never fatal: the scoring engine
    /// falls back to exact+fuzzy matching and counts the fallback.
    async fn compare_skills(
        &self,
        required: &[String],
        candidate_skills: &[String],
    ) -> Result<Vec<SemanticVerdict>>;
}
