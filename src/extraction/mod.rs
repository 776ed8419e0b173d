//! # Extraction Workers
//!
//! Two structurally identical workers, one per submission branch: job
//! descriptions and resumes. Both call the vision/language-model
//! collaborator, validate and repair its untyped response at the boundary,
//! persist through upsert (idempotent under redelivery), and publish their
//! branch's extraction event. Multiple instances subscribe under one durable
//! group, so each submission is processed by exactly one instance.

pub mod job_worker;
pub mod repair;
pub mod resume_worker;
pub mod synonyms;

pub use job_worker::JobExtractionWorker;
pub use repair::{repair_candidate_profile, repair_jd_profile, Repaired};
pub use resume_worker::ResumeExtractionWorker;
pub use synonyms::SkillNormalizer;
