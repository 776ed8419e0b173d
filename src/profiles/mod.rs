//! # Profile Data Model
//!
//! The three durable value types of the pipeline: job requirement profiles,
//! candidate profiles, and match scores. All are immutable after creation;
//! idempotency elsewhere relies on wholesale overwrite, never field mutation.

pub mod candidate;
pub mod job;
pub mod score;

pub use candidate::{CandidateProfile, ContactInfo, EducationEntry, WorkExperience};
pub use job::{
    DegreeLevel, EducationRequirement, ExperienceBand, JobRequirementProfile, WeightedSkill,
};
pub use score::{
    ConfidenceLevel, EvidenceStrength, MatchScore, ScoreComponent, ScoreDimension,
};
