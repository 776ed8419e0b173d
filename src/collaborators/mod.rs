//! # Collaborator Interfaces
//!
//! Narrow async traits for the external collaborators this core depends on:
//! the vision/LLM service, object storage, and the document store. Every
//! network call behind these traits carries an explicit timeout at the call
//! site so a stuck collaborator cannot exhaust the broker's ack-wait window.

pub mod llm;
pub mod repository;
pub mod storage;

pub use llm::{
    ExtractionInput, ExtractionSchema, SemanticVerdict, VisionModel, JD_SCHEMA, RESUME_SCHEMA,
};
pub use repository::{InMemoryRepository, ProfileRepository};
pub use storage::FileStore;
