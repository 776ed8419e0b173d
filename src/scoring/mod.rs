//! # Scoring Engine
//!
//! Converts heterogeneous partial evidence into a single confidence-annotated
//! match score: three-tier skill matching, experience trajectory analysis,
//! degree-level comparison, and an optional culture dimension whose weight
//! redistributes when absent.

pub mod culture;
pub mod education;
pub mod engine;
pub mod experience;
pub mod handler;
pub mod skills;
pub mod weights;

pub use engine::ScoringEngine;
pub use handler::MatchReadyHandler;
pub use weights::EffectiveWeights;
