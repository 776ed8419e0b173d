//! The aggregate match score. Created once per (job, resume) scoring run and
//! never mutated; a re-score produces a new value with a new timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scoring dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDimension {
    Skills,
    Experience,
    Education,
    Culture,
}

/// Coarse reliability label for the whole score. Not a probability: derived
/// from per-component confidence and fallback usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

/// How much concrete evidence backed a component's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStrength {
    Strong,
    Moderate,
    Weak,
}

/// One scored dimension with its effective weight and supporting detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub dimension: ScoreDimension,
    /// Always within [0, 100].
    pub score: f64,
    /// Fraction of comparisons resolved with strong evidence, in [0, 1].
    pub confidence: f64,
    pub evidence_strength: EvidenceStrength,
    /// Weight after redistribution; weights of present components sum to 1.0.
    pub weight: f64,
    /// Human-readable notes on what matched and how.
    pub breakdown: Vec<String>,
}

/// Confidence-annotated aggregate score for one (job, resume) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchScore {
    pub job_id: String,
    pub resume_id: String,
    /// Weighted blend of component scores, rounded and clamped to [0, 100].
    pub overall_score: u8,
    pub components: Vec<ScoreComponent>,
    pub confidence_level: ConfidenceLevel,
    /// Number of fallback heuristics substituted for unavailable enhancements.
    pub fallbacks_used: u32,
    pub scored_at: DateTime<Utc>,
}

impl MatchScore {
    pub fn component(&self, dimension: ScoreDimension) -> Option<&ScoreComponent> {
        self.components.iter().find(|c| c.dimension == dimension)
    }

    /// Sum of effective weights across present components.
    pub fn weight_sum(&self) -> f64 {
        self.components.iter().map(|c| c.weight).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_lookup() {
        let score = MatchScore {
            job_id: "job-1".to_string(),
            resume_id: "res-1".to_string(),
            overall_score: 80,
            components: vec![ScoreComponent {
                dimension: ScoreDimension::Skills,
                score: 80.0,
                confidence: 1.0,
                evidence_strength: EvidenceStrength::Strong,
                weight: 1.0,
                breakdown: vec![],
            }],
            confidence_level: ConfidenceLevel::High,
            fallbacks_used: 0,
            scored_at: Utc::now(),
        };
        assert!(score.component(ScoreDimension::Skills).is_some());
        assert!(score.component(ScoreDimension::Culture).is_none());
        assert!((score.weight_sum() - 1.0).abs() < 1e-6);
    }
}
