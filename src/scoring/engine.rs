//! # Scoring Engine
//!
//! Blends the component scores into one confidence-annotated `MatchScore`.
//! The engine is deterministic for a given pair of profiles and model
//! behavior, which is what makes replayed `analysis.match.ready` events
//! harmless: the same inputs reproduce the same score.
//!
//! Failure policy: semantic enhancement degrades to exact+fuzzy matching and
//! counts the fallback; structurally empty profiles still produce the lowest
//! honestly-computed score rather than failing the pipeline.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::collaborators::VisionModel;
use crate::config::ScoringConfig;
use crate::extraction::SkillNormalizer;
use crate::profiles::{
    CandidateProfile, ConfidenceLevel, EvidenceStrength, JobRequirementProfile, MatchScore,
    ScoreComponent, ScoreDimension,
};
use crate::scoring::culture::score_culture;
use crate::scoring::education::score_education;
use crate::scoring::experience::score_experience;
use crate::scoring::skills::score_skills;
use crate::scoring::weights::EffectiveWeights;

pub struct ScoringEngine {
    model: Arc<dyn VisionModel>,
    normalizer: SkillNormalizer,
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(model: Arc<dyn VisionModel>, normalizer: SkillNormalizer, config: ScoringConfig) -> Self {
        Self {
            model,
            normalizer,
            config,
        }
    }

    pub async fn score(
        &self,
        jd_profile: &JobRequirementProfile,
        candidate: &CandidateProfile,
    ) -> MatchScore {
        let today = Utc::now().date_naive();
        let mut fallbacks_used = 0u32;

        let skills = score_skills(
            jd_profile,
            &candidate.skills,
            self.model.as_ref(),
            &self.normalizer,
            self.config.fuzzy_threshold,
        )
        .await;
        if skills.fallback_used {
            fallbacks_used += 1;
        }

        let experience = score_experience(
            jd_profile,
            candidate,
            self.config.recency_window_years,
            today,
        );
        let education = score_education(&jd_profile.education, candidate);
        let culture = score_culture(&jd_profile.culture_attributes, candidate);

        let weights = EffectiveWeights::resolve(self.config.weights, culture.is_some());

        let mut components = vec![
            component(ScoreDimension::Skills, skills.score, skills.confidence, weights.skills, skills.breakdown),
            component(
                ScoreDimension::Experience,
                experience.score,
                experience.confidence,
                weights.experience,
                experience.breakdown,
            ),
            component(
                ScoreDimension::Education,
                education.score,
                education.confidence,
                weights.education,
                education.breakdown,
            ),
        ];
        if let (Some(culture), Some(culture_weight)) = (culture, weights.culture) {
            components.push(component(
                ScoreDimension::Culture,
                culture.score,
                culture.confidence,
                culture_weight,
                culture.breakdown,
            ));
        }

        let blended: f64 = components.iter().map(|c| c.score * c.weight).sum();
        let overall_score = blended.round().clamp(0.0, 100.0) as u8;
        let confidence_level = resolve_confidence_level(&components, fallbacks_used);

        info!(
            job_id = %jd_profile.job_id,
            resume_id = %candidate.resume_id,
            overall_score,
            confidence = ?confidence_level,
            fallbacks_used,
            "🎯 Match scored"
        );

        MatchScore {
            job_id: jd_profile.job_id.clone(),
            resume_id: candidate.resume_id.clone(),
            overall_score,
            components,
            confidence_level,
            fallbacks_used,
            scored_at: Utc::now(),
        }
    }
}

fn component(
    dimension: ScoreDimension,
    score: f64,
    confidence: f64,
    weight: f64,
    breakdown: Vec<String>,
) -> ScoreComponent {
    ScoreComponent {
        dimension,
        score: score.clamp(0.0, 100.0),
        confidence: confidence.clamp(0.0, 1.0),
        evidence_strength: evidence_strength(confidence),
        weight,
        breakdown,
    }
}

fn evidence_strength(confidence: f64) -> EvidenceStrength {
    if confidence >= 0.8 {
        EvidenceStrength::Strong
    } else if confidence >= 0.5 {
        EvidenceStrength::Moderate
    } else {
        EvidenceStrength::Weak
    }
}

/// High requires every component to resolve confidently with zero fallbacks;
/// medium tolerates a fallback heuristic or middling confidence; anything
/// weaker is low.
fn resolve_confidence_level(components: &[ScoreComponent], fallbacks_used: u32) -> ConfidenceLevel {
    let min_confidence = components
        .iter()
        .map(|c| c.confidence)
        .fold(f64::INFINITY, f64::min);

    if fallbacks_used == 0 && min_confidence >= 0.8 {
        ConfidenceLevel::High
    } else if fallbacks_used > 0 || min_confidence >= 0.5 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}
