//! # Skill Matching
//!
//! Three-tier comparison of job skills against the candidate's list:
//! exact canonical match (tier weight 1.0), semantic equivalence judged by
//! the language model (0.85), fuzzy string similarity (0.6), or no match.
//! The aggregate is the importance-weighted matched share scaled to 0–100;
//! confidence is the fraction of comparisons resolved as exact or semantic,
//! so fuzzy-only evidence honestly lowers it.
//!
//! Semantic comparison is an enhancement, never a dependency: when the model
//! call fails the tier is skipped, the fallback is counted, and matching
//! proceeds on exact+fuzzy alone.

use std::collections::HashMap;

use tracing::warn;

use crate::collaborators::VisionModel;
use crate::extraction::SkillNormalizer;
use crate::profiles::{JobRequirementProfile, WeightedSkill};

/// Tier weights applied to a matched skill's importance.
const EXACT_CREDIT: f64 = 1.0;
const SEMANTIC_CREDIT: f64 = 0.85;
const FUZZY_CREDIT: f64 = 0.6;

#[derive(Debug, Clone)]
pub struct SkillsOutcome {
    /// Aggregate score in [0, 100].
    pub score: f64,
    /// Fraction of comparisons resolved as exact or semantic.
    pub confidence: f64,
    pub fallback_used: bool,
    pub breakdown: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum MatchTier {
    Exact,
    Semantic,
    Fuzzy,
    Missing,
}

pub async fn score_skills(
    job: &JobRequirementProfile,
    candidate_skills: &[String],
    model: &dyn VisionModel,
    normalizer: &SkillNormalizer,
    fuzzy_threshold: f64,
) -> SkillsOutcome {
    let wanted: Vec<&WeightedSkill> = job.all_skills().collect();
    if wanted.is_empty() {
        return SkillsOutcome {
            score: 0.0,
            confidence: 0.0,
            fallback_used: false,
            breakdown: vec!["job declares no skills to match against".to_string()],
        };
    }

    let candidate: Vec<String> = normalizer.normalize_all(candidate_skills);
    let mut tiers: HashMap<String, MatchTier> = HashMap::new();
    let mut breakdown = Vec::new();

    // Tier 1: exact canonical matches.
    let mut unresolved: Vec<String> = Vec::new();
    for skill in &wanted {
        let canonical = normalizer.canonicalize(&skill.name);
        if candidate.iter().any(|c| *c == canonical) {
            tiers.insert(canonical.clone(), MatchTier::Exact);
            breakdown.push(format!("{canonical}: exact match"));
        } else {
            unresolved.push(canonical);
        }
    }

    // Tier 2: semantic equivalence via the model, batch for all unresolved.
    let mut fallback_used = false;
    if !unresolved.is_empty() && !candidate.is_empty() {
        match model.compare_skills(&unresolved, &candidate).await {
            Ok(verdicts) => {
                for verdict in verdicts {
                    if verdict.equivalent {
                        let canonical = normalizer.canonicalize(&verdict.required_skill);
                        if unresolved.contains(&canonical) {
                            tiers.insert(canonical.clone(), MatchTier::Semantic);
                            breakdown.push(format!(
                                "{canonical}: semantic match ({})",
                                verdict.matched_skill.as_deref().unwrap_or("unspecified")
                            ));
                        }
                    }
                }
                unresolved.retain(|s| !tiers.contains_key(s));
            }
            Err(e) => {
                warn!(error = %e, "Semantic skill comparison unavailable, falling back to exact+fuzzy");
                fallback_used = true;
            }
        }
    }

    // Tier 3: fuzzy similarity or substring containment.
    for canonical in &unresolved {
        let fuzzy_hit = candidate.iter().find(|c| {
            strsim::jaro_winkler(canonical, c) >= fuzzy_threshold
                || c.contains(canonical.as_str())
                || canonical.contains(c.as_str())
        });
        match fuzzy_hit {
            Some(hit) => {
                tiers.insert(canonical.clone(), MatchTier::Fuzzy);
                breakdown.push(format!("{canonical}: fuzzy match ({hit})"));
            }
            None => {
                tiers.insert(canonical.clone(), MatchTier::Missing);
                breakdown.push(format!("{canonical}: not found"));
            }
        }
    }

    let total_importance: f64 = wanted.iter().map(|s| s.importance).sum();
    let mut matched_importance = 0.0;
    let mut strong_resolutions = 0usize;
    for skill in &wanted {
        let canonical = normalizer.canonicalize(&skill.name);
        let tier = tiers.get(&canonical).copied().unwrap_or(MatchTier::Missing);
        let credit = match tier {
            MatchTier::Exact => EXACT_CREDIT,
            MatchTier::Semantic => SEMANTIC_CREDIT,
            MatchTier::Fuzzy => FUZZY_CREDIT,
            MatchTier::Missing => 0.0,
        };
        matched_importance += credit * skill.importance;
        if matches!(tier, MatchTier::Exact | MatchTier::Semantic) {
            strong_resolutions += 1;
        }
    }

    let score = if total_importance > 0.0 {
        (matched_importance / total_importance * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    let confidence = strong_resolutions as f64 / wanted.len() as f64;

    SkillsOutcome {
        score,
        confidence,
        fallback_used,
        breakdown,
    }
}
