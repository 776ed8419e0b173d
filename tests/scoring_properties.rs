//! Property tests for the scoring engine: scores stay bounded and effective
//! weights stay normalized no matter what profiles come out of extraction.

mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;

use matchflow_core::config::{ComponentWeights, ScoringConfig};
use matchflow_core::extraction::SkillNormalizer;
use matchflow_core::profiles::{
    CandidateProfile, ContactInfo, EducationRequirement, ExperienceBand, JobRequirementProfile,
    WeightedSkill, WorkExperience,
};
use matchflow_core::scoring::{EffectiveWeights, ScoringEngine};

use common::EchoModel;

fn skill_name() -> impl Strategy<Value = String> {
    "[a-z]{3,10}"
}

fn job_profile() -> impl Strategy<Value = JobRequirementProfile> {
    (
        proptest::collection::vec((skill_name(), 0.0f64..=1.0), 0..6),
        0.0f64..20.0,
        proptest::collection::vec(skill_name(), 0..4),
    )
        .prop_map(|(skills, min_years, culture_attributes)| JobRequirementProfile {
            job_id: "job-prop".to_string(),
            required_skills: skills
                .into_iter()
                .map(|(name, importance)| WeightedSkill::new(name, importance))
                .collect(),
            preferred_skills: vec![],
            experience: ExperienceBand {
                min_years,
                max_years: None,
            },
            education: EducationRequirement::default(),
            responsibilities: vec![],
            culture_attributes,
            version: 1,
        })
}

fn work_history() -> impl Strategy<Value = Vec<WorkExperience>> {
    proptest::collection::vec(
        (2010i32..2024, 1u32..12, 1u32..72, skill_name()),
        0..4,
    )
    .prop_map(|roles| {
        roles
            .into_iter()
            .map(|(year, month, duration_months, word)| {
                let start = NaiveDate::from_ymd_opt(year, month, 1)
                    .unwrap_or_else(|| NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
                let end = start
                    .checked_add_months(chrono::Months::new(duration_months))
                    .filter(|d| *d < NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
                WorkExperience {
                    company: "Somewhere".to_string(),
                    title: format!("{word} engineer"),
                    start,
                    end,
                    description: word,
                }
            })
            .collect()
    })
}

fn candidate_profile() -> impl Strategy<Value = CandidateProfile> {
    (
        proptest::collection::vec(skill_name(), 0..8),
        work_history(),
    )
        .prop_map(|(skills, experience)| CandidateProfile {
            job_id: "job-prop".to_string(),
            resume_id: "res-prop".to_string(),
            contact: ContactInfo::default(),
            skills,
            experience,
            education: vec![],
            certifications: vec![],
            languages: vec![],
        })
}

fn score_once(jd: &JobRequirementProfile, candidate: &CandidateProfile) -> matchflow_core::profiles::MatchScore {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("runtime");
    let engine = ScoringEngine::new(
        Arc::new(EchoModel),
        SkillNormalizer::with_defaults(),
        ScoringConfig::default(),
    );
    runtime.block_on(engine.score(jd, candidate))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_scores_stay_bounded(jd in job_profile(), candidate in candidate_profile()) {
        let score = score_once(&jd, &candidate);
        prop_assert!(score.overall_score <= 100);
        for component in &score.components {
            prop_assert!(component.score >= 0.0 && component.score <= 100.0);
            prop_assert!(component.confidence >= 0.0 && component.confidence <= 1.0);
            prop_assert!(component.weight > 0.0);
        }
        prop_assert!((score.weight_sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn prop_scoring_is_deterministic(jd in job_profile(), candidate in candidate_profile()) {
        let first = score_once(&jd, &candidate);
        let second = score_once(&jd, &candidate);
        prop_assert_eq!(first.overall_score, second.overall_score);
        prop_assert_eq!(first.fallbacks_used, second.fallbacks_used);
    }

    #[test]
    fn prop_effective_weights_stay_normalized(
        raw in proptest::collection::vec(0.01f64..10.0, 4),
        culture_present in proptest::bool::ANY,
    ) {
        let total: f64 = raw.iter().sum();
        let base = ComponentWeights {
            skills: raw[0] / total,
            experience: raw[1] / total,
            education: raw[2] / total,
            culture: raw[3] / total,
        };
        let effective = EffectiveWeights::resolve(base, culture_present);
        prop_assert!((effective.sum() - 1.0).abs() < 1e-6);
        prop_assert_eq!(effective.culture.is_some(), culture_present);
    }
}
