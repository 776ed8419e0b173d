//! # Experience Matching
//!
//! Relevant-years coverage against the job's minimum, with three bounded
//! adjustments: recency (+0–5), career progression (+0–10), and leadership
//! signals (+0–5). The final score is capped at 100.

use chrono::NaiveDate;

use crate::profiles::{CandidateProfile, JobRequirementProfile, WorkExperience};

const RECENCY_BONUS_MAX: f64 = 5.0;
const PROGRESSION_BONUS_MAX: f64 = 10.0;
const LEADERSHIP_BONUS_MAX: f64 = 5.0;

const LEADERSHIP_INDICATORS: &[&str] = &[
    "led ",
    "leading ",
    "managed",
    "mentored",
    "head of",
    "supervised",
    "leadership",
    "built the team",
    "hired",
];

#[derive(Debug, Clone)]
pub struct ExperienceOutcome {
    pub score: f64,
    pub confidence: f64,
    pub breakdown: Vec<String>,
}

pub fn score_experience(
    job: &JobRequirementProfile,
    candidate: &CandidateProfile,
    recency_window_years: f64,
    today: NaiveDate,
) -> ExperienceOutcome {
    let mut breakdown = Vec::new();
    let roles = candidate.chronological_experience();

    if roles.is_empty() {
        return ExperienceOutcome {
            score: 0.0,
            confidence: 0.2,
            breakdown: vec!["no work history provided".to_string()],
        };
    }

    let total_years: f64 = roles.iter().map(|r| r.duration_years(today)).sum();
    let keywords = job.domain_keywords();
    let relevant_years: f64 = roles
        .iter()
        .filter(|r| is_relevant(r, &keywords))
        .map(|r| r.duration_years(today))
        .sum();
    breakdown.push(format!(
        "{total_years:.1} total years, {relevant_years:.1} relevant"
    ));

    let required_min = job.experience.min_years;
    let base = if required_min <= 0.0 {
        // "Any" experience requirement: having history at all satisfies it.
        100.0
    } else {
        (100.0 * relevant_years / required_min).min(100.0)
    };

    let recency = recency_bonus(&roles, recency_window_years, today);
    if recency > 0.0 {
        breakdown.push(format!("recency bonus +{recency:.1}"));
    }
    let progression = progression_bonus(&roles);
    if progression > 0.0 {
        breakdown.push(format!("career progression bonus +{progression:.1}"));
    }
    let leadership = leadership_bonus(&roles);
    if leadership > 0.0 {
        breakdown.push(format!("leadership bonus +{leadership:.1}"));
    }

    let score = (base + recency + progression + leadership).min(100.0);
    let confidence = if relevant_years > 0.0 { 0.9 } else { 0.6 };

    ExperienceOutcome {
        score,
        confidence,
        breakdown,
    }
}

fn is_relevant(role: &WorkExperience, keywords: &[String]) -> bool {
    let haystack = format!("{} {}", role.title, role.description).to_lowercase();
    keywords.iter().any(|k| haystack.contains(k.as_str()))
}

/// Scaled by how much of the recency window is covered by employment.
fn recency_bonus(roles: &[&WorkExperience], window_years: f64, today: NaiveDate) -> f64 {
    let window_days = (window_years * 365.25) as i64;
    let window_start = today - chrono::Duration::days(window_days);

    let mut covered_days = 0i64;
    for role in roles {
        let start = role.start.max(window_start);
        let end = role.end.unwrap_or(today).min(today);
        covered_days += (end - start).num_days().max(0);
    }
    let coverage = (covered_days as f64 / window_days as f64).clamp(0.0, 1.0);
    RECENCY_BONUS_MAX * coverage
}

/// Seniority ladder detected from title keywords; each ascent between
/// sequential roles earns credit.
fn progression_bonus(roles: &[&WorkExperience]) -> f64 {
    if roles.len() < 2 {
        return 0.0;
    }
    let ranks: Vec<u8> = roles.iter().map(|r| seniority_rank(&r.title)).collect();
    let ascents = ranks.windows(2).filter(|w| w[1] > w[0]).count();
    (ascents as f64 * 5.0).min(PROGRESSION_BONUS_MAX)
}

fn seniority_rank(title: &str) -> u8 {
    let title = title.to_lowercase();
    // Checked from most to least senior so "senior engineering manager"
    // ranks as manager.
    if ["chief", "vp", "vice president", "director", "head"]
        .iter()
        .any(|k| title.contains(k))
    {
        6
    } else if title.contains("manager") {
        5
    } else if ["principal", "staff", "lead"].iter().any(|k| title.contains(k)) {
        4
    } else if title.contains("senior") || title.contains("sr.") {
        3
    } else if title.contains("junior") || title.contains("jr.") {
        1
    } else if title.contains("intern") {
        0
    } else {
        2
    }
}

fn leadership_bonus(roles: &[&WorkExperience]) -> f64 {
    let hits = roles
        .iter()
        .filter(|r| {
            let haystack = format!("{} {}", r.title, r.description).to_lowercase();
            LEADERSHIP_INDICATORS.iter().any(|k| haystack.contains(k))
        })
        .count();
    (hits as f64 * 2.5).min(LEADERSHIP_BONUS_MAX)
}
