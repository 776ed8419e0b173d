//! # Cultural Fit (optional dimension)
//!
//! Computed only when the job posting declares culture attributes; otherwise
//! the dimension is absent and its weight redistributes. Alignment per
//! attribute is a keyword heuristic over the candidate's work descriptions,
//! certifications, and languages, averaged across attributes.

use crate::profiles::CandidateProfile;

#[derive(Debug, Clone)]
pub struct CultureOutcome {
    pub score: f64,
    pub confidence: f64,
    pub breakdown: Vec<String>,
}

/// Returns None when the job declares no culture attributes.
pub fn score_culture(
    culture_attributes: &[String],
    candidate: &CandidateProfile,
) -> Option<CultureOutcome> {
    if culture_attributes.is_empty() {
        return None;
    }

    let haystack = candidate_text(candidate);
    let mut breakdown = Vec::new();
    let mut aligned = 0usize;

    for attribute in culture_attributes {
        let tokens: Vec<String> = attribute
            .split_whitespace()
            .map(str::to_lowercase)
            .filter(|t| t.len() > 2)
            .collect();
        let hit = !tokens.is_empty() && tokens.iter().any(|t| haystack.contains(t.as_str()));
        if hit {
            aligned += 1;
            breakdown.push(format!("{attribute}: aligned"));
        } else {
            breakdown.push(format!("{attribute}: no signal"));
        }
    }

    let score = aligned as f64 / culture_attributes.len() as f64 * 100.0;
    Some(CultureOutcome {
        score,
        // Keyword alignment is weak evidence by construction.
        confidence: 0.6,
        breakdown,
    })
}

fn candidate_text(candidate: &CandidateProfile) -> String {
    let mut text = String::new();
    for role in &candidate.experience {
        text.push_str(&role.title);
        text.push(' ');
        text.push_str(&role.description);
        text.push(' ');
    }
    for item in candidate.certifications.iter().chain(candidate.languages.iter()) {
        text.push_str(item);
        text.push(' ');
    }
    text.to_lowercase()
}
