//! # Education Matching
//!
//! Full credit when the candidate's highest degree meets or exceeds the
//! required level and the field is relevant or unspecified; partial credit
//! for lower-but-adjacent levels; zero only when a degree is explicitly
//! required and absent.

use crate::profiles::{CandidateProfile, DegreeLevel, EducationRequirement};

#[derive(Debug, Clone)]
pub struct EducationOutcome {
    pub score: f64,
    pub confidence: f64,
    pub breakdown: Vec<String>,
}

pub fn score_education(
    requirement: &EducationRequirement,
    candidate: &CandidateProfile,
) -> EducationOutcome {
    if requirement.level == DegreeLevel::None {
        return EducationOutcome {
            score: 100.0,
            confidence: 1.0,
            breakdown: vec!["no education requirement".to_string()],
        };
    }

    let highest = candidate.highest_degree();

    if highest == DegreeLevel::None {
        return if requirement.required {
            EducationOutcome {
                score: 0.0,
                confidence: 1.0,
                breakdown: vec!["degree explicitly required but absent".to_string()],
            }
        } else {
            EducationOutcome {
                score: 50.0,
                confidence: 0.5,
                breakdown: vec!["preferred degree absent".to_string()],
            }
        };
    }

    let gap = highest.levels_below(requirement.level);
    if gap == 0 {
        let (score, note) = match field_relevance(requirement, candidate) {
            FieldRelevance::RelevantOrUnspecified => (100.0, "level met, field relevant"),
            FieldRelevance::Mismatch => (70.0, "level met, field differs"),
        };
        return EducationOutcome {
            score,
            confidence: 1.0,
            breakdown: vec![note.to_string()],
        };
    }

    // Adjacent-lower levels earn partial credit.
    let score = match gap {
        1 => 70.0,
        2 => 40.0,
        _ => 20.0,
    };
    EducationOutcome {
        score,
        confidence: 0.8,
        breakdown: vec![format!("{gap} level(s) below the required degree")],
    }
}

enum FieldRelevance {
    RelevantOrUnspecified,
    Mismatch,
}

fn field_relevance(
    requirement: &EducationRequirement,
    candidate: &CandidateProfile,
) -> FieldRelevance {
    let Some(required_field) = requirement.field.as_deref() else {
        return FieldRelevance::RelevantOrUnspecified;
    };
    let required_field = required_field.to_lowercase();

    let relevant = candidate.education.iter().any(|entry| {
        entry
            .field
            .as_deref()
            .map(|f| {
                let f = f.to_lowercase();
                f.contains(&required_field) || required_field.contains(&f)
            })
            // Entries without a declared field count as unspecified, not a mismatch.
            .unwrap_or(true)
    });
    if relevant {
        FieldRelevance::RelevantOrUnspecified
    } else {
        FieldRelevance::Mismatch
    }
}
