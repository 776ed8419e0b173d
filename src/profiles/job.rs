//! Structured requirement profile extracted from a job description.
//!
//! Immutable once created: re-submitting a job description produces a new
//! profile with a bumped version, never an in-place update.

use serde::{Deserialize, Serialize};

/// A skill the job asks for, with its importance weight (0.0–1.0].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedSkill {
    pub name: String,
    pub importance: f64,
}

impl WeightedSkill {
    pub fn new(name: impl Into<String>, importance: f64) -> Self {
        Self {
            name: name.into(),
            importance,
        }
    }
}

/// Experience band the job targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceBand {
    pub min_years: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_years: Option<f64>,
}

/// Ordered academic degree levels. Ordering is load-bearing for the
/// education component of scoring.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum DegreeLevel {
    #[default]
    None,
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl DegreeLevel {
    /// Distance in levels below `required`; 0 when meeting or exceeding it.
    pub fn levels_below(self, required: DegreeLevel) -> u8 {
        (required as u8).saturating_sub(self as u8)
    }
}

/// Education the job requires or prefers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EducationRequirement {
    pub level: DegreeLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// When false the level is a preference and partial credit applies freely.
    #[serde(default)]
    pub required: bool,
}

/// Requirement profile for one job posting version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequirementProfile {
    pub job_id: String,
    pub required_skills: Vec<WeightedSkill>,
    #[serde(default)]
    pub preferred_skills: Vec<WeightedSkill>,
    pub experience: ExperienceBand,
    #[serde(default)]
    pub education: EducationRequirement,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    /// Declared culture attributes; empty means the culture component is
    /// skipped and its weight redistributed.
    #[serde(default)]
    pub culture_attributes: Vec<String>,
    /// Bumped on re-submission; profiles are never mutated.
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_version() -> u32 {
    1
}

impl JobRequirementProfile {
    /// All skills with their weights, required first.
    pub fn all_skills(&self) -> impl Iterator<Item = &WeightedSkill> {
        self.required_skills.iter().chain(self.preferred_skills.iter())
    }

    /// Keywords describing the job's domain, used for experience relevance.
    pub fn domain_keywords(&self) -> Vec<String> {
        self.all_skills()
            .map(|s| s.name.to_lowercase())
            .chain(
                self.responsibilities
                    .iter()
                    .flat_map(|r| r.split_whitespace())
                    .filter(|w| w.len() > 3)
                    .map(str::to_lowercase),
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_level_ordering() {
        assert!(DegreeLevel::Master > DegreeLevel::Bachelor);
        assert!(DegreeLevel::None < DegreeLevel::HighSchool);
        assert_eq!(DegreeLevel::Bachelor.levels_below(DegreeLevel::Master), 1);
        assert_eq!(DegreeLevel::Doctorate.levels_below(DegreeLevel::Bachelor), 0);
    }

    #[test]
    fn test_degree_level_serde_snake_case() {
        let json = serde_json::to_string(&DegreeLevel::HighSchool).unwrap();
        assert_eq!(json, "\"high_school\"");
    }

    #[test]
    fn test_domain_keywords_include_skills_and_responsibilities() {
        let profile = JobRequirementProfile {
            job_id: "job-1".to_string(),
            required_skills: vec![WeightedSkill::new("React", 1.0)],
            preferred_skills: vec![],
            experience: ExperienceBand {
                min_years: 2.0,
                max_years: None,
            },
            education: EducationRequirement::default(),
            responsibilities: vec!["Build frontend dashboards".to_string()],
            culture_attributes: vec![],
            version: 1,
        };
        let keywords = profile.domain_keywords();
        assert!(keywords.contains(&"react".to_string()));
        assert!(keywords.contains(&"frontend".to_string()));
        // Short stop-words are filtered.
        assert!(!keywords.contains(&"the".to_string()));
    }
}
