//! Structured candidate profile parsed from a resume. Immutable after
//! creation; re-parsing the same (job, resume) pair overwrites the stored
//! profile wholesale rather than mutating it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::profiles::job::DegreeLevel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// One role in the candidate's work history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub company: String,
    pub title: String,
    pub start: NaiveDate,
    /// None means the role is current.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
}

impl WorkExperience {
    /// Duration of the role in fractional years, up to `today` for current
    /// roles.
    pub fn duration_years(&self, today: NaiveDate) -> f64 {
        let end = self.end.unwrap_or(today);
        let days = (end - self.start).num_days().max(0);
        days as f64 / 365.25
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub level: DegreeLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
}

/// Candidate profile produced once per (job, resume) upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub job_id: String,
    pub resume_id: String,
    #[serde(default)]
    pub contact: ContactInfo,
    /// Canonicalized by the resume worker's skill normalizer.
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<WorkExperience>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
}

impl CandidateProfile {
    /// Highest degree the candidate holds.
    pub fn highest_degree(&self) -> DegreeLevel {
        self.education
            .iter()
            .map(|e| e.level)
            .max()
            .unwrap_or(DegreeLevel::None)
    }

    /// Work history ordered by start date, earliest first.
    pub fn chronological_experience(&self) -> Vec<&WorkExperience> {
        let mut roles: Vec<&WorkExperience> = self.experience.iter().collect();
        roles.sort_by_key(|r| r.start);
        roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_duration_years_handles_current_role() {
        let role = WorkExperience {
            company: "Acme".to_string(),
            title: "Engineer".to_string(),
            start: date(2020, 1, 1),
            end: None,
            description: String::new(),
        };
        let years = role.duration_years(date(2024, 1, 1));
        assert!((years - 4.0).abs() < 0.05);
    }

    #[test]
    fn test_highest_degree_defaults_to_none() {
        let profile = CandidateProfile {
            job_id: "job-1".to_string(),
            resume_id: "res-1".to_string(),
            contact: ContactInfo::default(),
            skills: vec![],
            experience: vec![],
            education: vec![],
            certifications: vec![],
            languages: vec![],
        };
        assert_eq!(profile.highest_degree(), DegreeLevel::None);
    }

    #[test]
    fn test_chronological_experience_sorts_by_start() {
        let mut profile = CandidateProfile {
            job_id: "job-1".to_string(),
            resume_id: "res-1".to_string(),
            contact: ContactInfo::default(),
            skills: vec![],
            experience: vec![],
            education: vec![],
            certifications: vec![],
            languages: vec![],
        };
        profile.experience.push(WorkExperience {
            company: "B".to_string(),
            title: "Senior Engineer".to_string(),
            start: date(2021, 1, 1),
            end: None,
            description: String::new(),
        });
        profile.experience.push(WorkExperience {
            company: "A".to_string(),
            title: "Engineer".to_string(),
            start: date(2018, 1, 1),
            end: Some(date(2020, 12, 31)),
            description: String::new(),
        });
        let ordered = profile.chronological_experience();
        assert_eq!(ordered[0].company, "A");
        assert_eq!(ordered[1].company, "B");
    }
}
