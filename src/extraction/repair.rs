//! Validation and repair of untyped model responses. This is the boundary
//! where `serde_json::Value` becomes a tagged result: either a structured
//! profile (possibly repaired with defaults) or a validation error. Untyped
//! data never travels past this module.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{MatchflowError, Result};
use crate::extraction::synonyms::SkillNormalizer;
use crate::profiles::{
    CandidateProfile, ContactInfo, DegreeLevel, EducationEntry, EducationRequirement,
    ExperienceBand, JobRequirementProfile, WeightedSkill, WorkExperience,
};

/// A repaired profile plus how much of the schema the raw response actually
/// satisfied before defaults were applied.
pub struct Repaired<T> {
    pub profile: T,
    pub confidence: f64,
}

/// Validate and repair a job-description extraction. Missing optional fields
/// default to empty lists / "any"; a response that is not even a JSON object
/// is a validation failure.
pub fn repair_jd_profile(job_id: &str, raw: &Value) -> Result<Repaired<JobRequirementProfile>> {
    let obj = raw.as_object().ok_or_else(|| {
        MatchflowError::Validation("model response for JD extraction is not a JSON object".to_string())
    })?;

    let mut present = 0usize;
    let tracked_fields = 4usize;

    let required_skills = parse_weighted_skills(obj.get("required_skills"), &mut present);
    let preferred_skills = parse_weighted_skills(obj.get("preferred_skills"), &mut present);

    // "any" experience requirement repairs to zero minimum years.
    let experience = match obj.get("experience") {
        Some(Value::Object(exp)) => {
            present += 1;
            ExperienceBand {
                min_years: exp.get("min_years").and_then(Value::as_f64).unwrap_or(0.0),
                max_years: exp.get("max_years").and_then(Value::as_f64),
            }
        }
        _ => ExperienceBand {
            min_years: 0.0,
            max_years: None,
        },
    };

    let education = match obj.get("education") {
        Some(Value::Object(edu)) => {
            present += 1;
            EducationRequirement {
                level: parse_degree_level(edu.get("level")),
                field: edu.get("field").and_then(Value::as_str).map(str::to_string),
                required: edu.get("required").and_then(Value::as_bool).unwrap_or(false),
            }
        }
        _ => EducationRequirement::default(),
    };

    let profile = JobRequirementProfile {
        job_id: job_id.to_string(),
        required_skills,
        preferred_skills,
        experience,
        education,
        responsibilities: parse_string_list(obj.get("responsibilities")),
        culture_attributes: parse_string_list(obj.get("culture_attributes")),
        version: 1,
    };

    Ok(Repaired {
        profile,
        confidence: present as f64 / tracked_fields as f64,
    })
}

/// Validate and repair a resume parse. Skills run through the normalizer;
/// unparseable work-history entries are dropped and count against confidence.
pub fn repair_candidate_profile(
    job_id: &str,
    resume_id: &str,
    raw: &Value,
    normalizer: &SkillNormalizer,
) -> Result<Repaired<CandidateProfile>> {
    let obj = raw.as_object().ok_or_else(|| {
        MatchflowError::Validation("model response for resume parse is not a JSON object".to_string())
    })?;

    let raw_skills = parse_string_list(obj.get("skills"));
    if raw_skills.is_empty() && !obj.contains_key("skills") {
        return Err(MatchflowError::Validation(
            "resume parse is missing the skills field".to_string(),
        ));
    }
    let skills = normalizer.normalize_all(&raw_skills);

    let mut dropped_entries = 0usize;
    let mut experience = Vec::new();
    if let Some(Value::Array(roles)) = obj.get("experience") {
        for role in roles {
            match parse_work_experience(role) {
                Some(parsed) => experience.push(parsed),
                None => dropped_entries += 1,
            }
        }
    }

    let education = match obj.get("education") {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|e| {
                let obj = e.as_object()?;
                Some(EducationEntry {
                    level: parse_degree_level(obj.get("level")),
                    field: obj.get("field").and_then(Value::as_str).map(str::to_string),
                    institution: obj
                        .get("institution")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                })
            })
            .collect(),
        _ => Vec::new(),
    };

    let contact = match obj.get("contact") {
        Some(Value::Object(c)) => ContactInfo {
            name: c.get("name").and_then(Value::as_str).map(str::to_string),
            email: c.get("email").and_then(Value::as_str).map(str::to_string),
            phone: c.get("phone").and_then(Value::as_str).map(str::to_string),
            location: c.get("location").and_then(Value::as_str).map(str::to_string),
        },
        _ => ContactInfo::default(),
    };

    let profile = CandidateProfile {
        job_id: job_id.to_string(),
        resume_id: resume_id.to_string(),
        contact,
        skills,
        experience,
        education,
        certifications: parse_string_list(obj.get("certifications")),
        languages: parse_string_list(obj.get("languages")),
    };

    let total_entries = profile.experience.len() + dropped_entries;
    let experience_confidence = if total_entries == 0 {
        1.0
    } else {
        profile.experience.len() as f64 / total_entries as f64
    };
    let skills_confidence = if profile.skills.is_empty() { 0.5 } else { 1.0 };

    Ok(Repaired {
        profile,
        confidence: (experience_confidence + skills_confidence) / 2.0,
    })
}

fn parse_weighted_skills(value: Option<&Value>, present: &mut usize) -> Vec<WeightedSkill> {
    match value {
        Some(Value::Array(items)) => {
            *present += 1;
            items
                .iter()
                .filter_map(|item| match item {
                    // Either {"name": "...", "importance": 0.8} or a bare string.
                    Value::Object(obj) => Some(WeightedSkill {
                        name: obj.get("name")?.as_str()?.to_string(),
                        importance: obj
                            .get("importance")
                            .and_then(Value::as_f64)
                            .unwrap_or(1.0)
                            .clamp(0.0, 1.0),
                    }),
                    Value::String(name) => Some(WeightedSkill::new(name.clone(), 1.0)),
                    _ => None,
                })
                .collect()
        }
        _ => Vec::new(),
    }
}

fn parse_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_degree_level(value: Option<&Value>) -> DegreeLevel {
    let Some(text) = value.and_then(Value::as_str) else {
        return DegreeLevel::None;
    };
    match text.to_lowercase().as_str() {
        "high_school" | "highschool" | "high school" => DegreeLevel::HighSchool,
        "associate" | "associates" => DegreeLevel::Associate,
        "bachelor" | "bachelors" | "bs" | "ba" => DegreeLevel::Bachelor,
        "master" | "masters" | "ms" | "ma" | "mba" => DegreeLevel::Master,
        "doctorate" | "phd" | "doctoral" => DegreeLevel::Doctorate,
        _ => DegreeLevel::None,
    }
}

fn parse_work_experience(value: &Value) -> Option<WorkExperience> {
    let obj = value.as_object()?;
    Some(WorkExperience {
        company: obj.get("company")?.as_str()?.to_string(),
        title: obj.get("title")?.as_str()?.to_string(),
        start: parse_date(obj.get("start")?.as_str()?)?,
        end: match obj.get("end").and_then(Value::as_str) {
            Some(end) => Some(parse_date(end)?),
            None => None,
        },
        description: obj
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

/// Dates arrive as `YYYY-MM-DD` or `YYYY-MM`; month-only dates snap to the
/// first of the month.
fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_jd_repair_defaults_missing_fields() {
        let raw = json!({
            "required_skills": [{"name": "React", "importance": 1.0}],
        });
        let repaired = repair_jd_profile("job-1", &raw).expect("repair");
        assert_eq!(repaired.profile.required_skills.len(), 1);
        assert!(repaired.profile.preferred_skills.is_empty());
        // Missing experience repairs to "any".
        assert_eq!(repaired.profile.experience.min_years, 0.0);
        assert!((repaired.confidence - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_jd_repair_rejects_non_object() {
        let raw = json!("just a string");
        assert!(matches!(
            repair_jd_profile("job-1", &raw),
            Err(MatchflowError::Validation(_))
        ));
    }

    #[test]
    fn test_jd_repair_accepts_bare_string_skills() {
        let raw = json!({
            "required_skills": ["React", "GraphQL"],
            "experience": {"min_years": 2}
        });
        let repaired = repair_jd_profile("job-1", &raw).expect("repair");
        assert_eq!(repaired.profile.required_skills[0].importance, 1.0);
        assert_eq!(repaired.profile.experience.min_years, 2.0);
    }

    #[test]
    fn test_candidate_repair_normalizes_skills() {
        let raw = json!({
            "skills": ["JS", "React", "reactjs"],
            "experience": [
                {"company": "Acme", "title": "Engineer", "start": "2020-01", "end": "2022-06"}
            ]
        });
        let repaired =
            repair_candidate_profile("job-1", "res-1", &raw, &SkillNormalizer::with_defaults())
                .expect("repair");
        assert_eq!(repaired.profile.skills, vec!["javascript", "react"]);
        assert_eq!(repaired.profile.experience.len(), 1);
        assert!((repaired.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_candidate_repair_drops_unparseable_roles() {
        let raw = json!({
            "skills": ["python"],
            "experience": [
                {"company": "Acme", "title": "Engineer", "start": "not-a-date"},
                {"company": "Beta", "title": "Engineer", "start": "2021-03-01"}
            ]
        });
        let repaired =
            repair_candidate_profile("job-1", "res-1", &raw, &SkillNormalizer::with_defaults())
                .expect("repair");
        assert_eq!(repaired.profile.experience.len(), 1);
        assert!(repaired.confidence < 1.0);
    }

    #[test]
    fn test_candidate_repair_requires_skills_field() {
        let raw = json!({"experience": []});
        assert!(matches!(
            repair_candidate_profile("job-1", "res-1", &raw, &SkillNormalizer::with_defaults()),
            Err(MatchflowError::Validation(_))
        ));
    }

    #[test]
    fn test_degree_level_parsing_variants() {
        assert_eq!(parse_degree_level(Some(&json!("PhD"))), DegreeLevel::Doctorate);
        assert_eq!(parse_degree_level(Some(&json!("bachelors"))), DegreeLevel::Bachelor);
        assert_eq!(parse_degree_level(None), DegreeLevel::None);
    }
}
