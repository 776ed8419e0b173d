//! Document-store collaborator accessed through a narrow repository trait.
//! Upsert semantics are what make the extraction workers idempotent:
//! reprocessing a (job, resume) pair overwrites rather than duplicates.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::Result;
use crate::profiles::{CandidateProfile, JobRequirementProfile, MatchScore};

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn upsert_job_profile(&self, profile: JobRequirementProfile) -> Result<()>;
    async fn get_job_profile(&self, job_id: &str) -> Result<Option<JobRequirementProfile>>;

    async fn upsert_candidate_profile(&self, profile: CandidateProfile) -> Result<()>;
    async fn get_candidate_profile(
        &self,
        job_id: &str,
        resume_id: &str,
    ) -> Result<Option<CandidateProfile>>;

    /// Scores are append-style: saving for an existing key replaces the
    /// stored value with the newer immutable score.
    async fn save_score(&self, score: MatchScore) -> Result<()>;
    async fn get_score(&self, job_id: &str, resume_id: &str) -> Result<Option<MatchScore>>;
}

/// Process-local repository used for wiring and tests.
#[derive(Default)]
pub struct InMemoryRepository {
    jobs: DashMap<String, JobRequirementProfile>,
    candidates: DashMap<(String, String), CandidateProfile>,
    scores: DashMap<(String, String), MatchScore>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryRepository {
    async fn upsert_job_profile(&self, profile: JobRequirementProfile) -> Result<()> {
        self.jobs.insert(profile.job_id.clone(), profile);
        Ok(())
    }

    async fn get_job_profile(&self, job_id: &str) -> Result<Option<JobRequirementProfile>> {
        Ok(self.jobs.get(job_id).map(|p| p.clone()))
    }

    async fn upsert_candidate_profile(&self, profile: CandidateProfile) -> Result<()> {
        let key = (profile.job_id.clone(), profile.resume_id.clone());
        self.candidates.insert(key, profile);
        Ok(())
    }

    async fn get_candidate_profile(
        &self,
        job_id: &str,
        resume_id: &str,
    ) -> Result<Option<CandidateProfile>> {
        Ok(self
            .candidates
            .get(&(job_id.to_string(), resume_id.to_string()))
            .map(|p| p.clone()))
    }

    async fn save_score(&self, score: MatchScore) -> Result<()> {
        let key = (score.job_id.clone(), score.resume_id.clone());
        self.scores.insert(key, score);
        Ok(())
    }

    async fn get_score(&self, job_id: &str, resume_id: &str) -> Result<Option<MatchScore>> {
        Ok(self
            .scores
            .get(&(job_id.to_string(), resume_id.to_string()))
            .map(|s| s.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::{ExperienceBand, WeightedSkill};

    fn job_profile(job_id: &str, version: u32) -> JobRequirementProfile {
        JobRequirementProfile {
            job_id: job_id.to_string(),
            required_skills: vec![WeightedSkill::new("Rust", 1.0)],
            preferred_skills: vec![],
            experience: ExperienceBand {
                min_years: 2.0,
                max_years: None,
            },
            education: Default::default(),
            responsibilities: vec![],
            culture_attributes: vec![],
            version,
        }
    }

    #[tokio::test]
    async fn test_upsert_overwrites_instead_of_duplicating() {
        let repo = InMemoryRepository::new();
        repo.upsert_job_profile(job_profile("job-1", 1)).await.unwrap();
        repo.upsert_job_profile(job_profile("job-1", 2)).await.unwrap();

        let stored = repo.get_job_profile("job-1").await.unwrap().unwrap();
        assert_eq!(stored.version, 2);
        assert_eq!(repo.jobs.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_keys_return_none() {
        let repo = InMemoryRepository::new();
        assert!(repo.get_job_profile("absent").await.unwrap().is_none());
        assert!(repo
            .get_candidate_profile("absent", "absent")
            .await
            .unwrap()
            .is_none());
        assert!(repo.get_score("absent", "absent").await.unwrap().is_none());
    }
}
