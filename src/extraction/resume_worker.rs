//! # Resume Extraction Worker
//!
//! Consumes `job.resume.submitted`, fetches the resume binary from object
//! storage, submits it to the vision-capable model, canonicalizes the
//! resulting skill list, and publishes `analysis.resume.parsed`.
//!
//! The same delivery/processing failure split as the JD worker applies:
//! storage and model transport problems are retryable delivery failures,
//! schema problems are bounded and then surfaced as `analysis.resume.failed`.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::collaborators::{
    ExtractionInput, FileStore, ProfileRepository, VisionModel, RESUME_SCHEMA,
};
use crate::config::CollaboratorConfig;
use crate::contracts::{ResumeParsed, ResumeSubmitted, StageFailed};
use crate::error::{MatchflowError, Result};
use crate::extraction::repair::{repair_candidate_profile, Repaired};
use crate::extraction::synonyms::SkillNormalizer;
use crate::failure::FailurePublisher;
use crate::messaging::{
    pair_correlation_id, subjects, EventHandler, HandlerOutcome, MessageBroker, ProcessingEvent,
};
use crate::profiles::CandidateProfile;

pub struct ResumeExtractionWorker {
    model: Arc<dyn VisionModel>,
    storage: Arc<dyn FileStore>,
    repository: Arc<dyn ProfileRepository>,
    broker: Arc<dyn MessageBroker>,
    failures: FailurePublisher,
    normalizer: SkillNormalizer,
    config: CollaboratorConfig,
}

impl ResumeExtractionWorker {
    pub fn new(
        model: Arc<dyn VisionModel>,
        storage: Arc<dyn FileStore>,
        repository: Arc<dyn ProfileRepository>,
        broker: Arc<dyn MessageBroker>,
        normalizer: SkillNormalizer,
        config: CollaboratorConfig,
    ) -> Self {
        let failures = FailurePublisher::new(broker.clone());
        Self {
            model,
            storage,
            repository,
            broker,
            failures,
            normalizer,
            config,
        }
    }

    async fn fetch(&self, file_ref: &str) -> Result<Vec<u8>> {
        tokio::time::timeout(
            self.config.storage_timeout(),
            self.storage.fetch_file(file_ref),
        )
        .await
        .map_err(|_| MatchflowError::DependencyTimeout {
            collaborator: "file_store".to_string(),
            timeout_ms: self.config.storage_timeout_ms,
        })?
    }

    async fn parse(
        &self,
        submitted: &ResumeSubmitted,
        bytes: Vec<u8>,
    ) -> Result<Repaired<CandidateProfile>> {
        let mut last_validation_error = None;

        for call in 0..=self.config.schema_retry_limit {
            let raw = tokio::time::timeout(
                self.config.llm_timeout(),
                self.model.extract_structured(
                    ExtractionInput::Document {
                        bytes: bytes.clone(),
                        filename: submitted.original_filename.clone(),
                    },
                    &RESUME_SCHEMA,
                ),
            )
            .await
            .map_err(|_| MatchflowError::DependencyTimeout {
                collaborator: "vision_model".to_string(),
                timeout_ms: self.config.llm_timeout_ms,
            })??;

            match repair_candidate_profile(
                &submitted.job_id,
                &submitted.resume_id,
                &raw,
                &self.normalizer,
            ) {
                Ok(repaired) => return Ok(repaired),
                Err(e) => {
                    warn!(
                        job_id = %submitted.job_id,
                        resume_id = %submitted.resume_id,
                        call = call + 1,
                        error = %e,
                        "Resume parse failed schema validation, retrying model call"
                    );
                    last_validation_error = Some(e);
                }
            }
        }

        Err(last_validation_error.unwrap_or_else(|| {
            MatchflowError::Validation("resume parse produced no response".to_string())
        }))
    }
}

#[async_trait]
impl EventHandler for ResumeExtractionWorker {
    async fn handle(&self, _subject: &str, event: &ProcessingEvent) -> HandlerOutcome {
        let submitted: ResumeSubmitted = match event.decode() {
            Ok(submitted) => submitted,
            Err(e) => return HandlerOutcome::Terminal(format!("undecodable ResumeSubmitted: {e}")),
        };
        debug!(
            job_id = %submitted.job_id,
            resume_id = %submitted.resume_id,
            attempt = event.attempt,
            "📄 Parsing resume"
        );
        let started = Instant::now();

        let bytes = match self.fetch(&submitted.file_ref).await {
            Ok(bytes) => bytes,
            Err(e) => return HandlerOutcome::Retry(format!("file fetch failed: {e}")),
        };

        match self.parse(&submitted, bytes).await {
            Ok(repaired) => {
                let parsed = ResumeParsed {
                    schema_version: 1,
                    job_id: submitted.job_id.clone(),
                    resume_id: submitted.resume_id.clone(),
                    candidate_profile: repaired.profile.clone(),
                    processing_time_ms: started.elapsed().as_millis() as u64,
                    confidence: repaired.confidence,
                };

                if let Err(e) = self
                    .repository
                    .upsert_candidate_profile(repaired.profile)
                    .await
                {
                    return HandlerOutcome::Retry(format!("profile upsert failed: {e}"));
                }

                let correlation = pair_correlation_id(&submitted.job_id, &submitted.resume_id);
                let out = match ProcessingEvent::new(
                    subjects::ANALYSIS_RESUME_PARSED,
                    correlation,
                    &parsed,
                ) {
                    Ok(out) => out,
                    Err(e) => return HandlerOutcome::Retry(format!("envelope build failed: {e}")),
                };
                if let Err(e) = self
                    .broker
                    .publish(subjects::ANALYSIS_RESUME_PARSED, out)
                    .await
                {
                    return HandlerOutcome::Retry(format!("publish failed: {e}"));
                }

                info!(
                    job_id = %submitted.job_id,
                    resume_id = %submitted.resume_id,
                    skills = parsed.candidate_profile.skills.len(),
                    processing_time_ms = parsed.processing_time_ms,
                    "✅ Resume parsed"
                );
                HandlerOutcome::Ack
            }
            Err(e) if e.is_retryable() => HandlerOutcome::Retry(e.to_string()),
            Err(e) => {
                self.failures
                    .publish(
                        subjects::ANALYSIS_RESUME_FAILED,
                        StageFailed::new(
                            submitted.job_id.clone(),
                            Some(submitted.resume_id.clone()),
                            e.error_code(),
                            e.to_string(),
                            event.attempt,
                        ),
                    )
                    .await;
                HandlerOutcome::Ack
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{ExtractionSchema, InMemoryRepository, SemanticVerdict};
    use crate::config::BrokerConfig;
    use crate::messaging::InMemoryBroker;
    use serde_json::json;

    struct StaticModel {
        response: serde_json::Value,
    }

    #[async_trait]
    impl VisionModel for StaticModel {
        async fn extract_structured(
            &self,
            _input: ExtractionInput,
            _schema: &ExtractionSchema,
        ) -> Result<serde_json::Value> {
            Ok(self.response.clone())
        }

        async fn compare_skills(
            &self,
            _required: &[String],
            _candidate_skills: &[String],
        ) -> Result<Vec<SemanticVerdict>> {
            Ok(vec![])
        }
    }

    struct StaticStore;

    #[async_trait]
    impl FileStore for StaticStore {
        async fn fetch_file(&self, _file_ref: &str) -> Result<Vec<u8>> {
            Ok(b"%PDF-1.4 resume bytes".to_vec())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl FileStore for FailingStore {
        async fn fetch_file(&self, file_ref: &str) -> Result<Vec<u8>> {
            Err(MatchflowError::Delivery(format!("object store down for {file_ref}")))
        }
    }

    fn submitted_event() -> ProcessingEvent {
        let submitted = ResumeSubmitted {
            schema_version: 1,
            job_id: "job-1".to_string(),
            resume_id: "res-1".to_string(),
            file_ref: "bucket/res-1.pdf".to_string(),
            original_filename: "resume.pdf".to_string(),
        };
        ProcessingEvent::new(subjects::JOB_RESUME_SUBMITTED, "job-1:res-1", &submitted).unwrap()
    }

    #[tokio::test]
    async fn test_successful_parse_stores_normalized_profile() {
        let repository = Arc::new(InMemoryRepository::new());
        let worker = ResumeExtractionWorker::new(
            Arc::new(StaticModel {
                response: json!({"skills": ["JS", "reactjs"]}),
            }),
            Arc::new(StaticStore),
            repository.clone(),
            Arc::new(InMemoryBroker::new(BrokerConfig::default())),
            SkillNormalizer::with_defaults(),
            CollaboratorConfig::default(),
        );

        let outcome = worker
            .handle(subjects::JOB_RESUME_SUBMITTED, &submitted_event())
            .await;
        assert_eq!(outcome, HandlerOutcome::Ack);

        let stored = repository
            .get_candidate_profile("job-1", "res-1")
            .await
            .unwrap()
            .expect("profile stored");
        assert_eq!(stored.skills, vec!["javascript", "react"]);
    }

    #[tokio::test]
    async fn test_storage_failure_is_retryable() {
        let worker = ResumeExtractionWorker::new(
            Arc::new(StaticModel {
                response: json!({"skills": []}),
            }),
            Arc::new(FailingStore),
            Arc::new(InMemoryRepository::new()),
            Arc::new(InMemoryBroker::new(BrokerConfig::default())),
            SkillNormalizer::with_defaults(),
            CollaboratorConfig::default(),
        );

        let outcome = worker
            .handle(subjects::JOB_RESUME_SUBMITTED, &submitted_event())
            .await;
        assert!(matches!(outcome, HandlerOutcome::Retry(_)));
    }

    #[tokio::test]
    async fn test_reprocessing_overwrites_profile() {
        let repository = Arc::new(InMemoryRepository::new());
        let worker = ResumeExtractionWorker::new(
            Arc::new(StaticModel {
                response: json!({"skills": ["python"]}),
            }),
            Arc::new(StaticStore),
            repository.clone(),
            Arc::new(InMemoryBroker::new(BrokerConfig::default())),
            SkillNormalizer::with_defaults(),
            CollaboratorConfig::default(),
        );

        let event = submitted_event();
        assert_eq!(
            worker.handle(subjects::JOB_RESUME_SUBMITTED, &event).await,
            HandlerOutcome::Ack
        );
        assert_eq!(
            worker.handle(subjects::JOB_RESUME_SUBMITTED, &event).await,
            HandlerOutcome::Ack
        );

        let stored = repository
            .get_candidate_profile("job-1", "res-1")
            .await
            .unwrap()
            .expect("profile stored");
        assert_eq!(stored.skills, vec!["python"]);
    }
}
