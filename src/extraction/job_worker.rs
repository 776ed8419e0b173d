//! # Job Extraction Worker
//!
//! Consumes `job.jd.submitted`, asks the language model for a structured
//! requirement profile, validates and repairs the response, and publishes
//! `analysis.jd.extracted`.
//!
//! Schema-validation failures get a small bounded number of fresh model calls
//! and are then treated as a *processing* failure: the message is
//! acknowledged (redelivering an unfixable input forever helps nobody) and
//! `analysis.jd.failed` is emitted instead. Transport failures and timeouts
//! stay *delivery* failures and go back to the broker for redelivery.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::collaborators::{ExtractionInput, ProfileRepository, VisionModel, JD_SCHEMA};
use crate::config::CollaboratorConfig;
use crate::contracts::{JdExtracted, JdSubmitted, StageFailed};
use crate::error::{MatchflowError, Result};
use crate::extraction::repair::{repair_jd_profile, Repaired};
use crate::failure::FailurePublisher;
use crate::messaging::{
    subjects, EventHandler, HandlerOutcome, MessageBroker, ProcessingEvent,
};
use crate::profiles::JobRequirementProfile;

pub struct JobExtractionWorker {
    model: Arc<dyn VisionModel>,
    repository: Arc<dyn ProfileRepository>,
    broker: Arc<dyn MessageBroker>,
    failures: FailurePublisher,
    config: CollaboratorConfig,
}

impl JobExtractionWorker {
    pub fn new(
        model: Arc<dyn VisionModel>,
        repository: Arc<dyn ProfileRepository>,
        broker: Arc<dyn MessageBroker>,
        config: CollaboratorConfig,
    ) -> Self {
        let failures = FailurePublisher::new(broker.clone());
        Self {
            model,
            repository,
            broker,
            failures,
            config,
        }
    }

    /// Call the model and repair its response, retrying fresh model calls on
    /// schema-validation failures only.
    async fn extract(&self, submitted: &JdSubmitted) -> Result<Repaired<JobRequirementProfile>> {
        let mut last_validation_error = None;

        for call in 0..=self.config.schema_retry_limit {
            let raw = tokio::time::timeout(
                self.config.llm_timeout(),
                self.model.extract_structured(
                    ExtractionInput::Text(submitted.raw_text.clone()),
                    &JD_SCHEMA,
                ),
            )
            .await
            .map_err(|_| MatchflowError::DependencyTimeout {
                collaborator: "vision_model".to_string(),
                timeout_ms: self.config.llm_timeout_ms,
            })??;

            match repair_jd_profile(&submitted.job_id, &raw) {
                Ok(repaired) => return Ok(repaired),
                Err(e) => {
                    warn!(
                        job_id = %submitted.job_id,
                        call = call + 1,
                        error = %e,
                        "JD extraction failed schema validation, retrying model call"
                    );
                    last_validation_error = Some(e);
                }
            }
        }

        Err(last_validation_error.unwrap_or_else(|| {
            MatchflowError::Validation("JD extraction produced no response".to_string())
        }))
    }
}

#[async_trait]
impl EventHandler for JobExtractionWorker {
    async fn handle(&self, _subject: &str, event: &ProcessingEvent) -> HandlerOutcome {
        let submitted: JdSubmitted = match event.decode() {
            Ok(submitted) => submitted,
            Err(e) => return HandlerOutcome::Terminal(format!("undecodable JdSubmitted: {e}")),
        };
        debug!(job_id = %submitted.job_id, attempt = event.attempt, "📋 Extracting JD");

        match self.extract(&submitted).await {
            Ok(repaired) => {
                let extracted = JdExtracted {
                    schema_version: 1,
                    job_id: submitted.job_id.clone(),
                    jd_profile: repaired.profile.clone(),
                    extraction_confidence: repaired.confidence,
                };

                // Upsert keeps reprocessing idempotent: same job id overwrites.
                if let Err(e) = self.repository.upsert_job_profile(repaired.profile).await {
                    return HandlerOutcome::Retry(format!("profile upsert failed: {e}"));
                }

                let out = match ProcessingEvent::new(
                    subjects::ANALYSIS_JD_EXTRACTED,
                    submitted.job_id.clone(),
                    &extracted,
                ) {
                    Ok(out) => out,
                    Err(e) => return HandlerOutcome::Retry(format!("envelope build failed: {e}")),
                };
                if let Err(e) = self.broker.publish(subjects::ANALYSIS_JD_EXTRACTED, out).await {
                    return HandlerOutcome::Retry(format!("publish failed: {e}"));
                }

                info!(
                    job_id = %submitted.job_id,
                    confidence = extracted.extraction_confidence,
                    "✅ JD extracted"
                );
                HandlerOutcome::Ack
            }
            Err(e) if e.is_retryable() => HandlerOutcome::Retry(e.to_string()),
            Err(e) => {
                // Processing failure: ack to stop redelivery, surface the
                // failure as an event instead.
                self.failures
                    .publish(
                        subjects::ANALYSIS_JD_FAILED,
                        StageFailed::new(
                            submitted.job_id.clone(),
                            None,
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
    use crate::collaborators::{InMemoryRepository, SemanticVerdict};
    use crate::config::BrokerConfig;
    use crate::messaging::{InMemoryBroker, SubscribeOptions};
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct ScriptedModel {
        responses: Mutex<Vec<Result<serde_json::Value>>>,
        calls: AtomicU32,
    }

    impl ScriptedModel {
        fn new(responses: Vec<Result<serde_json::Value>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl VisionModel for ScriptedModel {
        async fn extract_structured(
            &self,
            _input: ExtractionInput,
            _schema: &crate::collaborators::ExtractionSchema,
        ) -> Result<serde_json::Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock();
            if responses.is_empty() {
                Ok(json!({"required_skills": []}))
            } else {
                responses.remove(0)
            }
        }

        async fn compare_skills(
            &self,
            _required: &[String],
            _candidate_skills: &[String],
        ) -> Result<Vec<SemanticVerdict>> {
            Ok(vec![])
        }
    }

    fn worker_with_model(model: Arc<ScriptedModel>) -> (JobExtractionWorker, Arc<InMemoryBroker>) {
        let broker = Arc::new(InMemoryBroker::new(BrokerConfig::default()));
        let worker = JobExtractionWorker::new(
            model,
            Arc::new(InMemoryRepository::new()),
            broker.clone(),
            CollaboratorConfig {
                llm_timeout_ms: 500,
                storage_timeout_ms: 500,
                schema_retry_limit: 2,
            },
        );
        (worker, broker)
    }

    fn submitted_event() -> ProcessingEvent {
        let submitted = JdSubmitted {
            schema_version: 1,
            job_id: "job-1".to_string(),
            raw_text: "Senior frontend role".to_string(),
        };
        ProcessingEvent::new(subjects::JOB_JD_SUBMITTED, "job-1", &submitted).unwrap()
    }

    #[tokio::test]
    async fn test_successful_extraction_acks() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(json!({
            "required_skills": [{"name": "React", "importance": 1.0}],
            "experience": {"min_years": 2}
        }))]));
        let (worker, _broker) = worker_with_model(model.clone());

        let outcome = worker
            .handle(subjects::JOB_JD_SUBMITTED, &submitted_event())
            .await;
        assert_eq!(outcome, HandlerOutcome::Ack);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_validation_failure_retries_model_then_acks_with_failure_event() {
        // Three invalid responses exhaust the schema retry budget (1 + 2).
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(json!("garbage")),
            Ok(json!("garbage")),
            Ok(json!("garbage")),
        ]));
        let (worker, broker) = worker_with_model(model.clone());

        let failures = Arc::new(Mutex::new(Vec::new()));
        let failures_clone = failures.clone();
        struct Collector(Arc<Mutex<Vec<ProcessingEvent>>>);
        #[async_trait]
        impl EventHandler for Collector {
            async fn handle(&self, _s: &str, event: &ProcessingEvent) -> HandlerOutcome {
                self.0.lock().push(event.clone());
                HandlerOutcome::Ack
            }
        }
        let sub = broker
            .subscribe(
                subjects::ANALYSIS_JD_FAILED,
                "watchers",
                Arc::new(Collector(failures_clone)),
                SubscribeOptions::from_config(&BrokerConfig::default(), None),
            )
            .await
            .unwrap();

        let outcome = worker
            .handle(subjects::JOB_JD_SUBMITTED, &submitted_event())
            .await;
        // Acked, not retried: the input is unfixable.
        assert_eq!(outcome, HandlerOutcome::Ack);
        assert_eq!(model.calls.load(Ordering::SeqCst), 3);

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let seen = failures.lock();
        assert_eq!(seen.len(), 1);
        let failed: StageFailed = seen[0].decode().unwrap();
        assert_eq!(failed.error_code, "VALIDATION_FAILURE");
        drop(seen);
        sub.shutdown().await;
    }

    #[tokio::test]
    async fn test_transport_failure_requests_redelivery() {
        let model = Arc::new(ScriptedModel::new(vec![Err(MatchflowError::Delivery(
            "model unavailable".to_string(),
        ))]));
        let (worker, _broker) = worker_with_model(model);

        let outcome = worker
            .handle(subjects::JOB_JD_SUBMITTED, &submitted_event())
            .await;
        assert!(matches!(outcome, HandlerOutcome::Retry(_)));
    }
}
