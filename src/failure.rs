//! # Failure Publisher
//!
//! Cross-cutting helper every stage uses to surface exhausted work as a
//! structured `<stage>.failed` event. Publishing a failure never fails the
//! calling handler: the event is best-effort and logged if the broker
//! rejects it, because the alternative is blocking an already-failed stage.

use std::sync::Arc;

use tracing::{error, warn};

use crate::contracts::StageFailed;
use crate::messaging::{pair_correlation_id, MessageBroker, ProcessingEvent};

#[derive(Clone)]
pub struct FailurePublisher {
    broker: Arc<dyn MessageBroker>,
}

impl FailurePublisher {
    pub fn new(broker: Arc<dyn MessageBroker>) -> Self {
        Self { broker }
    }

    /// Publish a stage failure on `failure_subject`.
    pub async fn publish(&self, failure_subject: &str, failed: StageFailed) {
        let correlation_id = match &failed.resume_id {
            Some(resume_id) => pair_correlation_id(&failed.job_id, resume_id),
            None => failed.job_id.clone(),
        };

        warn!(
            subject = failure_subject,
            job_id = %failed.job_id,
            resume_id = failed.resume_id.as_deref(),
            error_code = %failed.error_code,
            attempt = failed.attempt,
            "💀 Publishing stage failure"
        );

        let event = match ProcessingEvent::new(failure_subject, correlation_id, &failed) {
            Ok(event) => event,
            Err(e) => {
                error!(subject = failure_subject, error = %e, "Failed to build failure event");
                return;
            }
        };
        if let Err(e) = self.broker.publish(failure_subject, event).await {
            error!(subject = failure_subject, error = %e, "Failed to publish failure event");
        }
    }
}
