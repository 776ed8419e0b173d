//! Structured failure contracts. Every stage that exhausts its retry budget
//! emits one of these instead of dropping work silently; operational tooling
//! observes failures exclusively through these events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::messaging::envelope::ProcessingEvent;

use super::schema_version;

/// Payload of every `<stage>.failed` subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageFailed {
    #[serde(default = "schema_version")]
    pub schema_version: u32,
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_id: Option<String>,
    pub error_code: String,
    pub error_message: String,
    /// Delivery attempt at which the stage gave up.
    pub attempt: u32,
    pub occurred_at: DateTime<Utc>,
}

impl StageFailed {
    pub fn new(
        job_id: impl Into<String>,
        resume_id: Option<String>,
        error_code: &str,
        error_message: impl Into<String>,
        attempt: u32,
    ) -> Self {
        Self {
            schema_version: schema_version(),
            job_id: job_id.into(),
            resume_id,
            error_code: error_code.to_string(),
            error_message: error_message.into(),
            attempt,
            occurred_at: Utc::now(),
        }
    }

    /// Built by the broker when an event exhausts its redelivery budget. The
    /// correlation id carries the join key: `"{job_id}"` or
    /// `"{job_id}:{resume_id}"`.
    pub fn from_exhausted_event(event: &ProcessingEvent, reason: &str) -> Self {
        let (job_id, resume_id) = match event.correlation_id.split_once(':') {
            Some((job, resume)) => (job.to_string(), Some(resume.to_string())),
            None => (event.correlation_id.clone(), None),
        };
        Self::new(job_id, resume_id, "MAX_REDELIVER_EXCEEDED", reason, event.attempt)
    }
}

/// Payload of `analysis.match.timeout_failed`: one branch of a join never
/// arrived within the TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchTimeoutFailed {
    #[serde(default = "schema_version")]
    pub schema_version: u32,
    pub job_id: String,
    pub resume_id: String,
    /// Which extraction branch never completed: `"jd"` or `"resume"`.
    pub missing_side: String,
    pub waited_secs: u64,
    pub occurred_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_exhausted_event_splits_pair_correlation() {
        let event = ProcessingEvent::new("job.jd.submitted", "job-7:res-2", &serde_json::json!({}))
            .expect("envelope");
        let failed = StageFailed::from_exhausted_event(&event, "handler kept failing");
        assert_eq!(failed.job_id, "job-7");
        assert_eq!(failed.resume_id.as_deref(), Some("res-2"));
        assert_eq!(failed.error_code, "MAX_REDELIVER_EXCEEDED");
    }

    #[test]
    fn test_from_exhausted_event_job_scoped_correlation() {
        let event = ProcessingEvent::new("job.jd.submitted", "job-7", &serde_json::json!({}))
            .expect("envelope");
        let failed = StageFailed::from_exhausted_event(&event, "boom");
        assert_eq!(failed.job_id, "job-7");
        assert!(failed.resume_id.is_none());
    }
}
