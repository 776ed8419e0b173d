//! # Structured Error Handling
//!
//! Crate-wide error taxonomy for the matching pipeline. The categories mirror
//! how failures propagate through the event flow:
//!
//! - **Delivery**: transient transport/handler failures. The broker redelivers
//!   these automatically, bounded by the subscription's `max_redeliver`.
//! - **Validation**: extracted or parsed data does not satisfy its schema.
//!   Retried a small bounded number of times at the call site, then surfaced
//!   as a `<stage>.failed` event rather than redelivered forever.
//! - **DependencyTimeout**: an external collaborator exceeded its timeout.
//!   Treated like a delivery failure and retried.
//! - **JoinTimeout**: one branch of a match never arrived within the TTL.
//!   Terminal; surfaced as `analysis.match.timeout_failed`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchflowError {
    /// Transient transport or handler failure; eligible for broker redelivery.
    #[error("Delivery failure: {0}")]
    Delivery(String),

    /// Data failed schema validation after bounded retries.
    #[error("Validation failure: {0}")]
    Validation(String),

    /// External collaborator exceeded its timeout budget.
    #[error("Dependency timeout: {collaborator} exceeded {timeout_ms}ms")]
    DependencyTimeout { collaborator: String, timeout_ms: u64 },

    /// One side of a (job, resume) join never arrived within the TTL.
    #[error("Join timeout: missing {missing_side} side for {job_id}:{resume_id}")]
    JoinTimeout {
        job_id: String,
        resume_id: String,
        missing_side: String,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MatchflowError {
    /// Whether the broker should redeliver the triggering message.
    ///
    /// Validation and join-timeout failures are terminal for the message that
    /// caused them: redelivering an unfixable input only burns the retry
    /// budget without changing the outcome.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MatchflowError::Delivery(_) | MatchflowError::DependencyTimeout { .. }
        )
    }

    /// Short stable code used in `StageFailed` events.
    pub fn error_code(&self) -> &'static str {
        match self {
            MatchflowError::Delivery(_) => "DELIVERY_FAILURE",
            MatchflowError::Validation(_) => "VALIDATION_FAILURE",
            MatchflowError::DependencyTimeout { .. } => "DEPENDENCY_TIMEOUT",
            MatchflowError::JoinTimeout { .. } => "JOIN_TIMEOUT",
            MatchflowError::Configuration(_) => "CONFIGURATION_ERROR",
            MatchflowError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(MatchflowError::Delivery("broker hiccup".to_string()).is_retryable());
        assert!(MatchflowError::DependencyTimeout {
            collaborator: "vision_model".to_string(),
            timeout_ms: 30000,
        }
        .is_retryable());
        assert!(!MatchflowError::Validation("missing skills field".to_string()).is_retryable());
        assert!(!MatchflowError::JoinTimeout {
            job_id: "job-1".to_string(),
            resume_id: "res-1".to_string(),
            missing_side: "jd".to_string(),
        }
        .is_retryable());
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            MatchflowError::Validation("x".to_string()).error_code(),
            "VALIDATION_FAILURE"
        );
        assert_eq!(
            MatchflowError::Delivery("x".to_string()).error_code(),
            "DELIVERY_FAILURE"
        );
    }
}
