//! # Processing Event Envelope
//!
//! Every message crossing the broker travels inside a `ProcessingEvent`. The
//! `correlation_id` ties together all events for one (job, resume) workflow
//! instance; the `attempt` counter is scoped to the envelope and incremented
//! on every redelivery, so handlers can detect replays of the same
//! `event_id` and stay idempotent.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Envelope wrapping every message on the broker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingEvent {
    /// Unique per publication; stable across redeliveries.
    pub event_id: Uuid,
    /// Mirrors the subject the event was published on.
    pub event_type: String,
    /// `"{job_id}"` for job-scoped events, `"{job_id}:{resume_id}"` otherwise.
    pub correlation_id: String,
    /// The subject's versioned contract, serialized.
    pub payload: serde_json::Value,
    /// Delivery attempt, starting at 1 and incremented on redelivery.
    pub attempt: u32,
    pub occurred_at: DateTime<Utc>,
}

impl ProcessingEvent {
    /// Wrap a typed contract payload into a first-attempt envelope.
    pub fn new<T: Serialize>(
        event_type: &str,
        correlation_id: impl Into<String>,
        payload: &T,
    ) -> Result<Self> {
        Ok(Self {
            event_id: Uuid::new_v4(),
            event_type: event_type.to_string(),
            correlation_id: correlation_id.into(),
            payload: serde_json::to_value(payload)?,
            attempt: 1,
            occurred_at: Utc::now(),
        })
    }

    /// Deserialize the payload into the subject's contract type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.payload.clone())?)
    }

    /// Copy of this event with the attempt counter bumped, for redelivery.
    pub fn next_attempt(&self) -> Self {
        let mut redelivery = self.clone();
        redelivery.attempt += 1;
        redelivery
    }
}

/// Correlation id for a (job, resume) pair.
pub fn pair_correlation_id(job_id: &str, resume_id: &str) -> String {
    format!("{job_id}:{resume_id}")
}
