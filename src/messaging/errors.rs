//! Broker-level error types, separate from the crate taxonomy so transport
//! concerns stay out of the domain error surface.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("Delivery queue for group '{group}' on '{pattern}' is closed")]
    QueueClosed { pattern: String, group: String },

    #[error("Failed to serialize event for subject '{subject}': {source}")]
    Serialization {
        subject: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Subscription rejected: {0}")]
    SubscriptionRejected(String),
}

/// Verdict returned by a message handler. `Ack` stops delivery; `Retry`
/// requests redelivery (bounded by `max_redeliver`); `Terminal` stops
/// delivery and asks the broker to dead-letter immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    Ack,
    Retry(String),
    Terminal(String),
}
