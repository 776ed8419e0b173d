//! # Messaging Module
//!
//! Subject-addressed publish/subscribe transport for the matching pipeline:
//! the `ProcessingEvent` envelope, hierarchical subjects, the `MessageBroker`
//! trait with durable-group semantics, and the in-process implementation.

pub mod broker;
pub mod envelope;
pub mod errors;
pub mod subjects;

pub use broker::{EventHandler, InMemoryBroker, MessageBroker, SubscribeOptions, SubscriptionHandle};
pub use envelope::{pair_correlation_id, ProcessingEvent};
pub use errors::{HandlerOutcome, MessagingError};
