//! # Join/Aggregation
//!
//! The keyed, TTL-bounded holding area that correlates job and resume
//! extraction results before scoring. The join is commutative (either branch
//! may arrive first) and idempotent (duplicate branches never release a pair
//! twice), which is what lets every upstream stage be redelivered freely.

pub mod handlers;
pub mod store;

pub use handlers::{JdExtractedHandler, ResumeParsedHandler};
pub use store::{spawn_sweeper, JoinStore};
