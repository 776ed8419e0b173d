#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Matchflow Core
//!
//! Asynchronous matching pipeline for recruitment workflows: a multi-stage,
//! event-driven system that turns a submitted job description and a set of
//! candidate resumes into confidence-weighted match scores.
//!
//! ## Architecture
//!
//! Data flows strictly forward over a subject-addressed broker, with failure
//! events flowing sideways out of every stage:
//!
//! ```text
//! job.jd.submitted ──▶ JobExtractionWorker ──▶ analysis.jd.extracted ──┐
//!                                                                      ▼
//!                                                                 JoinStore ──▶ analysis.match.ready ──▶ ScoringEngine ──▶ analysis.match.scored
//!                                                                      ▲
//! job.resume.submitted ─▶ ResumeExtractionWorker ─▶ analysis.resume.parsed
//! ```
//!
//! Delivery is at-least-once; every handler is idempotent under redelivery,
//! the join is commutative (either branch may arrive first), and every
//! submitted (job, resume) pair terminates in exactly one of
//! `analysis.match.scored`, `analysis.*.failed`, or
//! `analysis.match.timeout_failed`; no pair ends in silence.
//!
//! ## Module Organization
//!
//! - [`messaging`] - Broker abstraction: envelope, subjects, durable groups,
//!   redelivery, dead-lettering
//! - [`contracts`] - Versioned per-subject event payloads
//! - [`profiles`] - Job requirement, candidate, and match-score data model
//! - [`collaborators`] - Traits for the LLM, object-storage, and document
//!   store collaborators
//! - [`extraction`] - The two extraction workers plus response repair and
//!   skill canonicalization
//! - [`join`] - TTL-bounded join/aggregation store with background sweep
//! - [`scoring`] - Multi-component weighted scoring engine
//! - [`pipeline`] - Bootstrap wiring all consumers onto a broker
//! - [`config`] / [`error`] / [`logging`] - Ambient concerns

pub mod collaborators;
pub mod config;
pub mod contracts;
pub mod error;
pub mod extraction;
pub mod failure;
pub mod join;
pub mod logging;
pub mod messaging;
pub mod pipeline;
pub mod profiles;
pub mod scoring;

pub use config::MatchflowConfig;
pub use error::{MatchflowError, Result};
pub use pipeline::{MatchPipeline, PipelineDeps};
