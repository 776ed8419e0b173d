//! Shared test doubles and helpers for the integration suites.
#![allow(dead_code)] // Each suite uses its own subset of the helpers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use matchflow_core::collaborators::{
    ExtractionInput, ExtractionSchema, FileStore, SemanticVerdict, VisionModel,
};
use matchflow_core::config::{BrokerConfig, JoinConfig, MatchflowConfig};
use matchflow_core::error::{MatchflowError, Result};
use matchflow_core::messaging::{EventHandler, HandlerOutcome, ProcessingEvent};

/// Vision model double that "extracts" by parsing its input as JSON: job
/// description text and resume bytes are literal JSON documents in tests.
/// Semantic comparison finds no equivalences, keeping scores deterministic.
pub struct EchoModel;

#[async_trait]
impl VisionModel for EchoModel {
    async fn extract_structured(
        &self,
        input: ExtractionInput,
        _schema: &ExtractionSchema,
    ) -> Result<serde_json::Value> {
        let parsed = match input {
            ExtractionInput::Text(text) => serde_json::from_str(&text),
            ExtractionInput::Document { bytes, .. } => serde_json::from_slice(&bytes),
        };
        parsed.map_err(|e| MatchflowError::Validation(format!("unparseable input: {e}")))
    }

    async fn compare_skills(
        &self,
        _required: &[String],
        _candidate_skills: &[String],
    ) -> Result<Vec<SemanticVerdict>> {
        Ok(vec![])
    }
}

/// In-memory object store seeded per test.
#[derive(Default)]
pub struct MapStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MapStore {
    pub fn with_file(file_ref: &str, bytes: &[u8]) -> Arc<Self> {
        let store = Self::default();
        store.files.lock().insert(file_ref.to_string(), bytes.to_vec());
        Arc::new(store)
    }

    pub fn insert(&self, file_ref: &str, bytes: &[u8]) {
        self.files.lock().insert(file_ref.to_string(), bytes.to_vec());
    }
}

#[async_trait]
impl FileStore for MapStore {
    async fn fetch_file(&self, file_ref: &str) -> Result<Vec<u8>> {
        self.files
            .lock()
            .get(file_ref)
            .cloned()
            .ok_or_else(|| MatchflowError::Delivery(format!("no such file: {file_ref}")))
    }
}

/// Records every event delivered to it.
pub struct EventCollector {
    pub seen: Mutex<Vec<ProcessingEvent>>,
}

impl EventCollector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn count(&self) -> usize {
        self.seen.lock().len()
    }
}

#[async_trait]
impl EventHandler for EventCollector {
    async fn handle(&self, _subject: &str, event: &ProcessingEvent) -> HandlerOutcome {
        self.seen.lock().push(event.clone());
        HandlerOutcome::Ack
    }
}

/// Config with timings tightened for tests.
pub fn fast_config() -> MatchflowConfig {
    MatchflowConfig {
        broker: BrokerConfig {
            ack_wait_ms: 2_000,
            max_redeliver: 3,
            retry_base_delay_ms: 5,
            retry_max_delay_ms: 50,
            queue_capacity: 256,
        },
        join: JoinConfig {
            entry_ttl_secs: 3600,
            tombstone_ttl_secs: 600,
            sweep_interval_secs: 1,
        },
        ..MatchflowConfig::default()
    }
}

/// JD document understood by `EchoModel`: React 1.0, GraphQL 0.5, 2 years.
pub fn react_jd_json() -> String {
    serde_json::json!({
        "required_skills": [
            {"name": "React", "importance": 1.0},
            {"name": "GraphQL", "importance": 0.5}
        ],
        "experience": {"min_years": 2}
    })
    .to_string()
}

/// Resume document understood by `EchoModel`: React + JavaScript, four
/// ascending years.
pub fn react_resume_json() -> Vec<u8> {
    serde_json::json!({
        "skills": ["React", "JavaScript"],
        "experience": [
            {
                "company": "Acme",
                "title": "Junior Engineer",
                "start": "2021-01-01",
                "end": "2023-01-01",
                "description": "React development"
            },
            {
                "company": "Beta",
                "title": "Senior Engineer",
                "start": "2023-01-01",
                "description": "React platform work"
            }
        ]
    })
    .to_string()
    .into_bytes()
}
