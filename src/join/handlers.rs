//! Broker-facing handlers that feed the join store from the two extraction
//! subjects. Kept separate from the store so the join logic itself stays
//! transport-free and directly testable.

use std::sync::Arc;

use async_trait::async_trait;

use crate::contracts::{JdExtracted, ResumeParsed};
use crate::join::store::JoinStore;
use crate::messaging::{EventHandler, HandlerOutcome, ProcessingEvent};

pub struct JdExtractedHandler {
    store: Arc<JoinStore>,
}

impl JdExtractedHandler {
    pub fn new(store: Arc<JoinStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EventHandler for JdExtractedHandler {
    async fn handle(&self, _subject: &str, event: &ProcessingEvent) -> HandlerOutcome {
        let extracted: JdExtracted = match event.decode() {
            Ok(extracted) => extracted,
            Err(e) => return HandlerOutcome::Terminal(format!("undecodable JdExtracted: {e}")),
        };
        self.store.record_jd(extracted.jd_profile).await;
        HandlerOutcome::Ack
    }
}

pub struct ResumeParsedHandler {
    store: Arc<JoinStore>,
}

impl ResumeParsedHandler {
    pub fn new(store: Arc<JoinStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EventHandler for ResumeParsedHandler {
    async fn handle(&self, _subject: &str, event: &ProcessingEvent) -> HandlerOutcome {
        let parsed: ResumeParsed = match event.decode() {
            Ok(parsed) => parsed,
            Err(e) => return HandlerOutcome::Terminal(format!("undecodable ResumeParsed: {e}")),
        };
        self.store.record_resume(parsed.candidate_profile).await;
        HandlerOutcome::Ack
    }
}
