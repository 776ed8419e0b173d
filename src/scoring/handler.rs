//! Broker-facing handler for `analysis.match.ready`: runs the engine,
//! persists the immutable score, and publishes `analysis.match.scored`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::collaborators::ProfileRepository;
use crate::contracts::{MatchReady, MatchScored};
use crate::messaging::{
    pair_correlation_id, subjects, EventHandler, HandlerOutcome, MessageBroker, ProcessingEvent,
};
use crate::scoring::engine::ScoringEngine;

pub struct MatchReadyHandler {
    engine: ScoringEngine,
    repository: Arc<dyn ProfileRepository>,
    broker: Arc<dyn MessageBroker>,
}

impl MatchReadyHandler {
    pub fn new(
        engine: ScoringEngine,
        repository: Arc<dyn ProfileRepository>,
        broker: Arc<dyn MessageBroker>,
    ) -> Self {
        Self {
            engine,
            repository,
            broker,
        }
    }
}

#[async_trait]
impl EventHandler for MatchReadyHandler {
    async fn handle(&self, _subject: &str, event: &ProcessingEvent) -> HandlerOutcome {
        let ready: MatchReady = match event.decode() {
            Ok(ready) => ready,
            Err(e) => return HandlerOutcome::Terminal(format!("undecodable MatchReady: {e}")),
        };

        let match_score = self
            .engine
            .score(&ready.jd_profile, &ready.candidate_profile)
            .await;

        if let Err(e) = self.repository.save_score(match_score.clone()).await {
            return HandlerOutcome::Retry(format!("score save failed: {e}"));
        }

        let scored = MatchScored {
            schema_version: 1,
            job_id: ready.job_id.clone(),
            resume_id: ready.resume_id.clone(),
            match_score,
        };
        let correlation = pair_correlation_id(&ready.job_id, &ready.resume_id);
        let out = match ProcessingEvent::new(subjects::ANALYSIS_MATCH_SCORED, correlation, &scored) {
            Ok(out) => out,
            Err(e) => return HandlerOutcome::Retry(format!("envelope build failed: {e}")),
        };
        if let Err(e) = self.broker.publish(subjects::ANALYSIS_MATCH_SCORED, out).await {
            return HandlerOutcome::Retry(format!("publish failed: {e}"));
        }

        HandlerOutcome::Ack
    }
}
