//! # Pipeline Bootstrap
//!
//! Wires the whole matching pipeline onto a broker: the two extraction
//! workers, the join store's two feed handlers, the scoring consumer, and the
//! join sweeper. Each consumer registers under its own durable group so
//! multiple pipeline instances scale horizontally, with every event handled
//! by exactly one instance per stage.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::collaborators::{FileStore, ProfileRepository, VisionModel};
use crate::config::MatchflowConfig;
use crate::extraction::{JobExtractionWorker, ResumeExtractionWorker, SkillNormalizer};
use crate::join::{spawn_sweeper, JdExtractedHandler, JoinStore, ResumeParsedHandler};
use crate::messaging::{
    subjects, MessageBroker, MessagingError, SubscribeOptions, SubscriptionHandle,
};
use crate::scoring::{MatchReadyHandler, ScoringEngine};

/// External collaborators the pipeline needs at startup.
pub struct PipelineDeps {
    pub broker: Arc<dyn MessageBroker>,
    pub model: Arc<dyn VisionModel>,
    pub storage: Arc<dyn FileStore>,
    pub repository: Arc<dyn ProfileRepository>,
    pub normalizer: SkillNormalizer,
}

/// Running pipeline; dropping without `shutdown` leaves consumers running.
pub struct MatchPipeline {
    subscriptions: Vec<SubscriptionHandle>,
    sweeper: JoinHandle<()>,
    sweeper_shutdown: watch::Sender<bool>,
    join_store: Arc<JoinStore>,
}

impl MatchPipeline {
    pub async fn start(deps: PipelineDeps, config: MatchflowConfig) -> Result<Self, MessagingError> {
        let broker = deps.broker;
        let join_store = Arc::new(JoinStore::new(broker.clone(), config.join.clone()));

        let jd_worker = Arc::new(JobExtractionWorker::new(
            deps.model.clone(),
            deps.repository.clone(),
            broker.clone(),
            config.collaborators.clone(),
        ));
        let resume_worker = Arc::new(ResumeExtractionWorker::new(
            deps.model.clone(),
            deps.storage,
            deps.repository.clone(),
            broker.clone(),
            deps.normalizer.clone(),
            config.collaborators.clone(),
        ));
        let scorer = Arc::new(MatchReadyHandler::new(
            ScoringEngine::new(deps.model, deps.normalizer, config.scoring.clone()),
            deps.repository,
            broker.clone(),
        ));

        let mut subscriptions = Vec::new();
        subscriptions.push(
            broker
                .subscribe(
                    subjects::JOB_JD_SUBMITTED,
                    "jd_extractors",
                    jd_worker,
                    SubscribeOptions::from_config(&config.broker, Some(subjects::ANALYSIS_JD_FAILED)),
                )
                .await?,
        );
        subscriptions.push(
            broker
                .subscribe(
                    subjects::JOB_RESUME_SUBMITTED,
                    "resume_extractors",
                    resume_worker,
                    SubscribeOptions::from_config(
                        &config.broker,
                        Some(subjects::ANALYSIS_RESUME_FAILED),
                    ),
                )
                .await?,
        );
        subscriptions.push(
            broker
                .subscribe(
                    subjects::ANALYSIS_JD_EXTRACTED,
                    "join_jd_side",
                    Arc::new(JdExtractedHandler::new(join_store.clone())),
                    SubscribeOptions::from_config(
                        &config.broker,
                        Some(subjects::ANALYSIS_MATCH_FAILED),
                    ),
                )
                .await?,
        );
        subscriptions.push(
            broker
                .subscribe(
                    subjects::ANALYSIS_RESUME_PARSED,
                    "join_resume_side",
                    Arc::new(ResumeParsedHandler::new(join_store.clone())),
                    SubscribeOptions::from_config(
                        &config.broker,
                        Some(subjects::ANALYSIS_MATCH_FAILED),
                    ),
                )
                .await?,
        );
        subscriptions.push(
            broker
                .subscribe(
                    subjects::ANALYSIS_MATCH_READY,
                    "scorers",
                    scorer,
                    SubscribeOptions::from_config(
                        &config.broker,
                        Some(subjects::ANALYSIS_MATCH_FAILED),
                    ),
                )
                .await?,
        );

        let (sweeper, sweeper_shutdown) = spawn_sweeper(join_store.clone());

        info!("🚀 Match pipeline started with {} consumers", subscriptions.len());
        Ok(Self {
            subscriptions,
            sweeper,
            sweeper_shutdown,
            join_store,
        })
    }

    /// The join store, exposed for operational inspection.
    pub fn join_store(&self) -> &Arc<JoinStore> {
        &self.join_store
    }

    /// Stop the sweeper and drain every consumer.
    pub async fn shutdown(self) {
        let _ = self.sweeper_shutdown.send(true);
        let _ = self.sweeper.await;
        for subscription in self.subscriptions {
            subscription.shutdown().await;
        }
        info!("🛑 Match pipeline stopped");
    }
}
