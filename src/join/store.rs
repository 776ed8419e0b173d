//! # Join/Aggregation Store
//!
//! Correlates the two independently-arriving extraction branches for each
//! (job, resume) pair and releases `analysis.match.ready` once both sides are
//! present. Either branch may arrive first; duplicate arrivals of the same
//! side are absorbed by upsert, and a released pair leaves behind a short-TTL
//! tombstone so redelivery can never release it twice.
//!
//! The background sweep is the pipeline's only cancellation mechanism: a
//! resume entry whose TTL expires without the job side emits exactly one
//! `analysis.match.timeout_failed` and is removed, which is what keeps the
//! store bounded when one branch permanently fails.

use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::JoinConfig;
use crate::contracts::{MatchReady, MatchTimeoutFailed};
use crate::messaging::{pair_correlation_id, subjects, MessageBroker, ProcessingEvent};
use crate::profiles::{CandidateProfile, JobRequirementProfile};

struct JobSide {
    profile: JobRequirementProfile,
    stored_at: Instant,
}

struct ResumeSide {
    profile: CandidateProfile,
    stored_at: Instant,
}

pub struct JoinStore {
    broker: Arc<dyn MessageBroker>,
    /// Job side cached by job id; one job joins against many resumes.
    jobs: DashMap<String, JobSide>,
    /// Pending match requests keyed by (job id, resume id).
    resumes: DashMap<(String, String), ResumeSide>,
    /// Released pairs, remembered briefly to absorb redelivered branches.
    tombstones: DashMap<(String, String), Instant>,
    config: JoinConfig,
}

impl JoinStore {
    pub fn new(broker: Arc<dyn MessageBroker>, config: JoinConfig) -> Self {
        Self {
            broker,
            jobs: DashMap::new(),
            resumes: DashMap::new(),
            tombstones: DashMap::new(),
            config,
        }
    }

    /// Upsert the job side and release every pending resume for this job.
    pub async fn record_jd(&self, profile: JobRequirementProfile) {
        let job_id = profile.job_id.clone();
        self.jobs.insert(
            job_id.clone(),
            JobSide {
                profile: profile.clone(),
                stored_at: Instant::now(),
            },
        );

        let pending: Vec<(String, String)> = self
            .resumes
            .iter()
            .filter(|entry| entry.key().0 == job_id)
            .map(|entry| entry.key().clone())
            .collect();

        debug!(job_id = %job_id, pending = pending.len(), "📥 JD side recorded");
        for key in pending {
            if let Some((_, resume_side)) = self.resumes.remove(&key) {
                self.release(&profile, resume_side.profile).await;
            }
        }
    }

    /// Upsert the resume side; release immediately when the job side is
    /// already present, otherwise hold with a TTL.
    pub async fn record_resume(&self, profile: CandidateProfile) {
        let key = (profile.job_id.clone(), profile.resume_id.clone());

        if self.tombstones.contains_key(&key) {
            debug!(
                job_id = %key.0,
                resume_id = %key.1,
                "Duplicate resume branch for released pair, ignoring"
            );
            return;
        }

        let jd_profile = self.jobs.get(&key.0).map(|side| side.profile.clone());
        match jd_profile {
            Some(jd_profile) => {
                // Drop any stale pending entry for the pair before releasing.
                self.resumes.remove(&key);
                self.release(&jd_profile, profile).await;
            }
            None => {
                debug!(job_id = %key.0, resume_id = %key.1, "📥 Resume side held for join");
                self.resumes.insert(
                    key.clone(),
                    ResumeSide {
                        profile,
                        stored_at: Instant::now(),
                    },
                );
                // Re-check after the insert: a JD recorded between the lookup
                // above and the insert has already collected pending resumes
                // and missed this one. Whichever path wins the remove
                // releases; the tombstone guards against both doing so.
                if let Some(jd_profile) = self.jobs.get(&key.0).map(|side| side.profile.clone()) {
                    if let Some((_, resume_side)) = self.resumes.remove(&key) {
                        self.release(&jd_profile, resume_side.profile).await;
                    }
                }
            }
        }
    }

    async fn release(&self, jd_profile: &JobRequirementProfile, candidate: CandidateProfile) {
        let key = (candidate.job_id.clone(), candidate.resume_id.clone());
        // Tombstone insert doubles as the duplicate-release guard.
        if self.tombstones.insert(key.clone(), Instant::now()).is_some() {
            debug!(job_id = %key.0, resume_id = %key.1, "Pair already released, skipping");
            return;
        }

        let ready = MatchReady {
            schema_version: 1,
            job_id: key.0.clone(),
            resume_id: key.1.clone(),
            jd_profile: jd_profile.clone(),
            candidate_profile: candidate,
        };
        let correlation = pair_correlation_id(&key.0, &key.1);
        match ProcessingEvent::new(subjects::ANALYSIS_MATCH_READY, correlation, &ready) {
            Ok(event) => {
                if let Err(e) = self.broker.publish(subjects::ANALYSIS_MATCH_READY, event).await {
                    warn!(job_id = %key.0, resume_id = %key.1, error = %e, "Failed to publish match.ready");
                    // Roll the tombstone back so a redelivered branch can retry the release.
                    self.tombstones.remove(&key);
                    return;
                }
                info!(job_id = %key.0, resume_id = %key.1, "🤝 Match ready, both sides present");
            }
            Err(e) => {
                warn!(job_id = %key.0, resume_id = %key.1, error = %e, "Failed to build match.ready");
                self.tombstones.remove(&key);
            }
        }
    }

    /// Evict expired entries. Expired resume entries emit exactly one
    /// `analysis.match.timeout_failed`; expired job-side caches evict
    /// silently (a job with no pending resume is not a match request).
    pub async fn sweep(&self) {
        let entry_ttl = self.config.entry_ttl();
        let tombstone_ttl = self.config.tombstone_ttl();

        let expired: Vec<((String, String), u64)> = self
            .resumes
            .iter()
            .filter(|entry| entry.value().stored_at.elapsed() >= entry_ttl)
            .map(|entry| (entry.key().clone(), entry.value().stored_at.elapsed().as_secs()))
            .collect();

        for (key, waited_secs) in expired {
            if self.resumes.remove(&key).is_none() {
                continue;
            }
            warn!(
                job_id = %key.0,
                resume_id = %key.1,
                waited_secs,
                "⏰ Join timed out waiting for JD side"
            );
            let timeout = MatchTimeoutFailed {
                schema_version: 1,
                job_id: key.0.clone(),
                resume_id: key.1.clone(),
                missing_side: "jd".to_string(),
                waited_secs,
                occurred_at: chrono::Utc::now(),
            };
            let correlation = pair_correlation_id(&key.0, &key.1);
            match ProcessingEvent::new(subjects::ANALYSIS_MATCH_TIMEOUT_FAILED, correlation, &timeout)
            {
                Ok(event) => {
                    if let Err(e) = self
                        .broker
                        .publish(subjects::ANALYSIS_MATCH_TIMEOUT_FAILED, event)
                        .await
                    {
                        warn!(error = %e, "Failed to publish match.timeout_failed");
                    }
                }
                Err(e) => warn!(error = %e, "Failed to build match.timeout_failed"),
            }
        }

        self.jobs.retain(|_, side| side.stored_at.elapsed() < entry_ttl);
        self.tombstones
            .retain(|_, released_at| released_at.elapsed() < tombstone_ttl);
    }

    /// Number of pending one-sided match requests (resume side held).
    pub fn pending_resumes(&self) -> usize {
        self.resumes.len()
    }

    /// Number of cached job sides.
    pub fn cached_jobs(&self) -> usize {
        self.jobs.len()
    }
}

/// Spawn the periodic eviction sweep. Returns the task handle and a shutdown
/// signal sender.
pub fn spawn_sweeper(store: Arc<JoinStore>) -> (JoinHandle<()>, watch::Sender<bool>) {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let interval = store.config.sweep_interval();
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = ticker.tick() => store.sweep().await,
                _ = shutdown_rx.changed() => break,
            }
        }
        debug!("Join sweeper stopped");
    });
    (task, shutdown_tx)
}
