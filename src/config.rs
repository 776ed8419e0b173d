//! # Pipeline Configuration
//!
//! Explicit, validated configuration for every tunable in the pipeline. Values
//! come from defaults, an optional TOML/YAML file, and `MATCHFLOW_`-prefixed
//! environment overrides; nothing is hardcoded at the call sites.
//!
//! The scoring weights live here deliberately: they are product tuning, not
//! engine logic, so deployments can adjust them without a release.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MatchflowError, Result};

/// Root configuration for the matching pipeline.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MatchflowConfig {
    #[serde(default)]
    pub broker: BrokerConfig,
    #[serde(default)]
    pub join: JoinConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub collaborators: CollaboratorConfig,
}

/// Delivery and redelivery behavior of the message broker.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrokerConfig {
    /// How long a handler may run before the delivery counts as failed.
    pub ack_wait_ms: u64,
    /// Redelivery attempts after the first delivery fails.
    pub max_redeliver: u32,
    /// Base delay for exponential backoff between redeliveries
    /// (`attempt^2 * base`).
    pub retry_base_delay_ms: u64,
    /// Cap on the computed backoff delay.
    pub retry_max_delay_ms: u64,
    /// Capacity of each durable group's delivery queue.
    pub queue_capacity: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            ack_wait_ms: 45_000,
            max_redeliver: 3,
            retry_base_delay_ms: 500,
            retry_max_delay_ms: 30_000,
            queue_capacity: 1024,
        }
    }
}

impl BrokerConfig {
    pub fn ack_wait(&self) -> Duration {
        Duration::from_millis(self.ack_wait_ms)
    }

    /// Exponential backoff: `attempt^2 * base`, capped at the configured max.
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let exp = u64::from(attempt).saturating_mul(u64::from(attempt));
        let delay = exp.saturating_mul(self.retry_base_delay_ms);
        Duration::from_millis(delay.min(self.retry_max_delay_ms))
    }
}

/// TTL and sweep behavior of the join/aggregation store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JoinConfig {
    /// How long a one-sided match request waits for the other branch.
    pub entry_ttl_secs: u64,
    /// How long a released pair is remembered to absorb redelivered branches.
    pub tombstone_ttl_secs: u64,
    /// Interval of the background eviction sweep.
    pub sweep_interval_secs: u64,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            entry_ttl_secs: 24 * 60 * 60,
            tombstone_ttl_secs: 600,
            sweep_interval_secs: 60,
        }
    }
}

impl JoinConfig {
    pub fn entry_ttl(&self) -> Duration {
        Duration::from_secs(self.entry_ttl_secs)
    }

    pub fn tombstone_ttl(&self) -> Duration {
        Duration::from_secs(self.tombstone_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Scoring engine tunables, including the canonical component weights.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScoringConfig {
    pub weights: ComponentWeights,
    /// Jaro-Winkler similarity floor for the fuzzy skill tier.
    pub fuzzy_threshold: f64,
    /// Window (years) that counts as "recent" experience for the recency bonus.
    pub recency_window_years: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ComponentWeights::default(),
            fuzzy_threshold: 0.84,
            recency_window_years: 3.0,
        }
    }
}

/// Base weights for the four scoring dimensions. When a job declares no
/// culture attributes, the culture weight is redistributed proportionally
/// across the other three so effective weights always sum to 1.0.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ComponentWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub culture: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            skills: 0.40,
            experience: 0.35,
            education: 0.15,
            culture: 0.10,
        }
    }
}

impl ComponentWeights {
    pub fn sum(&self) -> f64 {
        self.skills + self.experience + self.education + self.culture
    }

    pub fn validate(&self) -> Result<()> {
        if (self.sum() - 1.0).abs() > 1e-6 {
            return Err(MatchflowError::Configuration(format!(
                "scoring weights must sum to 1.0, got {}",
                self.sum()
            )));
        }
        Ok(())
    }
}

/// Timeouts and retry budgets for external collaborators.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollaboratorConfig {
    /// Timeout for vision/language-model calls.
    pub llm_timeout_ms: u64,
    /// Timeout for object-storage fetches.
    pub storage_timeout_ms: u64,
    /// Extra model-call attempts after a schema-validation failure.
    pub schema_retry_limit: u32,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            llm_timeout_ms: 30_000,
            storage_timeout_ms: 10_000,
            schema_retry_limit: 2,
        }
    }
}

impl CollaboratorConfig {
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_millis(self.llm_timeout_ms)
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_millis(self.storage_timeout_ms)
    }
}

impl MatchflowConfig {
    /// Load configuration from an optional file merged with `MATCHFLOW_`
    /// environment overrides (e.g. `MATCHFLOW_BROKER__MAX_REDELIVER=5`).
    pub fn from_file(path: &Path) -> Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("MATCHFLOW").separator("__"));

        let loaded: MatchflowConfig = builder
            .build()
            .map_err(|e| MatchflowError::Configuration(format!("failed to load {}: {e}", path.display())))?
            .try_deserialize()
            .map_err(|e| MatchflowError::Configuration(format!("invalid configuration: {e}")))?;

        loaded.scoring.weights.validate()?;
        Ok(loaded)
    }
}
