//! # Message Broker Abstraction
//!
//! Durable, subject-addressed publish/subscribe with consumer-group
//! semantics, explicit acknowledgment, bounded redelivery with exponential
//! backoff, and dead-lettering into `<stage>.failed` subjects.
//!
//! Delivery is at-least-once: a handler that does not acknowledge within the
//! subscription's ack wait is considered failed and the event is redelivered
//! with a bumped `attempt` counter. After `max_redeliver` redeliveries the
//! broker publishes a structured `StageFailed` event on the subscription's
//! failure subject and stops, so no message ever disappears silently.
//!
//! `InMemoryBroker` is the process-local implementation used by the pipeline
//! and its tests; production deployments swap in a durable transport behind
//! the same trait.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::BrokerConfig;
use crate::contracts::failure::StageFailed;
use crate::messaging::envelope::ProcessingEvent;
use crate::messaging::errors::{HandlerOutcome, MessagingError};
use crate::messaging::subjects::subject_matches;

/// Asynchronous event handler attached to a subscription.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, subject: &str, event: &ProcessingEvent) -> HandlerOutcome;
}

/// Per-subscription delivery options.
#[derive(Debug, Clone)]
pub struct SubscribeOptions {
    /// How long the handler may run before the delivery counts as failed.
    pub ack_wait: std::time::Duration,
    /// Redelivery attempts after the first delivery fails.
    pub max_redeliver: u32,
    /// Where the broker dead-letters exhausted events (`<stage>.failed`).
    pub failure_subject: Option<String>,
}

impl SubscribeOptions {
    pub fn from_config(config: &BrokerConfig, failure_subject: Option<&str>) -> Self {
        Self {
            ack_wait: config.ack_wait(),
            max_redeliver: config.max_redeliver,
            failure_subject: failure_subject.map(str::to_string),
        }
    }
}

/// Subject-addressed publish/subscribe transport.
#[async_trait]
pub trait MessageBroker: Send + Sync {
    /// Publish an event. Succeeds even with zero subscribers.
    async fn publish(&self, subject: &str, event: ProcessingEvent) -> Result<(), MessagingError>;

    /// Register a handler under a durable group. Each event matching
    /// `pattern` is delivered to exactly one member of the group.
    async fn subscribe(
        &self,
        pattern: &str,
        durable_group: &str,
        handler: Arc<dyn EventHandler>,
        options: SubscribeOptions,
    ) -> Result<SubscriptionHandle, MessagingError>;
}

struct Delivery {
    subject: String,
    event: ProcessingEvent,
}

/// Shared queue for one (pattern, durable group) registration. Members take
/// turns receiving, which is what gives each event exactly one consumer.
struct GroupQueue {
    sender: mpsc::Sender<Delivery>,
    receiver: Arc<Mutex<mpsc::Receiver<Delivery>>>,
    members: AtomicUsize,
}

struct BrokerInner {
    groups: DashMap<(String, String), Arc<GroupQueue>>,
    config: BrokerConfig,
}

impl BrokerInner {
    /// Route an event to every durable group whose pattern matches.
    async fn route(&self, subject: &str, event: &ProcessingEvent) -> Result<(), MessagingError> {
        let mut delivered_groups = 0usize;
        for entry in self.groups.iter() {
            let (pattern, group) = entry.key();
            if !subject_matches(pattern, subject) {
                continue;
            }
            let delivery = Delivery {
                subject: subject.to_string(),
                event: event.clone(),
            };
            entry
                .value()
                .sender
                .send(delivery)
                .await
                .map_err(|_| MessagingError::QueueClosed {
                    pattern: pattern.clone(),
                    group: group.clone(),
                })?;
            delivered_groups += 1;
        }
        debug!(
            subject = subject,
            event_id = %event.event_id,
            groups = delivered_groups,
            "📤 Event routed"
        );
        Ok(())
    }
}

/// Process-local broker backed by per-group tokio channels.
#[derive(Clone)]
pub struct InMemoryBroker {
    inner: Arc<BrokerInner>,
}

impl InMemoryBroker {
    pub fn new(config: BrokerConfig) -> Self {
        Self {
            inner: Arc::new(BrokerInner {
                groups: DashMap::new(),
                config,
            }),
        }
    }
}

#[async_trait]
impl MessageBroker for InMemoryBroker {
    async fn publish(&self, subject: &str, event: ProcessingEvent) -> Result<(), MessagingError> {
        self.inner.route(subject, &event).await
    }

    async fn subscribe(
        &self,
        pattern: &str,
        durable_group: &str,
        handler: Arc<dyn EventHandler>,
        options: SubscribeOptions,
    ) -> Result<SubscriptionHandle, MessagingError> {
        let key = (pattern.to_string(), durable_group.to_string());
        let queue = self
            .inner
            .groups
            .entry(key.clone())
            .or_insert_with(|| {
                let (sender, receiver) = mpsc::channel(self.inner.config.queue_capacity);
                Arc::new(GroupQueue {
                    sender,
                    receiver: Arc::new(Mutex::new(receiver)),
                    members: AtomicUsize::new(0),
                })
            })
            .clone();
        queue.members.fetch_add(1, Ordering::SeqCst);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(consume_loop(
            self.inner.clone(),
            queue,
            handler,
            options,
            pattern.to_string(),
            durable_group.to_string(),
            shutdown_rx,
        ));

        info!(
            pattern = pattern,
            group = durable_group,
            "✅ Durable subscription registered"
        );
        Ok(SubscriptionHandle {
            shutdown_tx,
            task,
            inner: self.inner.clone(),
            key,
        })
    }
}

/// Handle for one group member's consumer loop.
pub struct SubscriptionHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
    inner: Arc<BrokerInner>,
    key: (String, String),
}

impl SubscriptionHandle {
    /// Stop consuming after the in-flight delivery (if any) completes. The
    /// last member to leave deregisters the group, so later publishes route
    /// past it instead of filling a queue nobody drains.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;

        let last_member = self
            .inner
            .groups
            .get(&self.key)
            .map(|queue| queue.members.fetch_sub(1, Ordering::SeqCst) == 1)
            .unwrap_or(false);
        if last_member {
            self.inner.groups.remove(&self.key);
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn consume_loop(
    inner: Arc<BrokerInner>,
    queue: Arc<GroupQueue>,
    handler: Arc<dyn EventHandler>,
    options: SubscribeOptions,
    pattern: String,
    group: String,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        let delivery = {
            let mut receiver = queue.receiver.lock().await;
            tokio::select! {
                delivery = receiver.recv() => match delivery {
                    Some(delivery) => delivery,
                    None => break,
                },
                _ = shutdown_rx.changed() => break,
            }
        };

        let outcome =
            match tokio::time::timeout(options.ack_wait, handler.handle(&delivery.subject, &delivery.event))
                .await
            {
                Ok(outcome) => outcome,
                Err(_) => HandlerOutcome::Retry(format!(
                    "handler exceeded ack wait of {:?}",
                    options.ack_wait
                )),
            };

        match outcome {
            HandlerOutcome::Ack => {
                debug!(
                    subject = %delivery.subject,
                    event_id = %delivery.event.event_id,
                    attempt = delivery.event.attempt,
                    "✅ Delivery acknowledged"
                );
            }
            HandlerOutcome::Retry(reason) => {
                handle_retry(&inner, &queue, &options, &pattern, &group, delivery, reason).await;
            }
            HandlerOutcome::Terminal(reason) => {
                warn!(
                    subject = %delivery.subject,
                    event_id = %delivery.event.event_id,
                    reason = %reason,
                    "⛔ Terminal handler outcome, dead-lettering"
                );
                dead_letter(&inner, &options, &delivery, &reason).await;
            }
        }
    }
    debug!(pattern = %pattern, group = %group, "Subscription loop stopped");
}

async fn handle_retry(
    inner: &Arc<BrokerInner>,
    queue: &Arc<GroupQueue>,
    options: &SubscribeOptions,
    pattern: &str,
    group: &str,
    delivery: Delivery,
    reason: String,
) {
    // attempt starts at 1, so attempt N means N-1 redeliveries have happened.
    if delivery.event.attempt > options.max_redeliver {
        warn!(
            subject = %delivery.subject,
            event_id = %delivery.event.event_id,
            attempt = delivery.event.attempt,
            reason = %reason,
            "💀 Redelivery budget exhausted, dead-lettering"
        );
        dead_letter(inner, options, &delivery, &reason).await;
        return;
    }

    let delay = inner.config.retry_delay(delivery.event.attempt);
    debug!(
        subject = %delivery.subject,
        event_id = %delivery.event.event_id,
        attempt = delivery.event.attempt,
        delay_ms = delay.as_millis() as u64,
        reason = %reason,
        "🔁 Scheduling redelivery"
    );

    let sender = queue.sender.clone();
    let redelivery = Delivery {
        subject: delivery.subject.clone(),
        event: delivery.event.next_attempt(),
    };
    let pattern = pattern.to_string();
    let group = group.to_string();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if sender.send(redelivery).await.is_err() {
            warn!(pattern = %pattern, group = %group, "Redelivery dropped, queue closed");
        }
    });
}

async fn dead_letter(
    inner: &Arc<BrokerInner>,
    options: &SubscribeOptions,
    delivery: &Delivery,
    reason: &str,
) {
    let Some(failure_subject) = options.failure_subject.as_deref() else {
        error!(
            subject = %delivery.subject,
            event_id = %delivery.event.event_id,
            "No failure subject configured; exhausted event dropped from redelivery"
        );
        return;
    };

    let failed = StageFailed::from_exhausted_event(&delivery.event, reason);
    match ProcessingEvent::new(failure_subject, delivery.event.correlation_id.clone(), &failed) {
        Ok(event) => {
            if let Err(e) = inner.route(failure_subject, &event).await {
                error!(failure_subject, error = %e, "Failed to publish dead-letter event");
            }
        }
        Err(e) => error!(failure_subject, error = %e, "Failed to build dead-letter event"),
    }
}
