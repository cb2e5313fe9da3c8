//! Delivery worker draining the notification queue.
//!
//! A single consumer task claims due messages, sends them one after another through the
//! [`MessagingChannel`] and records each outcome. Failures never stop the loop; they are
//! written to the message and retried on the queue's schedule.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::DatabaseConnection;
use tokio::{
    sync::{Notify, RwLock},
    task::JoinHandle,
};

use crate::server::{
    error::{delivery::DeliveryError, Error},
    model::db::QueuedMessageModel,
    service::{
        notification::{NotificationQueue, RetryPolicy},
        retry::RetryContext,
    },
    worker::{
        channel::{ConnectionState, MessagingChannel},
        config::DeliveryWorkerConfig,
    },
};

/// Background consumer of the notification queue.
///
/// Cheap to clone; clones control the same task.
#[derive(Clone)]
pub struct DeliveryWorker {
    inner: Arc<DeliveryWorkerRef>,
}

struct DeliveryWorkerRef {
    config: DeliveryWorkerConfig,
    retry: RetryPolicy,
    db: DatabaseConnection,
    channel: Arc<dyn MessagingChannel>,
    connection: ConnectionState,
    shutdown: Notify,
    handle: RwLock<Option<JoinHandle<()>>>,
}

impl DeliveryWorker {
    /// Creates a stopped worker; call [`DeliveryWorker::start`] to begin polling.
    pub fn new(
        config: DeliveryWorkerConfig,
        retry: RetryPolicy,
        db: DatabaseConnection,
        channel: Arc<dyn MessagingChannel>,
        connection: ConnectionState,
    ) -> Self {
        Self {
            inner: Arc::new(DeliveryWorkerRef {
                config,
                retry,
                db,
                channel,
                connection,
                shutdown: Notify::new(),
                handle: RwLock::new(None),
            }),
        }
    }

    /// Starts the polling task.
    ///
    /// Claims abandoned by a previous process are released first. Idempotent: starting a
    /// running worker logs a warning and returns Ok.
    pub async fn start(&self) -> Result<(), Error> {
        let mut handle = self.inner.handle.write().await;

        if handle.is_some() {
            tracing::warn!("Delivery worker is already running");
            return Ok(());
        }

        NotificationQueue::new(&self.inner.db, &self.inner.retry)
            .release_stale(self.inner.config.stale_claim_timeout())
            .await?;

        tracing::info!(
            "Starting delivery worker (poll every {:?}, batches of {})",
            self.inner.config.poll_interval(),
            self.inner.config.batch_size
        );

        let inner = Arc::clone(&self.inner);
        *handle = Some(tokio::spawn(async move { Self::run(inner).await }));

        Ok(())
    }

    async fn run(inner: Arc<DeliveryWorkerRef>) {
        loop {
            let wait = match Self::process_batch(&inner).await {
                // A full batch likely means more is due, poll again right away
                Ok(processed) if processed as u64 >= inner.config.batch_size => None,
                Ok(_) => Some(inner.config.poll_interval()),
                Err(e) => {
                    tracing::error!("Delivery worker poll failed: {}", e);
                    Some(inner.config.error_backoff())
                }
            };

            tokio::select! {
                biased;

                _ = inner.shutdown.notified() => {
                    tracing::debug!("Delivery worker received shutdown signal");
                    break;
                }

                _ = tokio::time::sleep(wait.unwrap_or_default()) => {}
            }
        }

        tracing::info!("Delivery worker stopped");
    }

    /// Claims one batch and delivers it.
    ///
    /// Skips the tick while the channel is not ready so a known outage does not burn
    /// attempts.
    ///
    /// # Returns
    /// Number of messages claimed and processed
    async fn process_batch(inner: &DeliveryWorkerRef) -> Result<usize, Error> {
        let status = inner.connection.get();
        if !inner.connection.is_ready() {
            tracing::debug!("Messaging channel is {}, skipping delivery tick", status);
            return Ok(0);
        }

        let queue = NotificationQueue::new(&inner.db, &inner.retry);
        let batch = queue.claim_batch(inner.config.batch_size).await?;
        let processed = batch.len();

        for message in batch {
            Self::deliver(inner, &queue, message).await;
        }

        Ok(processed)
    }

    async fn deliver(inner: &DeliveryWorkerRef, queue: &NotificationQueue<'_>, message: QueuedMessageModel) {
        let timeout = inner.config.send_timeout();
        let result = match tokio::time::timeout(
            timeout,
            inner.channel.send(&message.target_address, &message.body),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::Timeout(timeout)),
        };

        let now = Utc::now().naive_utc();
        let message_id = message.id;
        let ctx = RetryContext::new();

        let recorded = match result {
            Ok(()) => {
                tracing::debug!(message_id, guardian_id = message.guardian_id, "Message sent");

                ctx.execute_with_retry(&format!("mark message {} sent", message_id), move || {
                    queue.mark_sent(message_id, now)
                })
                .await
            }
            Err(error) => {
                let message = &message;
                let error = &error;

                ctx.execute_with_retry(
                    &format!("record failed attempt of message {}", message_id),
                    move || async move { queue.mark_failed(message, error, now).await.map(|_| ()) },
                )
                .await
            }
        };

        if let Err(e) = recorded {
            // The claim is released as stale later and the message is sent again
            tracing::error!(message_id, "Failed to record delivery outcome: {}", e);
        }
    }

    /// Runs a single delivery tick outside the background task.
    pub async fn run_once(&self) -> Result<usize, Error> {
        Self::process_batch(&self.inner).await
    }

    /// Stops the polling task, waiting up to the configured shutdown timeout.
    ///
    /// A send in flight finishes before the task exits. Idempotent.
    pub async fn stop(&self) -> Result<(), Error> {
        let Some(handle) = self.inner.handle.write().await.take() else {
            tracing::debug!("Delivery worker is already stopped");
            return Ok(());
        };

        tracing::info!("Shutting down delivery worker...");

        // Stores a permit if the loop is mid-batch so the signal is not missed
        self.inner.shutdown.notify_one();

        match tokio::time::timeout(self.inner.config.shutdown_timeout(), handle).await {
            Ok(Ok(())) => tracing::debug!("Delivery worker stopped cleanly"),
            Ok(Err(e)) => tracing::error!("Delivery worker panicked: {:?}", e),
            Err(_) => tracing::warn!("Delivery worker did not stop within timeout"),
        }

        Ok(())
    }

    pub async fn is_running(&self) -> bool {
        self.inner.handle.read().await.is_some()
    }
}
