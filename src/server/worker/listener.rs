//! Opt-in listener reading guardian replies from the messaging channel.
//!
//! A guardian replying with an opt-in phrase starts receiving check-in notices. Replies from
//! numbers no guardian is registered with are kept as unlinked contacts for staff to follow up.

use std::sync::Arc;

use futures::StreamExt;
use sea_orm::DatabaseConnection;
use tokio::{
    sync::{Notify, RwLock},
    task::JoinHandle,
};

use crate::server::{
    data::{guardian::GuardianRepository, unlinked_contact::UnlinkedContactRepository},
    error::Error,
    util::phone::normalize_phone,
    worker::{
        channel::{ConnectionState, InboundMessage, MessagingChannel},
        config::OptInListenerConfig,
    },
};

/// What handling an inbound message changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundOutcome {
    /// Sender matched this many guardians who were not opted in before
    OptedIn(usize),
    /// Sender is a known guardian but the text is not an opt-in phrase, or they already opted in
    Ignored,
    /// Sender matched no guardian and was stored as an unlinked contact
    Unlinked,
}

#[derive(Clone)]
pub struct OptInListener {
    inner: Arc<OptInListenerRef>,
}

struct OptInListenerRef {
    config: OptInListenerConfig,
    db: DatabaseConnection,
    channel: Arc<dyn MessagingChannel>,
    connection: ConnectionState,
    shutdown: Notify,
    handle: RwLock<Option<JoinHandle<()>>>,
}

impl OptInListener {
    pub fn new(
        config: OptInListenerConfig,
        db: DatabaseConnection,
        channel: Arc<dyn MessagingChannel>,
        connection: ConnectionState,
    ) -> Self {
        Self {
            inner: Arc::new(OptInListenerRef {
                config,
                db,
                channel,
                connection,
                shutdown: Notify::new(),
                handle: RwLock::new(None),
            }),
        }
    }

    /// Starts polling the channel for inbound messages. Idempotent.
    pub async fn start(&self) -> Result<(), Error> {
        let mut handle = self.inner.handle.write().await;

        if handle.is_some() {
            tracing::warn!("Opt-in listener is already running");
            return Ok(());
        }

        tracing::info!(
            "Starting opt-in listener (phrases: {})",
            self.inner.config.phrases.join(", ")
        );

        let listener = self.clone();
        *handle = Some(tokio::spawn(async move { listener.run().await }));

        Ok(())
    }

    async fn run(&self) {
        loop {
            if let Err(e) = self.poll_once().await {
                tracing::error!("Opt-in listener poll failed: {}", e);
            }

            tokio::select! {
                biased;

                _ = self.inner.shutdown.notified() => {
                    tracing::debug!("Opt-in listener received shutdown signal");
                    break;
                }

                _ = tokio::time::sleep(self.inner.config.reconnect_interval()) => {}
            }
        }

        tracing::info!("Opt-in listener stopped");
    }

    /// Drains the messages currently available on the channel.
    ///
    /// A message that fails to apply is logged and the drain continues with the next one.
    ///
    /// # Returns
    /// Number of inbound messages applied
    pub async fn poll_once(&self) -> Result<usize, Error> {
        if !self.inner.connection.is_ready() {
            return Ok(0);
        }

        let mut inbound = self.inner.channel.poll_inbound();
        let mut handled = 0;

        while let Some(item) = inbound.next().await {
            match item {
                Ok(message) => match self.handle_inbound(&message).await {
                    Ok(_) => handled += 1,
                    Err(e) => {
                        // The reply is already off the stream, keep it in the log for staff
                        tracing::error!(
                            sender = %message.sender,
                            body = %message.body,
                            "Failed to apply inbound message: {}",
                            e
                        );
                    }
                },
                Err(e) => {
                    // The stream is re-opened on the next poll
                    tracing::warn!("Inbound stream interrupted: {}", e);
                    break;
                }
            }
        }

        Ok(handled)
    }

    /// Applies a single inbound message.
    pub async fn handle_inbound(&self, message: &InboundMessage) -> Result<InboundOutcome, Error> {
        let db = &self.inner.db;

        let phone = normalize_phone(&message.sender, &self.inner.config.default_country_code);
        let guardians = match &phone {
            Some(phone) => GuardianRepository::new(db).find_by_phone(phone).await?,
            None => Vec::new(),
        };

        if guardians.is_empty() {
            let phone = phone.unwrap_or_else(|| message.sender.clone());
            let contact = UnlinkedContactRepository::new(db)
                .create(&phone, &message.body, message.received_at)
                .await?;

            tracing::warn!(
                contact_id = contact.id,
                sender = %message.sender,
                "Inbound message from unknown sender stored for reconciliation"
            );

            return Ok(InboundOutcome::Unlinked);
        }

        if !self.inner.config.is_opt_in(&message.body) {
            tracing::debug!(sender = %message.sender, "Inbound message is not an opt-in");
            return Ok(InboundOutcome::Ignored);
        }

        let guardian_repo = GuardianRepository::new(db);
        let mut opted_in = 0;
        for guardian in guardians.iter().filter(|g| !g.notify_opt_in) {
            if guardian_repo.set_opt_in(guardian.id, true).await?.is_some() {
                tracing::info!(
                    guardian_id = guardian.id,
                    family_id = guardian.family_id,
                    "Guardian opted into check-in notifications"
                );
                opted_in += 1;
            }
        }

        if opted_in == 0 {
            return Ok(InboundOutcome::Ignored);
        }

        Ok(InboundOutcome::OptedIn(opted_in))
    }

    /// Stops the polling task, waiting up to `timeout`. Idempotent.
    pub async fn stop(&self, timeout: std::time::Duration) -> Result<(), Error> {
        let Some(handle) = self.inner.handle.write().await.take() else {
            tracing::debug!("Opt-in listener is already stopped");
            return Ok(());
        };

        self.inner.shutdown.notify_one();

        match tokio::time::timeout(timeout, handle).await {
            Ok(Ok(())) => tracing::debug!("Opt-in listener stopped cleanly"),
            Ok(Err(e)) => tracing::error!("Opt-in listener panicked: {:?}", e),
            Err(_) => tracing::warn!("Opt-in listener did not stop within timeout"),
        }

        Ok(())
    }

    pub async fn is_running(&self) -> bool {
        self.inner.handle.read().await.is_some()
    }
}
