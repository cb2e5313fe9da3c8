//! Background messaging workers.
//!
//! The delivery worker drains the notification queue through the messaging channel and the
//! opt-in listener reads guardian replies from it. Both share one [`ConnectionState`].

pub mod channel;
pub mod config;
pub mod delivery;
pub mod listener;

use std::sync::Arc;

pub use channel::{ConnectionState, ConnectionStatus, MessagingChannel, RecordingChannel};
pub use delivery::DeliveryWorker;
pub use listener::OptInListener;

use sea_orm::DatabaseConnection;

use crate::server::{config::Config, error::Error};

/// Delivery worker and opt-in listener bound to the same channel.
#[derive(Clone)]
pub struct Worker {
    pub delivery: DeliveryWorker,
    pub listener: OptInListener,
    shutdown_timeout: std::time::Duration,
}

impl Worker {
    pub fn new(
        config: &Config,
        db: DatabaseConnection,
        channel: Arc<dyn MessagingChannel>,
        connection: ConnectionState,
    ) -> Self {
        let delivery = DeliveryWorker::new(
            config.worker.clone(),
            config.retry.clone(),
            db.clone(),
            Arc::clone(&channel),
            connection.clone(),
        );
        let listener = OptInListener::new(config.listener.clone(), db, channel, connection);

        Self {
            delivery,
            listener,
            shutdown_timeout: config.worker.shutdown_timeout(),
        }
    }

    pub async fn start(&self) -> Result<(), Error> {
        self.delivery.start().await?;
        self.listener.start().await
    }

    pub async fn stop(&self) -> Result<(), Error> {
        self.listener.stop(self.shutdown_timeout).await?;
        self.delivery.stop().await
    }
}
