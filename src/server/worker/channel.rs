//! Messaging channel boundary.
//!
//! The channel is an external chat client driven through browser automation. The server
//! only needs to send a text to an address and read what guardians sent back, so the
//! boundary is the narrow [`MessagingChannel`] trait plus a shared [`ConnectionState`].

use std::{collections::VecDeque, fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::{watch, Mutex};

use crate::server::error::delivery::DeliveryError;

/// Session state of the external messaging client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Authenticating,
    Ready,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Authenticating => "authenticating",
            Self::Ready => "ready",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared, observable connection status.
///
/// The channel driver writes it; the delivery worker, the opt-in listener and the health
/// endpoint read it.
#[derive(Clone)]
pub struct ConnectionState {
    status: Arc<watch::Sender<ConnectionStatus>>,
}

impl ConnectionState {
    pub fn new(initial: ConnectionStatus) -> Self {
        Self {
            status: Arc::new(watch::Sender::new(initial)),
        }
    }

    pub fn get(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    pub fn set(&self, status: ConnectionStatus) {
        let previous = self.status.send_replace(status);

        if previous != status {
            tracing::info!("Messaging channel {} -> {}", previous, status);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.get() == ConnectionStatus::Ready
    }

    /// Receiver notified on every status change
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::new(ConnectionStatus::Disconnected)
    }
}

/// A message a guardian sent to the venue's number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Sender address as reported by the channel, not normalized
    pub sender: String,
    pub body: String,
    pub received_at: NaiveDateTime,
}

/// Outbound send and inbound read capability of the external messaging client.
#[async_trait]
pub trait MessagingChannel: Send + Sync {
    /// Deliver `body` to `address`.
    async fn send(&self, address: &str, body: &str) -> Result<(), DeliveryError>;

    /// Messages received since the previous poll.
    ///
    /// The stream is lazy and ends once the currently available messages are drained; callers
    /// poll again later for more.
    fn poll_inbound(&self) -> BoxStream<'static, Result<InboundMessage, DeliveryError>>;
}

/// A message accepted by [`RecordingChannel`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub address: String,
    pub body: String,
    pub sent_at: NaiveDateTime,
}

/// In-process channel that records sends instead of delivering them.
///
/// Used as the dry-run channel when no messaging client is attached and as the channel in
/// tests, where failures, latency, connection state and inbound traffic can be scripted.
#[derive(Clone)]
pub struct RecordingChannel {
    inner: Arc<RecordingChannelRef>,
}

struct RecordingChannelRef {
    connection: ConnectionState,
    sent: Mutex<Vec<SentMessage>>,
    failures: Mutex<VecDeque<DeliveryError>>,
    delay: Mutex<Duration>,
    inbound: Arc<Mutex<VecDeque<InboundMessage>>>,
}

impl RecordingChannel {
    pub fn new(connection: ConnectionState) -> Self {
        Self {
            inner: Arc::new(RecordingChannelRef {
                connection,
                sent: Mutex::new(Vec::new()),
                failures: Mutex::new(VecDeque::new()),
                delay: Mutex::new(Duration::ZERO),
                inbound: Arc::new(Mutex::new(VecDeque::new())),
            }),
        }
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.inner.connection
    }

    /// Messages accepted so far, in send order
    pub async fn sent(&self) -> Vec<SentMessage> {
        self.inner.sent.lock().await.clone()
    }

    /// Make the next send fail with `error`. Calls queue up, one failure per send.
    pub async fn fail_next(&self, error: DeliveryError) {
        self.inner.failures.lock().await.push_back(error);
    }

    /// Delay every send by `delay` before it completes
    pub async fn set_delay(&self, delay: Duration) {
        *self.inner.delay.lock().await = delay;
    }

    /// Inbound messages not yet read by a poll
    pub async fn pending_inbound(&self) -> usize {
        self.inner.inbound.lock().await.len()
    }

    /// Make `body` from `sender` available to the next inbound poll
    pub async fn push_inbound(&self, sender: &str, body: &str) {
        self.inner.inbound.lock().await.push_back(InboundMessage {
            sender: sender.to_string(),
            body: body.to_string(),
            received_at: Utc::now().naive_utc(),
        });
    }
}

#[async_trait]
impl MessagingChannel for RecordingChannel {
    async fn send(&self, address: &str, body: &str) -> Result<(), DeliveryError> {
        let delay = *self.inner.delay.lock().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let status = self.inner.connection.get();
        if status != ConnectionStatus::Ready {
            return Err(DeliveryError::Disconnected(status.to_string()));
        }

        if let Some(error) = self.inner.failures.lock().await.pop_front() {
            return Err(error);
        }

        let digits = address.strip_prefix('+').unwrap_or(address);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DeliveryError::InvalidAddress(address.to_string()));
        }

        tracing::info!(address, "Recorded message: {}", body);

        self.inner.sent.lock().await.push(SentMessage {
            address: address.to_string(),
            body: body.to_string(),
            sent_at: Utc::now().naive_utc(),
        });

        Ok(())
    }

    fn poll_inbound(&self) -> BoxStream<'static, Result<InboundMessage, DeliveryError>> {
        let status = self.inner.connection.get();
        if status != ConnectionStatus::Ready {
            let error = DeliveryError::Disconnected(status.to_string());
            return stream::once(async move { Err::<InboundMessage, _>(error) }).boxed();
        }

        let inbound = Arc::clone(&self.inner.inbound);

        stream::unfold(inbound, |inbound| async move {
            let next = inbound.lock().await.pop_front();
            next.map(|message| (Ok(message), inbound))
        })
        .boxed()
    }
}
