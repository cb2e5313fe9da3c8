use std::time::Duration;

/// Configuration for the delivery worker
#[derive(Debug, Clone)]
pub struct DeliveryWorkerConfig {
    /// How long to wait between polls when the queue has nothing due (milliseconds).
    pub poll_interval_ms: u64,

    /// Maximum messages claimed per tick. Claimed messages are sent one after another.
    pub batch_size: u64,

    /// Maximum time a single send may take before it counts as failed (seconds).
    pub send_timeout_seconds: u64,

    /// Maximum time to wait for the worker loop to stop on shutdown (seconds).
    pub shutdown_timeout_seconds: u64,

    /// Claims older than this are assumed abandoned by a crashed process and are
    /// released back to RETRY (seconds).
    pub stale_claim_seconds: u64,

    /// Backoff after a failed database poll before trying again (milliseconds).
    pub error_backoff_ms: u64,
}

impl DeliveryWorkerConfig {
    /// Get poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Get send timeout as Duration
    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_seconds)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_seconds)
    }

    /// Get error backoff as Duration
    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }

    /// Get stale claim window as Duration
    pub fn stale_claim_timeout(&self) -> Duration {
        Duration::from_secs(self.stale_claim_seconds)
    }
}

impl Default for DeliveryWorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2000,
            batch_size: 10,
            send_timeout_seconds: 15,
            shutdown_timeout_seconds: 5,
            stale_claim_seconds: 5 * 60,
            error_backoff_ms: 1000,
        }
    }
}

/// Configuration for the opt-in listener
#[derive(Debug, Clone)]
pub struct OptInListenerConfig {
    /// Lowercase phrases that opt a guardian into notifications when sent as a whole message.
    pub phrases: Vec<String>,

    /// Country code applied to sender addresses without one.
    pub default_country_code: String,

    /// How long to wait before re-opening the inbound stream after it ends or errors (milliseconds).
    pub reconnect_interval_ms: u64,
}

impl OptInListenerConfig {
    /// Get reconnect interval as Duration
    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_interval_ms)
    }

    /// Whether `body` is one of the opt-in phrases, ignoring case and surrounding whitespace.
    pub fn is_opt_in(&self, body: &str) -> bool {
        let body = body.trim().to_lowercase();
        self.phrases.iter().any(|phrase| *phrase == body)
    }
}

impl Default for OptInListenerConfig {
    fn default() -> Self {
        Self {
            phrases: vec!["yes".into(), "start".into(), "subscribe".into()],
            default_country_code: "1".to_string(),
            reconnect_interval_ms: 2000,
        }
    }
}
