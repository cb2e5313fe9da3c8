//! Durable queue of outbound guardian notifications.
//!
//! Messages are rows in `queued_message`. The check-in flow enqueues them, the delivery
//! worker claims due rows, sends them and records the outcome here. Rows are never deleted;
//! SENT and FAILED are terminal.

mod policy;
pub mod render;

pub use policy::RetryPolicy;

use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::server::{
    data::message::{FailedAttempt, MessageRepository, NewMessage},
    error::{delivery::DeliveryError, Error},
    model::{
        db::{GuardianModel, QueuedMessageModel},
        message::{MessageStatus, MessageType},
    },
    util::time::delta_seconds,
};

/// Queue operations over the `queued_message` table.
pub struct NotificationQueue<'a> {
    db: &'a DatabaseConnection,
    policy: &'a RetryPolicy,
}

impl<'a> NotificationQueue<'a> {
    pub fn new(db: &'a DatabaseConnection, policy: &'a RetryPolicy) -> Self {
        Self { db, policy }
    }

    /// Queue a message addressed to the guardian's phone, due immediately.
    pub async fn enqueue(
        &self,
        guardian: &GuardianModel,
        child_id: i32,
        message_type: MessageType,
        body: String,
        now: NaiveDateTime,
    ) -> Result<QueuedMessageModel, Error> {
        let message = MessageRepository::new(self.db)
            .create(NewMessage {
                guardian_id: guardian.id,
                child_id,
                message_type,
                body,
                target_address: guardian.phone.clone(),
                max_attempts: self.policy.max_attempts,
                scheduled_at: now,
            })
            .await?;

        tracing::debug!(
            message_id = message.id,
            guardian_id = guardian.id,
            message_type = %message_type,
            "Queued guardian message"
        );

        Ok(message)
    }

    /// Claim up to `limit` due messages for sending.
    pub async fn claim_batch(&self, limit: u64) -> Result<Vec<QueuedMessageModel>, Error> {
        self.claim_batch_at(Utc::now().naive_utc(), limit).await
    }

    /// Claim up to `limit` messages due at `now`, oldest scheduled first.
    ///
    /// Each row is claimed with its own conditional update; rows another consumer claimed
    /// between the lookup and the update are skipped. The returned models reflect the claim.
    pub async fn claim_batch_at(
        &self,
        now: NaiveDateTime,
        limit: u64,
    ) -> Result<Vec<QueuedMessageModel>, Error> {
        let message_repo = MessageRepository::new(self.db);

        let mut claimed = Vec::new();
        for mut message in message_repo.find_due(now, limit).await? {
            if !message_repo.try_claim(message.id, now).await? {
                tracing::debug!(message_id = message.id, "Message claimed by another consumer");
                continue;
            }

            message.status = MessageStatus::InProgress.to_string();
            message.claimed_at = Some(now);
            claimed.push(message);
        }

        Ok(claimed)
    }

    /// Record that a claimed message was delivered.
    pub async fn mark_sent(&self, message_id: i32, sent_at: NaiveDateTime) -> Result<(), Error> {
        let updated = MessageRepository::new(self.db)
            .mark_sent(message_id, sent_at)
            .await?;

        if !updated {
            tracing::warn!(message_id, "Sent message was no longer claimed");
        }

        Ok(())
    }

    /// Record a failed attempt for a claimed message.
    ///
    /// Increments the attempt count. Transient errors schedule a RETRY after the policy's
    /// backoff until `max_attempts` is reached; reaching it, or a non-transient error, marks
    /// the message FAILED.
    ///
    /// # Returns
    /// The status the message was moved to
    pub async fn mark_failed(
        &self,
        message: &QueuedMessageModel,
        error: &DeliveryError,
        now: NaiveDateTime,
    ) -> Result<MessageStatus, Error> {
        let attempts = message.attempts.saturating_add(1);
        let last_error = error.to_string();

        let (status, next_attempt_at) =
            if error.is_transient() && attempts < message.max_attempts {
                (
                    MessageStatus::Retry,
                    Some(now + self.policy.backoff(attempts)),
                )
            } else {
                (MessageStatus::Failed, None)
            };

        let updated = MessageRepository::new(self.db)
            .record_failure(
                message.id,
                FailedAttempt {
                    attempts,
                    status,
                    next_attempt_at,
                    last_error: &last_error,
                },
            )
            .await?;

        if !updated {
            tracing::warn!(message_id = message.id, "Failed message was no longer claimed");
            return Ok(status);
        }

        match status {
            MessageStatus::Failed => tracing::error!(
                message_id = message.id,
                guardian_id = message.guardian_id,
                attempts,
                last_error = %last_error,
                "Permanent delivery failure"
            ),
            _ => tracing::warn!(
                message_id = message.id,
                attempts,
                next_attempt_at = ?next_attempt_at,
                "Delivery failed, will retry: {}",
                last_error
            ),
        }

        Ok(status)
    }

    /// Release claims left IN_PROGRESS for longer than `stale_after`.
    pub async fn release_stale(&self, stale_after: Duration) -> Result<u64, Error> {
        self.release_stale_at(Utc::now().naive_utc(), stale_after)
            .await
    }

    pub async fn release_stale_at(
        &self,
        now: NaiveDateTime,
        stale_after: Duration,
    ) -> Result<u64, Error> {
        let cutoff = now - delta_seconds(stale_after.as_secs());
        let released = MessageRepository::new(self.db)
            .release_stale_claims(cutoff, now)
            .await?;

        if released > 0 {
            tracing::warn!("Released {} stale message claim(s) back to RETRY", released);
        }

        Ok(released)
    }

    /// Messages newest first for the administrative view
    pub async fn list(
        &self,
        status: Option<MessageStatus>,
        limit: u64,
    ) -> Result<Vec<QueuedMessageModel>, Error> {
        Ok(MessageRepository::new(self.db).list(status, limit).await?)
    }
}
