use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Filter for the administrative message listing
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MessageQuery {
    /// Only return messages in this status (`PENDING`, `IN_PROGRESS`, `SENT`, `FAILED`, `RETRY`)
    pub status: Option<String>,
    /// Maximum number of messages to return, newest first
    pub limit: Option<u64>,
}

/// Queued guardian notification with its delivery bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueuedMessageDto {
    pub id: i32,
    pub guardian_id: i32,
    pub child_id: i32,
    pub message_type: String,
    pub target_address: String,
    pub status: String,
    pub attempts: i32,
    pub max_attempts: i32,
    pub scheduled_at: NaiveDateTime,
    pub next_attempt_at: Option<NaiveDateTime>,
    pub sent_at: Option<NaiveDateTime>,
    pub last_error: Option<String>,
}

impl From<entity::queued_message::Model> for QueuedMessageDto {
    fn from(message: entity::queued_message::Model) -> Self {
        Self {
            id: message.id,
            guardian_id: message.guardian_id,
            child_id: message.child_id,
            message_type: message.message_type,
            target_address: message.target_address,
            status: message.status,
            attempts: message.attempts,
            max_attempts: message.max_attempts,
            scheduled_at: message.scheduled_at,
            next_attempt_at: message.next_attempt_at,
            sent_at: message.sent_at,
            last_error: message.last_error,
        }
    }
}
