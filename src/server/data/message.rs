use chrono::NaiveDateTime;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::{
    db::QueuedMessageModel,
    message::{MessageStatus, MessageType},
};

/// Values for a message entering the queue
pub struct NewMessage {
    pub guardian_id: i32,
    pub child_id: i32,
    pub message_type: MessageType,
    pub body: String,
    pub target_address: String,
    pub max_attempts: i32,
    pub scheduled_at: NaiveDateTime,
}

/// Outcome of a failed attempt, written while the message is still claimed
pub struct FailedAttempt<'s> {
    pub attempts: i32,
    pub status: MessageStatus,
    pub next_attempt_at: Option<NaiveDateTime>,
    pub last_error: &'s str,
}

pub struct MessageRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MessageRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, message: NewMessage) -> Result<QueuedMessageModel, DbErr> {
        let message = entity::queued_message::ActiveModel {
            guardian_id: ActiveValue::Set(message.guardian_id),
            child_id: ActiveValue::Set(message.child_id),
            message_type: ActiveValue::Set(message.message_type.as_str().to_string()),
            body: ActiveValue::Set(message.body),
            target_address: ActiveValue::Set(message.target_address),
            status: ActiveValue::Set(MessageStatus::Pending.as_str().to_string()),
            attempts: ActiveValue::Set(0),
            max_attempts: ActiveValue::Set(message.max_attempts),
            scheduled_at: ActiveValue::Set(message.scheduled_at),
            next_attempt_at: ActiveValue::Set(None),
            claimed_at: ActiveValue::Set(None),
            sent_at: ActiveValue::Set(None),
            last_error: ActiveValue::Set(None),
            created_at: ActiveValue::Set(message.scheduled_at),
            ..Default::default()
        };

        message.insert(self.db).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<QueuedMessageModel>, DbErr> {
        entity::prelude::QueuedMessage::find_by_id(id)
            .one(self.db)
            .await
    }

    /// Messages due at `now`, oldest scheduled first.
    ///
    /// PENDING messages are due once `scheduled_at` has passed, RETRY messages once their
    /// `next_attempt_at` has. The rows are not claimed yet, see [`Self::try_claim`].
    pub async fn find_due(
        &self,
        now: NaiveDateTime,
        limit: u64,
    ) -> Result<Vec<QueuedMessageModel>, DbErr> {
        use entity::queued_message::Column;

        entity::prelude::QueuedMessage::find()
            .filter(Column::ScheduledAt.lte(now))
            .filter(
                Condition::any()
                    .add(Column::Status.eq(MessageStatus::Pending.as_str()))
                    .add(
                        Condition::all()
                            .add(Column::Status.eq(MessageStatus::Retry.as_str()))
                            .add(
                                Condition::any()
                                    .add(Column::NextAttemptAt.is_null())
                                    .add(Column::NextAttemptAt.lte(now)),
                            ),
                    ),
            )
            .order_by_asc(Column::ScheduledAt)
            .order_by_asc(Column::Id)
            .limit(limit)
            .all(self.db)
            .await
    }

    /// Move one message to IN_PROGRESS if it is still claimable.
    ///
    /// The status check and the update are one statement, so when several consumers race
    /// for the same row exactly one of them sees `true`.
    pub async fn try_claim(&self, id: i32, now: NaiveDateTime) -> Result<bool, DbErr> {
        use entity::queued_message::Column;

        let result = entity::prelude::QueuedMessage::update_many()
            .col_expr(
                Column::Status,
                Expr::value(MessageStatus::InProgress.as_str()),
            )
            .col_expr(Column::ClaimedAt, Expr::value(Some(now)))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.is_in(MessageStatus::claimable()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Record a successful send of a claimed message
    pub async fn mark_sent(&self, id: i32, sent_at: NaiveDateTime) -> Result<bool, DbErr> {
        use entity::queued_message::Column;

        let result = entity::prelude::QueuedMessage::update_many()
            .col_expr(Column::Status, Expr::value(MessageStatus::Sent.as_str()))
            .col_expr(Column::SentAt, Expr::value(Some(sent_at)))
            .col_expr(Column::ClaimedAt, Expr::value(Option::<NaiveDateTime>::None))
            .col_expr(Column::NextAttemptAt, Expr::value(Option::<NaiveDateTime>::None))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(MessageStatus::InProgress.as_str()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Record a failed attempt of a claimed message
    pub async fn record_failure(
        &self,
        id: i32,
        failure: FailedAttempt<'_>,
    ) -> Result<bool, DbErr> {
        use entity::queued_message::Column;

        let result = entity::prelude::QueuedMessage::update_many()
            .col_expr(Column::Status, Expr::value(failure.status.as_str()))
            .col_expr(Column::Attempts, Expr::value(failure.attempts))
            .col_expr(Column::NextAttemptAt, Expr::value(failure.next_attempt_at))
            .col_expr(Column::LastError, Expr::value(Some(failure.last_error.to_string())))
            .col_expr(Column::ClaimedAt, Expr::value(Option::<NaiveDateTime>::None))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(MessageStatus::InProgress.as_str()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Return claims older than `claimed_before` to RETRY, due immediately.
    pub async fn release_stale_claims(
        &self,
        claimed_before: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<u64, DbErr> {
        use entity::queued_message::Column;

        let result = entity::prelude::QueuedMessage::update_many()
            .col_expr(Column::Status, Expr::value(MessageStatus::Retry.as_str()))
            .col_expr(Column::NextAttemptAt, Expr::value(Some(now)))
            .col_expr(Column::ClaimedAt, Expr::value(Option::<NaiveDateTime>::None))
            .filter(Column::Status.eq(MessageStatus::InProgress.as_str()))
            .filter(
                Condition::any()
                    .add(Column::ClaimedAt.is_null())
                    .add(Column::ClaimedAt.lt(claimed_before)),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Messages newest first, optionally restricted to one status
    pub async fn list(
        &self,
        status: Option<MessageStatus>,
        limit: u64,
    ) -> Result<Vec<QueuedMessageModel>, DbErr> {
        use entity::queued_message::Column;

        let mut query = entity::prelude::QueuedMessage::find();

        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status.as_str()));
        }

        query
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(self.db)
            .await
    }
}
