use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000002_guardian::Guardian;

static IDX_QUEUED_MESSAGE_STATUS_SCHEDULED_AT: &str = "idx-queued_message-status-scheduled_at";
static FK_QUEUED_MESSAGE_GUARDIAN_ID: &str = "fk-queued_message-guardian_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QueuedMessage::Table)
                    .if_not_exists()
                    .col(pk_auto(QueuedMessage::Id))
                    .col(integer(QueuedMessage::GuardianId))
                    .col(integer(QueuedMessage::ChildId))
                    .col(string(QueuedMessage::MessageType))
                    .col(text(QueuedMessage::Body))
                    .col(string(QueuedMessage::TargetAddress))
                    .col(string(QueuedMessage::Status))
                    .col(integer(QueuedMessage::Attempts).default(0))
                    .col(integer(QueuedMessage::MaxAttempts))
                    .col(timestamp(QueuedMessage::ScheduledAt))
                    .col(timestamp_null(QueuedMessage::NextAttemptAt))
                    .col(timestamp_null(QueuedMessage::ClaimedAt))
                    .col(timestamp_null(QueuedMessage::SentAt))
                    .col(text_null(QueuedMessage::LastError))
                    .col(timestamp(QueuedMessage::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_QUEUED_MESSAGE_GUARDIAN_ID)
                            .from(QueuedMessage::Table, QueuedMessage::GuardianId)
                            .to(Guardian::Table, Guardian::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_QUEUED_MESSAGE_STATUS_SCHEDULED_AT)
                    .table(QueuedMessage::Table)
                    .col(QueuedMessage::Status)
                    .col(QueuedMessage::ScheduledAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_QUEUED_MESSAGE_STATUS_SCHEDULED_AT)
                    .table(QueuedMessage::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(QueuedMessage::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum QueuedMessage {
    Table,
    Id,
    GuardianId,
    ChildId,
    MessageType,
    Body,
    TargetAddress,
    Status,
    Attempts,
    MaxAttempts,
    ScheduledAt,
    NextAttemptAt,
    ClaimedAt,
    SentAt,
    LastError,
    CreatedAt,
}
