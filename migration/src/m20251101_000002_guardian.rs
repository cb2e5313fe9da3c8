use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000001_family::Family;

static IDX_GUARDIAN_FAMILY_ID: &str = "idx-guardian-family_id";
static IDX_GUARDIAN_PHONE: &str = "idx-guardian-phone";
static FK_GUARDIAN_FAMILY_ID: &str = "fk-guardian-family_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Foreign keys are declared inline, SQLite cannot add them to an existing table
        manager
            .create_table(
                Table::create()
                    .table(Guardian::Table)
                    .if_not_exists()
                    .col(pk_auto(Guardian::Id))
                    .col(integer(Guardian::FamilyId))
                    .col(string(Guardian::FirstName))
                    .col(string(Guardian::LastName))
                    .col(string(Guardian::Phone))
                    .col(string(Guardian::Relationship))
                    .col(boolean(Guardian::NotifyOptIn).default(false))
                    .col(timestamp(Guardian::CreatedAt))
                    .col(timestamp(Guardian::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_GUARDIAN_FAMILY_ID)
                            .from(Guardian::Table, Guardian::FamilyId)
                            .to(Family::Table, Family::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_GUARDIAN_FAMILY_ID)
                    .table(Guardian::Table)
                    .col(Guardian::FamilyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_GUARDIAN_PHONE)
                    .table(Guardian::Table)
                    .col(Guardian::Phone)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_GUARDIAN_PHONE)
                    .table(Guardian::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_GUARDIAN_FAMILY_ID)
                    .table(Guardian::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Guardian::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Guardian {
    Table,
    Id,
    FamilyId,
    FirstName,
    LastName,
    Phone,
    Relationship,
    NotifyOptIn,
    CreatedAt,
    UpdatedAt,
}
