use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000001_family::Family;

static IDX_CHILD_FAMILY_ID: &str = "idx-child-family_id";
static FK_CHILD_FAMILY_ID: &str = "fk-child-family_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Child::Table)
                    .if_not_exists()
                    .col(pk_auto(Child::Id))
                    .col(integer(Child::FamilyId))
                    .col(string(Child::FirstName))
                    .col(string(Child::LastName))
                    .col(date(Child::BirthDate))
                    .col(text_null(Child::Allergies))
                    .col(text_null(Child::Medications))
                    .col(text_null(Child::MedicalNotes))
                    .col(text_null(Child::SpecialNotes))
                    .col(boolean(Child::Active).default(true))
                    .col(timestamp(Child::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CHILD_FAMILY_ID)
                            .from(Child::Table, Child::FamilyId)
                            .to(Family::Table, Family::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CHILD_FAMILY_ID)
                    .table(Child::Table)
                    .col(Child::FamilyId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_CHILD_FAMILY_ID)
                    .table(Child::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Child::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Child {
    Table,
    Id,
    FamilyId,
    FirstName,
    LastName,
    BirthDate,
    Allergies,
    Medications,
    MedicalNotes,
    SpecialNotes,
    Active,
    CreatedAt,
}
