use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251101_000003_child::Child;

static IDX_SCAN_CODE_CODE: &str = "idx-scan_code-code";
static FK_SCAN_CODE_CHILD_ID: &str = "fk-scan_code-child_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScanCode::Table)
                    .if_not_exists()
                    .col(pk_auto(ScanCode::Id))
                    .col(integer(ScanCode::ChildId))
                    .col(string(ScanCode::Code))
                    .col(boolean(ScanCode::Active).default(true))
                    .col(timestamp(ScanCode::CreatedAt))
                    .col(timestamp_null(ScanCode::RevokedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_SCAN_CODE_CHILD_ID)
                            .from(ScanCode::Table, ScanCode::ChildId)
                            .to(Child::Table, Child::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Not unique: revoked codes keep their token so it can be reissued later
        manager
            .create_index(
                Index::create()
                    .name(IDX_SCAN_CODE_CODE)
                    .table(ScanCode::Table)
                    .col(ScanCode::Code)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_SCAN_CODE_CODE)
                    .table(ScanCode::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ScanCode::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ScanCode {
    Table,
    Id,
    ChildId,
    Code,
    Active,
    CreatedAt,
    RevokedAt,
}
