use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20251101_000003_child::Child, m20251101_000005_program::Program};

static IDX_ATTENDANCE_CHILD_ID: &str = "idx-attendance-child_id";
static FK_ATTENDANCE_CHILD_ID: &str = "fk-attendance-child_id";
static FK_ATTENDANCE_PROGRAM_ID: &str = "fk-attendance-program_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(pk_auto(Attendance::Id))
                    .col(integer(Attendance::ChildId))
                    .col(integer(Attendance::ProgramId))
                    .col(string(Attendance::StationId))
                    .col(string(Attendance::DeviceId))
                    .col(string(Attendance::CreatedBy))
                    .col(timestamp(Attendance::CheckinAt))
                    .col(timestamp_null(Attendance::CheckoutAt))
                    .col(string_null(Attendance::CheckedOutBy))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_ATTENDANCE_CHILD_ID)
                            .from(Attendance::Table, Attendance::ChildId)
                            .to(Child::Table, Child::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_ATTENDANCE_PROGRAM_ID)
                            .from(Attendance::Table, Attendance::ProgramId)
                            .to(Program::Table, Program::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_ATTENDANCE_CHILD_ID)
                    .table(Attendance::Table)
                    .col(Attendance::ChildId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_ATTENDANCE_CHILD_ID)
                    .table(Attendance::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Attendance {
    Table,
    Id,
    ChildId,
    ProgramId,
    StationId,
    DeviceId,
    CreatedBy,
    CheckinAt,
    CheckoutAt,
    CheckedOutBy,
}
