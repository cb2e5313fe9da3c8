use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UnlinkedContact::Table)
                    .if_not_exists()
                    .col(pk_auto(UnlinkedContact::Id))
                    .col(string(UnlinkedContact::Phone))
                    .col(text(UnlinkedContact::Body))
                    .col(timestamp(UnlinkedContact::ReceivedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UnlinkedContact::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum UnlinkedContact {
    Table,
    Id,
    Phone,
    Body,
    ReceivedAt,
}
