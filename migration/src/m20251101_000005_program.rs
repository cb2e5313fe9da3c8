use sea_orm_migration::{prelude::*, schema::*};

/// Programs available on a fresh install: (name, min_age, max_age)
const DEFAULT_PROGRAMS: [(&str, i32, i32); 4] = [
    ("Nursery", 0, 2),
    ("Toddlers", 2, 4),
    ("Preschool", 4, 6),
    ("Elementary", 6, 12),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Program::Table)
                    .if_not_exists()
                    .col(pk_auto(Program::Id))
                    .col(string(Program::Name))
                    .col(integer_null(Program::MinAge))
                    .col(integer_null(Program::MaxAge))
                    .col(boolean(Program::Active).default(true))
                    .to_owned(),
            )
            .await?;

        let mut insert = Query::insert();
        insert
            .into_table(Program::Table)
            .columns([Program::Name, Program::MinAge, Program::MaxAge, Program::Active]);

        for (name, min_age, max_age) in DEFAULT_PROGRAMS {
            insert.values_panic([name.into(), min_age.into(), max_age.into(), true.into()]);
        }

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Program::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Program {
    Table,
    Id,
    Name,
    MinAge,
    MaxAge,
    Active,
}
