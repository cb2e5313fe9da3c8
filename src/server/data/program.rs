use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::server::model::db::ProgramModel;

pub struct ProgramRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ProgramRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Active programs ordered youngest first
    pub async fn list_active(&self) -> Result<Vec<ProgramModel>, DbErr> {
        entity::prelude::Program::find()
            .filter(entity::program::Column::Active.eq(true))
            .order_by_asc(entity::program::Column::MinAge)
            .order_by_asc(entity::program::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn find_active(&self, program_id: i32) -> Result<Option<ProgramModel>, DbErr> {
        entity::prelude::Program::find_by_id(program_id)
            .filter(entity::program::Column::Active.eq(true))
            .one(self.db)
            .await
    }

    /// The program a check-in falls back to when the station does not pick one
    pub async fn first_active(&self) -> Result<Option<ProgramModel>, DbErr> {
        entity::prelude::Program::find()
            .filter(entity::program::Column::Active.eq(true))
            .order_by_asc(entity::program::Column::MinAge)
            .order_by_asc(entity::program::Column::Id)
            .one(self.db)
            .await
    }
}
