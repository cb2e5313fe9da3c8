use sea_orm::{ConnectionTrait, DbErr, EntityTrait};

use crate::server::model::db::{ChildModel, FamilyModel};

pub struct ChildRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ChildRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, child_id: i32) -> Result<Option<ChildModel>, DbErr> {
        entity::prelude::Child::find_by_id(child_id)
            .one(self.db)
            .await
    }

    /// Get a child together with the family that owns it
    pub async fn get_with_family(
        &self,
        child_id: i32,
    ) -> Result<Option<(ChildModel, Option<FamilyModel>)>, DbErr> {
        entity::prelude::Child::find_by_id(child_id)
            .find_also_related(entity::prelude::Family)
            .one(self.db)
            .await
    }
}
