use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::server::model::db::GuardianModel;

pub struct GuardianRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> GuardianRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// All guardians of a family, in insertion order
    pub async fn list_by_family(&self, family_id: i32) -> Result<Vec<GuardianModel>, DbErr> {
        entity::prelude::Guardian::find()
            .filter(entity::guardian::Column::FamilyId.eq(family_id))
            .order_by_asc(entity::guardian::Column::Id)
            .all(self.db)
            .await
    }

    /// Guardians of a family who agreed to receive check-in notifications
    pub async fn list_opted_in(&self, family_id: i32) -> Result<Vec<GuardianModel>, DbErr> {
        entity::prelude::Guardian::find()
            .filter(entity::guardian::Column::FamilyId.eq(family_id))
            .filter(entity::guardian::Column::NotifyOptIn.eq(true))
            .order_by_asc(entity::guardian::Column::Id)
            .all(self.db)
            .await
    }

    /// Guardians registered with a normalized phone number.
    ///
    /// A phone may appear in more than one family, e.g. a parent registered twice.
    pub async fn find_by_phone(&self, phone: &str) -> Result<Vec<GuardianModel>, DbErr> {
        entity::prelude::Guardian::find()
            .filter(entity::guardian::Column::Phone.eq(phone))
            .all(self.db)
            .await
    }

    /// Update a guardian's notification opt-in flag
    ///
    /// # Returns
    /// - `Ok(Some(GuardianModel))` - Updated guardian
    /// - `Ok(None)` - Guardian not found
    pub async fn set_opt_in(
        &self,
        guardian_id: i32,
        opted_in: bool,
    ) -> Result<Option<GuardianModel>, DbErr> {
        let guardian = match entity::prelude::Guardian::find_by_id(guardian_id)
            .one(self.db)
            .await?
        {
            Some(guardian) => guardian,
            None => return Ok(None),
        };

        let mut guardian_am = guardian.into_active_model();
        guardian_am.notify_opt_in = ActiveValue::Set(opted_in);
        guardian_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        let guardian = guardian_am.update(self.db).await?;

        Ok(Some(guardian))
    }
}
