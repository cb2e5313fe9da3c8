use chrono::NaiveDateTime;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter,
};

use crate::server::model::db::{ChildModel, ScanCodeModel};

pub struct ScanCodeRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ScanCodeRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Resolve a scanned token to the active child it is issued to.
    ///
    /// Revoked codes and inactive children both resolve to `None`.
    pub async fn find_active_child(&self, code: &str) -> Result<Option<ChildModel>, DbErr> {
        let found = entity::prelude::ScanCode::find()
            .filter(entity::scan_code::Column::Code.eq(code))
            .filter(entity::scan_code::Column::Active.eq(true))
            .find_also_related(entity::prelude::Child)
            .filter(entity::child::Column::Active.eq(true))
            .one(self.db)
            .await?;

        Ok(found.and_then(|(_, child)| child))
    }

    /// Issue `code` to a child, revoking any active mapping the code still has.
    ///
    /// Run inside a transaction so the revoke and insert land together.
    pub async fn issue(
        &self,
        child_id: i32,
        code: &str,
        now: NaiveDateTime,
    ) -> Result<ScanCodeModel, DbErr> {
        self.revoke(code, now).await?;

        let scan_code = entity::scan_code::ActiveModel {
            child_id: ActiveValue::Set(child_id),
            code: ActiveValue::Set(code.to_string()),
            active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(now),
            revoked_at: ActiveValue::Set(None),
            ..Default::default()
        };

        scan_code.insert(self.db).await
    }

    /// Soft-delete the active mapping of `code`, returning how many rows were revoked.
    pub async fn revoke(&self, code: &str, now: NaiveDateTime) -> Result<u64, DbErr> {
        let result = entity::prelude::ScanCode::update_many()
            .col_expr(entity::scan_code::Column::Active, Expr::value(false))
            .col_expr(entity::scan_code::Column::RevokedAt, Expr::value(now))
            .filter(entity::scan_code::Column::Code.eq(code))
            .filter(entity::scan_code::Column::Active.eq(true))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
