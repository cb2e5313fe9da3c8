use chrono::NaiveDateTime;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::db::AttendanceModel;

/// Values recorded when a child is checked in
pub struct NewAttendance<'s> {
    pub child_id: i32,
    pub program_id: i32,
    pub station_id: &'s str,
    pub device_id: &'s str,
    pub created_by: &'s str,
    pub checkin_at: NaiveDateTime,
}

pub struct AttendanceRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AttendanceRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, attendance: NewAttendance<'_>) -> Result<AttendanceModel, DbErr> {
        let attendance = entity::attendance::ActiveModel {
            child_id: ActiveValue::Set(attendance.child_id),
            program_id: ActiveValue::Set(attendance.program_id),
            station_id: ActiveValue::Set(attendance.station_id.to_string()),
            device_id: ActiveValue::Set(attendance.device_id.to_string()),
            created_by: ActiveValue::Set(attendance.created_by.to_string()),
            checkin_at: ActiveValue::Set(attendance.checkin_at),
            checkout_at: ActiveValue::Set(None),
            checked_out_by: ActiveValue::Set(None),
            ..Default::default()
        };

        attendance.insert(self.db).await
    }

    /// The child's attendance record that has not been checked out yet, if any
    pub async fn find_open(&self, child_id: i32) -> Result<Option<AttendanceModel>, DbErr> {
        entity::prelude::Attendance::find()
            .filter(entity::attendance::Column::ChildId.eq(child_id))
            .filter(entity::attendance::Column::CheckoutAt.is_null())
            .order_by_desc(entity::attendance::Column::CheckinAt)
            .one(self.db)
            .await
    }

    /// Number of attendance records ever written for the child
    pub async fn count_for_child(&self, child_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Attendance::find()
            .filter(entity::attendance::Column::ChildId.eq(child_id))
            .count(self.db)
            .await
    }

    /// Close an attendance record
    pub async fn checkout(
        &self,
        attendance: AttendanceModel,
        checkout_at: NaiveDateTime,
        checked_out_by: &str,
    ) -> Result<AttendanceModel, DbErr> {
        let mut attendance_am = attendance.into_active_model();
        attendance_am.checkout_at = ActiveValue::Set(Some(checkout_at));
        attendance_am.checked_out_by = ActiveValue::Set(Some(checked_out_by.to_string()));

        attendance_am.update(self.db).await
    }

    /// Close every record checked in before `cutoff` and still open.
    ///
    /// # Returns
    /// Number of records closed
    pub async fn close_open_before(
        &self,
        cutoff: NaiveDateTime,
        checkout_at: NaiveDateTime,
        checked_out_by: &str,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::Attendance::update_many()
            .col_expr(
                entity::attendance::Column::CheckoutAt,
                Expr::value(Some(checkout_at)),
            )
            .col_expr(
                entity::attendance::Column::CheckedOutBy,
                Expr::value(Some(checked_out_by.to_string())),
            )
            .filter(entity::attendance::Column::CheckoutAt.is_null())
            .filter(entity::attendance::Column::CheckinAt.lt(cutoff))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
