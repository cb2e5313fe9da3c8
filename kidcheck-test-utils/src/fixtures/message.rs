use chrono::{NaiveDateTime, Utc};
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn message<'a>(&'a mut self) -> MessageFixtures<'a> {
        MessageFixtures { setup: self }
    }
}

pub struct MessageFixtures<'a> {
    setup: &'a mut TestContext,
}

impl<'a> MessageFixtures<'a> {
    /// Insert a PENDING `checkin` message for a guardian with up to 5 attempts.
    pub async fn insert_pending(
        &self,
        guardian_id: i32,
        child_id: i32,
        target_address: &str,
        scheduled_at: NaiveDateTime,
    ) -> Result<entity::queued_message::Model, TestError> {
        self.insert_with_status(guardian_id, child_id, target_address, "PENDING", scheduled_at)
            .await
    }

    /// Insert a `checkin` message in an arbitrary status.
    pub async fn insert_with_status(
        &self,
        guardian_id: i32,
        child_id: i32,
        target_address: &str,
        status: &str,
        scheduled_at: NaiveDateTime,
    ) -> Result<entity::queued_message::Model, TestError> {
        Ok(
            entity::prelude::QueuedMessage::insert(entity::queued_message::ActiveModel {
                guardian_id: ActiveValue::Set(guardian_id),
                child_id: ActiveValue::Set(child_id),
                message_type: ActiveValue::Set("checkin".to_string()),
                body: ActiveValue::Set("Emma was checked in at entrance-a.".to_string()),
                target_address: ActiveValue::Set(target_address.to_string()),
                status: ActiveValue::Set(status.to_string()),
                attempts: ActiveValue::Set(0),
                max_attempts: ActiveValue::Set(5),
                scheduled_at: ActiveValue::Set(scheduled_at),
                next_attempt_at: ActiveValue::Set(None),
                claimed_at: ActiveValue::Set(None),
                sent_at: ActiveValue::Set(None),
                last_error: ActiveValue::Set(None),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Insert an attendance row for a child, open when `checkout_at` is `None`.
    pub async fn insert_attendance(
        &self,
        child_id: i32,
        program_id: i32,
        checkin_at: NaiveDateTime,
        checkout_at: Option<NaiveDateTime>,
    ) -> Result<entity::attendance::Model, TestError> {
        Ok(
            entity::prelude::Attendance::insert(entity::attendance::ActiveModel {
                child_id: ActiveValue::Set(child_id),
                program_id: ActiveValue::Set(program_id),
                station_id: ActiveValue::Set("entrance-a".to_string()),
                device_id: ActiveValue::Set("tablet-1".to_string()),
                created_by: ActiveValue::Set("vol1".to_string()),
                checkin_at: ActiveValue::Set(checkin_at),
                checkout_at: ActiveValue::Set(checkout_at),
                checked_out_by: ActiveValue::Set(checkout_at.map(|_| "vol1".to_string())),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }
}
