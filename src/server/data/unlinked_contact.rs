use chrono::NaiveDateTime;
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr};

pub struct UnlinkedContactRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UnlinkedContactRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Store an inbound message from a sender no guardian is registered with
    pub async fn create(
        &self,
        phone: &str,
        body: &str,
        received_at: NaiveDateTime,
    ) -> Result<entity::unlinked_contact::Model, DbErr> {
        let contact = entity::unlinked_contact::ActiveModel {
            phone: ActiveValue::Set(phone.to_string()),
            body: ActiveValue::Set(body.to_string()),
            received_at: ActiveValue::Set(received_at),
            ..Default::default()
        };

        contact.insert(self.db).await
    }
}
