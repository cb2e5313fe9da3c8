use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, TestContext};

/// A family with one guardian and one child holding an active scan code.
#[derive(Clone, Debug)]
pub struct Household {
    pub family: entity::family::Model,
    pub guardian: entity::guardian::Model,
    pub child: entity::child::Model,
    pub scan_code: entity::scan_code::Model,
}

impl TestContext {
    pub fn family<'a>(&'a mut self) -> FamilyFixtures<'a> {
        FamilyFixtures { setup: self }
    }
}

pub struct FamilyFixtures<'a> {
    setup: &'a mut TestContext,
}

impl<'a> FamilyFixtures<'a> {
    pub async fn insert_family(&self, family_name: &str) -> Result<entity::family::Model, TestError> {
        Ok(
            entity::prelude::Family::insert(entity::family::ActiveModel {
                family_name: ActiveValue::Set(family_name.to_string()),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Insert a guardian; `phone` is stored as given, so pass it already normalized.
    pub async fn insert_guardian(
        &self,
        family_id: i32,
        phone: &str,
        opted_in: bool,
    ) -> Result<entity::guardian::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(
            entity::prelude::Guardian::insert(entity::guardian::ActiveModel {
                family_id: ActiveValue::Set(family_id),
                first_name: ActiveValue::Set("Sarah".to_string()),
                last_name: ActiveValue::Set("Johnson".to_string()),
                phone: ActiveValue::Set(phone.to_string()),
                relationship: ActiveValue::Set("Mother".to_string()),
                notify_opt_in: ActiveValue::Set(opted_in),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    pub async fn insert_child(
        &self,
        family_id: i32,
        first_name: &str,
        birth_date: NaiveDate,
    ) -> Result<entity::child::Model, TestError> {
        Ok(
            entity::prelude::Child::insert(entity::child::ActiveModel {
                family_id: ActiveValue::Set(family_id),
                first_name: ActiveValue::Set(first_name.to_string()),
                last_name: ActiveValue::Set("Johnson".to_string()),
                birth_date: ActiveValue::Set(birth_date),
                allergies: ActiveValue::Set(Some("Peanuts".to_string())),
                medications: ActiveValue::Set(None),
                medical_notes: ActiveValue::Set(None),
                special_notes: ActiveValue::Set(Some("Shy at drop-off".to_string())),
                active: ActiveValue::Set(true),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    pub async fn insert_scan_code(
        &self,
        child_id: i32,
        code: &str,
        active: bool,
    ) -> Result<entity::scan_code::Model, TestError> {
        let now = Utc::now().naive_utc();

        Ok(
            entity::prelude::ScanCode::insert(entity::scan_code::ActiveModel {
                child_id: ActiveValue::Set(child_id),
                code: ActiveValue::Set(code.to_string()),
                active: ActiveValue::Set(active),
                created_at: ActiveValue::Set(now),
                revoked_at: ActiveValue::Set(if active { None } else { Some(now) }),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Insert a family, guardian, child and active scan code in one go.
    ///
    /// The child is born 2019-06-15, which places them in the Elementary program.
    pub async fn insert_household(
        &self,
        code: &str,
        child_first_name: &str,
        guardian_phone: &str,
        opted_in: bool,
    ) -> Result<Household, TestError> {
        let birth_date = NaiveDate::from_ymd_opt(2019, 6, 15)
            .ok_or_else(|| TestError::Fixture("Invalid birth date".to_string()))?;

        let family = self.insert_family("Johnson").await?;
        let guardian = self
            .insert_guardian(family.id, guardian_phone, opted_in)
            .await?;
        let child = self
            .insert_child(family.id, child_first_name, birth_date)
            .await?;
        let scan_code = self.insert_scan_code(child.id, code, true).await?;

        Ok(Household {
            family,
            guardian,
            child,
            scan_code,
        })
    }
}
