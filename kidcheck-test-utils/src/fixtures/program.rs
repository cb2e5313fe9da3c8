use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn program<'a>(&'a mut self) -> ProgramFixtures<'a> {
        ProgramFixtures { setup: self }
    }
}

pub struct ProgramFixtures<'a> {
    setup: &'a mut TestContext,
}

impl<'a> ProgramFixtures<'a> {
    pub async fn insert_program(
        &self,
        name: &str,
        min_age: Option<i32>,
        max_age: Option<i32>,
        active: bool,
    ) -> Result<entity::program::Model, TestError> {
        Ok(
            entity::prelude::Program::insert(entity::program::ActiveModel {
                name: ActiveValue::Set(name.to_string()),
                min_age: ActiveValue::Set(min_age),
                max_age: ActiveValue::Set(max_age),
                active: ActiveValue::Set(active),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Insert the same four programs the migration seeds.
    pub async fn insert_default_programs(&self) -> Result<Vec<entity::program::Model>, TestError> {
        let mut programs = Vec::new();

        for (name, min_age, max_age) in [
            ("Nursery", 0, 2),
            ("Toddlers", 2, 4),
            ("Preschool", 4, 6),
            ("Elementary", 6, 12),
        ] {
            programs.push(
                self.insert_program(name, Some(min_age), Some(max_age), true)
                    .await?,
            );
        }

        Ok(programs)
    }
}
