//! Declarative test builder.
//!
//! `TestBuilder` queues tables and fixtures, all of which are created during the final
//! `build()` call.

use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{error::TestError, TestContext};

/// A household queued for insertion: (scan code, child first name, guardian opted in)
type HouseholdSpec = (String, String, bool);

/// Builder for declarative test initialization.
pub struct TestBuilder {
    tables: Vec<TableCreateStatement>,
    include_checkin_tables: bool,
    include_default_programs: bool,
    households: Vec<HouseholdSpec>,
}

impl TestBuilder {
    /// Create an empty builder with no tables or fixtures.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            include_checkin_tables: false,
            include_default_programs: false,
            households: Vec::new(),
        }
    }

    /// Add every table used by check-in and notification delivery.
    ///
    /// Creates family, guardian, child, scan_code, program, attendance, queued_message
    /// and unlinked_contact in dependency order.
    pub fn with_checkin_tables(mut self) -> Self {
        self.include_checkin_tables = true;
        self
    }

    /// Add a single entity table to the test database.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use kidcheck_test_utils::TestBuilder;
    /// use entity::prelude::*;
    ///
    /// # async fn example() -> Result<(), kidcheck_test_utils::TestError> {
    /// let test = TestBuilder::new()
    ///     .with_table(Family)
    ///     .with_table(Guardian)
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Insert the Nursery, Toddlers, Preschool and Elementary programs.
    ///
    /// Mirrors the rows seeded by the database migration.
    pub fn with_default_programs(mut self) -> Self {
        self.include_default_programs = true;
        self
    }

    /// Insert a family with one guardian and one child holding an active scan code.
    ///
    /// Households are numbered in declaration order; the guardian of the n-th household
    /// gets the phone `+1555000000n`.
    ///
    /// # Arguments
    /// - `code` - Scan code issued to the child
    /// - `child_first_name` - First name of the child
    /// - `opted_in` - Whether the guardian has opted into notifications
    pub fn with_household(
        mut self,
        code: impl Into<String>,
        child_first_name: impl Into<String>,
        opted_in: bool,
    ) -> Self {
        self.households
            .push((code.into(), child_first_name.into(), opted_in));
        self
    }

    /// Build the test context.
    ///
    /// Creates tables first, then programs, then households.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Configured test environment
    /// - `Err(TestError::DbErr)` - Table creation or fixture insertion failed
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new().await?;

        let mut all_tables = Vec::new();

        if self.include_checkin_tables {
            let schema = Schema::new(sea_orm::DbBackend::Sqlite);
            all_tables.extend(vec![
                schema.create_table_from_entity(entity::prelude::Family),
                schema.create_table_from_entity(entity::prelude::Guardian),
                schema.create_table_from_entity(entity::prelude::Child),
                schema.create_table_from_entity(entity::prelude::ScanCode),
                schema.create_table_from_entity(entity::prelude::Program),
                schema.create_table_from_entity(entity::prelude::Attendance),
                schema.create_table_from_entity(entity::prelude::QueuedMessage),
                schema.create_table_from_entity(entity::prelude::UnlinkedContact),
            ]);
        }

        all_tables.extend(self.tables);
        setup.with_tables(all_tables).await?;

        if self.include_default_programs {
            setup.program().insert_default_programs().await?;
        }

        for (index, (code, child_first_name, opted_in)) in
            self.households.into_iter().enumerate()
        {
            let phone = format!("+1555000000{}", index + 1);
            let household = setup
                .family()
                .insert_household(&code, &child_first_name, &phone, opted_in)
                .await?;

            setup.households.push(household);
        }

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
