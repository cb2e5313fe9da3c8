//! Test context returned by `TestBuilder`.

use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};

use crate::{error::TestError, fixtures::family::Household};

/// Test environment produced by [`TestBuilder::build`](crate::TestBuilder::build).
///
/// Holds an in-memory SQLite database and the households inserted during the build
/// phase, in the order they were declared.
///
/// ```ignore
/// let mut test = TestBuilder::new()
///     .with_checkin_tables()
///     .with_household("KID-001", "Emma", true)
///     .build()
///     .await?;
///
/// let emma = test.household("KID-001")?;
/// test.family().insert_guardian(emma.family.id, "+15550000099", false).await?;
/// ```
pub struct TestContext {
    /// Database connection to the in-memory SQLite database
    pub db: DatabaseConnection,
    /// Households created by the builder
    pub households: Vec<Household>,
}

impl TestContext {
    /// Convert the database connection into any type that can be built from it.
    ///
    /// Lets integration tests produce the application state without this crate
    /// depending on the main crate.
    pub fn to_app_state<T>(&self) -> T
    where
        T: From<DatabaseConnection>,
    {
        T::from(self.db.clone())
    }

    /// Look up a household created by the builder through its child's scan code.
    ///
    /// # Returns
    /// - `Ok(Household)` - Clone of the household
    /// - `Err(TestError::Fixture)` - No household was declared with that code
    pub fn household(&self, code: &str) -> Result<Household, TestError> {
        self.households
            .iter()
            .find(|h| h.scan_code.code == code)
            .cloned()
            .ok_or_else(|| TestError::Fixture(format!("No household with scan code {code}")))
    }
}

impl TestContext {
    /// Create an empty context backed by a fresh in-memory database.
    pub(crate) async fn new() -> Result<Self, TestError> {
        let db = Database::connect("sqlite::memory:").await?;

        Ok(TestContext {
            db,
            households: Vec::new(),
        })
    }

    /// Execute CREATE TABLE statements in order.
    pub(crate) async fn with_tables(
        &self,
        stmts: Vec<TableCreateStatement>,
    ) -> Result<(), TestError> {
        for stmt in stmts {
            self.db.execute(&stmt).await?;
        }

        Ok(())
    }
}
