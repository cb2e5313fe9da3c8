//! Test utilities shared by the kidcheck unit and integration tests.
//!
//! Tests are set up in two phases. `TestBuilder` declares the tables and fixtures a test
//! needs, then `build()` produces a `TestContext` holding an in-memory SQLite database
//! with everything inserted. Additional fixtures can be created from the context while
//! the test runs.

pub mod builder;
pub mod constant;
pub mod context;
pub mod error;
pub mod fixtures;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;
pub use fixtures::family::Household;

pub mod prelude {
    pub use crate::{
        constant::*, fixtures::factory, Household, TestBuilder, TestContext, TestError,
    };
}
